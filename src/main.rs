//! docgate CLI binary entry point.
//! Resolves configuration, runs the check engine, and prints results.

mod cli;
mod config;
mod discover;
mod engine;
mod extract;
mod models;
mod output;
mod style;
mod utils;
mod validate;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Check {
            paths,
            repo_root,
            max_line_length,
            no_style_check,
            config,
            output,
            quiet,
            verbose,
        } => {
            let eff = match config::resolve_effective(
                repo_root.as_deref(),
                config.as_deref(),
                max_line_length,
                no_style_check,
                output.as_deref(),
                quiet,
                verbose,
            ) {
                Ok(eff) => eff,
                Err(msg) => {
                    eprintln!("{} {}", utils::error_prefix(), msg);
                    std::process::exit(2);
                }
            };
            // Friendly note if no docgate config was found
            if config.is_none()
                && !eff.quiet
                && matches!(config::load_config(&eff.repo_root), Ok(None))
            {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No docgate.toml found; using defaults."
                );
            }

            let roots = if paths.is_empty() {
                vec![".".to_string()]
            } else {
                paths
            };
            let checker =
                style::RuffChecker::new(eff.style_command.clone(), eff.style_timeout_secs);
            let (run, notes) = engine::run(&eff, &roots, &checker);
            if run.summary.files == 0 {
                eprintln!(
                    "{} {}",
                    utils::error_prefix(),
                    "No matching source files found under the given paths."
                );
                std::process::exit(2);
            }
            if eff.verbose {
                eprintln!(
                    "{} {}",
                    utils::info_prefix(),
                    format!("Checked {} file(s).", run.summary.files)
                );
            }
            output::print_run(&run, &eff.output, eff.quiet, &eff.repo_root, &notes);
            if run.failed() {
                std::process::exit(1);
            }
        }
    }
}
