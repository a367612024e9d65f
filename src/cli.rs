//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "docgate",
    version,
    about = "Docstring quality gate for Python sources",
    long_about = "docgate — checks docstring line lengths via syntax-tree inspection and runs an external style pass, reporting both in one format.\n\nConfiguration precedence: CLI > docgate.toml > defaults.",
    after_help = "Examples:\n  docgate check src/\n  docgate check src/app.py --max-line-length 79\n  docgate check . --no-style-check --output json\n  docgate check . --config ci/docgate.toml --quiet",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current docgate version.")]
    Version,
    /// Check docstrings (and optionally style) in files or directories
    #[command(
        about = "Run docstring and style checks",
        long_about = "Check every docstring found by syntax-tree inspection against the configured line-length limit; directories are expanded through the include/exclude globs. Unless disabled, the external style checker runs as a separate pass over the same files.",
        after_help = "Exit codes:\n  0 = no violations and no parse errors\n  1 = violations found or a file failed to parse\n  2 = invocation error (bad arguments, bad config, no files found)"
    )]
    Check {
        #[arg(help = "Files or directories to check (default: current dir)")]
        paths: Vec<String>,
        #[arg(long, help = "Repository root (default: detected from current dir)")]
        repo_root: Option<String>,
        #[arg(long, value_name = "INT", help = "Maximum docstring line length (default: 72)")]
        max_line_length: Option<usize>,
        #[arg(
            long,
            action = clap::ArgAction::SetTrue,
            help = "Skip the external style-checker pass"
        )]
        no_style_check: bool,
        #[arg(long, value_name = "PATH", help = "Explicit config file (toml or yaml)")]
        config: Option<PathBuf>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(
            short = 'q',
            long,
            action = clap::ArgAction::SetTrue,
            conflicts_with = "verbose",
            help = "Violations only; no summary or notes (CI mode)"
        )]
        quiet: bool,
        #[arg(
            short = 'v',
            long,
            action = clap::ArgAction::SetTrue,
            help = "Extra progress notes on stderr"
        )]
        verbose: bool,
    },
}
