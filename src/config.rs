//! Configuration discovery and effective settings resolution.
//!
//! docgate reads `docgate.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags into an `Effective`
//! config constructed once at startup. Defaults:
//! - `max_line_length`: 72
//! - `skip_missing_docstrings`: true
//! - `style_check`: true
//! - `include`: `["**/*.py"]`, `exclude`: `[]`
//! - `output`: `human`
//! - `[style] command`: `ruff`, `timeout_secs`: 30
//!
//! Overrides precedence: CLI > config file > defaults. Invalid
//! configuration is fatal at startup (exit 2), before any file is read.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Style-pass configuration section under `[style]`.
pub struct StyleCfg {
    pub command: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `docgate.toml|yaml`.
pub struct DocgateConfig {
    pub max_line_length: Option<usize>,
    pub skip_missing_docstrings: Option<bool>,
    pub style_check: Option<bool>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub output: Option<String>,
    #[serde(default)]
    pub style: Option<StyleCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the engine after precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub max_line_length: usize,
    pub skip_missing: bool,
    pub style_check: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub output: String,
    pub style_command: String,
    pub style_timeout_secs: u64,
    pub quiet: bool,
    pub verbose: bool,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `docgate.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("docgate.toml").exists()
            || cur.join("docgate.yaml").exists()
            || cur.join("docgate.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `DocgateConfig` from `docgate.toml` or `docgate.yaml|yml` under
/// `root`, if present. An unreadable or unparseable file is an error,
/// not a silent fallback.
pub fn load_config(root: &Path) -> Result<Option<DocgateConfig>, String> {
    let toml_path = root.join("docgate.toml");
    if toml_path.exists() {
        return load_config_at(&toml_path).map(Some);
    }
    for yml in ["docgate.yaml", "docgate.yml"] {
        let p = root.join(yml);
        if p.exists() {
            return load_config_at(&p).map(Some);
        }
    }
    Ok(None)
}

/// Load a configuration file given explicitly (e.g. via `--config`).
pub fn load_config_at(path: &Path) -> Result<DocgateConfig, String> {
    let s = fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {}: {e}", path.to_string_lossy()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&s)
            .map_err(|e| format!("invalid YAML in {}: {e}", path.to_string_lossy()))
    } else {
        toml::from_str(&s).map_err(|e| format!("invalid TOML in {}: {e}", path.to_string_lossy()))
    }
}

/// Resolve `Effective` by merging CLI flags, discovered config, and
/// defaults, then validating option values.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_config: Option<&Path>,
    cli_max_line_length: Option<usize>,
    cli_no_style_check: bool,
    cli_output: Option<&str>,
    cli_quiet: bool,
    cli_verbose: bool,
) -> Result<Effective, String> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = match cli_config {
        Some(path) => load_config_at(path)?,
        None => load_config(&repo_root)?.unwrap_or_default(),
    };

    let max_line_length = cli_max_line_length.or(cfg.max_line_length).unwrap_or(72);
    let skip_missing = cfg.skip_missing_docstrings.unwrap_or(true);
    let style_check = if cli_no_style_check {
        false
    } else {
        cfg.style_check.unwrap_or(true)
    };
    let include = cfg.include.unwrap_or_else(|| vec!["**/*.py".to_string()]);
    let exclude = cfg.exclude.unwrap_or_default();
    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let style = cfg.style.unwrap_or_default();
    let style_command = style.command.unwrap_or_else(|| "ruff".to_string());
    let style_timeout_secs = style.timeout_secs.unwrap_or(30);

    let eff = Effective {
        repo_root,
        max_line_length,
        skip_missing,
        style_check,
        include,
        exclude,
        output,
        style_command,
        style_timeout_secs,
        quiet: cli_quiet,
        verbose: cli_verbose,
    };
    validate(&eff)?;
    Ok(eff)
}

/// Reject invalid option values before any file is processed.
pub fn validate(eff: &Effective) -> Result<(), String> {
    if eff.max_line_length == 0 {
        return Err("max_line_length must be at least 1".to_string());
    }
    if eff.style_timeout_secs == 0 {
        return Err("style.timeout_secs must be at least 1".to_string());
    }
    if eff.output != "human" && eff.output != "json" {
        return Err(format!(
            "unknown output mode '{}' (expected human|json)",
            eff.output
        ));
    }
    for pat in eff.include.iter().chain(eff.exclude.iter()) {
        glob::Pattern::new(pat).map_err(|e| format!("invalid glob pattern '{pat}': {e}"))?;
    }
    Ok(())
}
