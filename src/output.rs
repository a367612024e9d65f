//! Output rendering for check runs.
//!
//! Supports `human` (default) and `json` outputs. The JSON form carries
//! per-file results, a top-level summary, and any run notes. Ordering is
//! stable for identical input: files sort by path, violations by
//! (line, rule), both guaranteed upstream by the engine.

use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

use crate::models::{RunResult, Severity, Violation};
use crate::utils;

fn use_colors(output: &str) -> bool {
    output != "json" && utils::colors_enabled()
}

/// Print run results in the requested format.
///
/// Notes go to stderr; violations and the summary go to stdout. In
/// quiet mode only the violations are printed.
pub fn print_run(run: &RunResult, output: &str, quiet: bool, repo_root: &Path, notes: &[String]) {
    if output == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&compose_run_json(run, notes)).unwrap()
        );
        return;
    }

    let color = use_colors(output);
    if !quiet {
        for note in notes {
            eprintln!("{} {}", utils::warn_prefix(), note);
        }
    }
    for result in &run.files {
        if result.violations.is_empty() {
            continue;
        }
        let shown = display_path(&result.file, repo_root);
        if color {
            println!("{}", shown.bold());
        } else {
            println!("{shown}");
        }
        for v in &result.violations {
            println!("  {}", format_violation(v, color));
        }
    }
    if !quiet {
        let summary = format!(
            "— Summary — files={} violations={} errors={} warnings={} unparsed={}",
            run.summary.files,
            run.summary.violations,
            run.summary.errors,
            run.summary.warnings,
            run.summary.unparsed
        );
        if color {
            println!("{}", summary.bold());
        } else {
            println!("{summary}");
        }
    }
}

fn format_violation(v: &Violation, color: bool) -> String {
    let location = match v.column {
        Some(col) => format!("{}:{}", v.line, col),
        None => v.line.to_string(),
    };
    let sev = match v.severity {
        Severity::Error => {
            if color {
                "⟦error⟧".red().bold().to_string()
            } else {
                "⟦error⟧".to_string()
            }
        }
        Severity::Warning => {
            if color {
                "⟦warn⟧".yellow().bold().to_string()
            } else {
                "⟦warn⟧".to_string()
            }
        }
    };
    let icon = match v.severity {
        Severity::Error => {
            if color {
                "✖".red().to_string()
            } else {
                "✖".to_string()
            }
        }
        Severity::Warning => {
            if color {
                "▲".yellow().to_string()
            } else {
                "▲".to_string()
            }
        }
    };
    format!("{icon} {location} {sev} ❲{}❳ {}", v.rule, v.message)
}

/// Repo-relative path for display; falls back to the stored path when
/// the file is outside the repo root.
fn display_path(file: &str, repo_root: &Path) -> String {
    match pathdiff::diff_paths(file, repo_root) {
        Some(rel) if !rel.as_os_str().is_empty() && !rel.starts_with("..") => {
            rel.to_string_lossy().to_string()
        }
        _ => file.to_string(),
    }
}

/// Compose run JSON object (pure) for testing/snapshot purposes.
pub fn compose_run_json(run: &RunResult, notes: &[String]) -> JsonVal {
    let mut value = serde_json::to_value(run).unwrap();
    if let JsonVal::Object(map) = &mut value {
        map.insert("notes".to_string(), json!(notes));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckResult, Summary};

    fn sample_run() -> RunResult {
        RunResult {
            files: vec![CheckResult {
                file: "/repo/pkg/mod.py".to_string(),
                checked: true,
                violations: vec![Violation {
                    file: "/repo/pkg/mod.py".to_string(),
                    line: 4,
                    column: None,
                    rule: "docstring-line-length".to_string(),
                    severity: Severity::Error,
                    message: "docstring line too long (80 > 72)".to_string(),
                }],
            }],
            summary: Summary {
                files: 1,
                violations: 1,
                errors: 1,
                warnings: 0,
                unparsed: 0,
            },
        }
    }

    #[test]
    fn test_compose_run_json_shape() {
        let run = sample_run();
        let out = compose_run_json(&run, &["style pass skipped: ruff missing".to_string()]);
        assert_eq!(out["summary"]["violations"], 1);
        assert_eq!(out["files"][0]["checked"], true);
        assert_eq!(out["files"][0]["violations"][0]["rule"], "docstring-line-length");
        assert_eq!(out["files"][0]["violations"][0]["line"], 4);
        // Column is omitted when absent
        assert!(out["files"][0]["violations"][0].get("column").is_none());
        assert_eq!(out["notes"][0], "style pass skipped: ruff missing");
    }

    #[test]
    fn test_display_path_relative_inside_root() {
        assert_eq!(
            display_path("/repo/pkg/mod.py", Path::new("/repo")),
            "pkg/mod.py"
        );
        // Outside the root the stored path is kept
        assert_eq!(
            display_path("/elsewhere/x.py", Path::new("/repo")),
            "/elsewhere/x.py"
        );
    }

    #[test]
    fn test_format_violation_plain() {
        let v = Violation {
            file: "a.py".to_string(),
            line: 3,
            column: Some(7),
            rule: "E501".to_string(),
            severity: Severity::Error,
            message: "Line too long".to_string(),
        };
        let s = format_violation(&v, false);
        assert_eq!(s, "✖ 3:7 ⟦error⟧ ❲E501❳ Line too long");
    }
}
