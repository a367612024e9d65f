//! Orchestration: discovery, per-file checks, style merge, aggregation.
//!
//! Per-file work fans out through rayon and the collected results are
//! re-sorted by path, so report order never depends on scheduling. All
//! per-file failures are converted into `CheckResult` entries; nothing
//! here aborts the run.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rayon::prelude::*;

use crate::config::Effective;
use crate::discover;
use crate::extract::{self, ExtractError};
use crate::models::{CheckResult, RunResult, Severity, Summary, Violation};
use crate::style::StyleChecker;
use crate::validate;

pub const RULE_READ_ERROR: &str = "read-error";
pub const RULE_PARSE_ERROR: &str = "parse-error";
pub const RULE_INTERNAL: &str = "internal-error";

/// Run the full check over `roots`.
///
/// Returns the aggregated results plus run notes (degraded style pass
/// and similar warnings) for stderr.
pub fn run(eff: &Effective, roots: &[String], style: &dyn StyleChecker) -> (RunResult, Vec<String>) {
    let mut notes = Vec::new();
    let targets = discover::resolve_targets(roots, &eff.include, &eff.exclude);

    let mut results: Vec<CheckResult> = targets
        .files
        .par_iter()
        .map(|path| check_one(path, eff))
        .collect();

    for missing in &targets.missing {
        let file = missing.to_string_lossy().to_string();
        results.push(failure_result(
            file,
            1,
            RULE_READ_ERROR,
            "file not found".to_string(),
        ));
    }

    if eff.style_check {
        match style.check(&targets.files) {
            Ok(found) => merge_style(&mut results, found),
            Err(err) => notes.push(format!("style pass skipped: {err}")),
        }
    }

    results.sort_by(|a, b| a.file.cmp(&b.file));
    for result in &mut results {
        result
            .violations
            .sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.rule.cmp(&b.rule)));
    }
    let summary = summarize(&results);
    (
        RunResult {
            files: results,
            summary,
        },
        notes,
    )
}

/// Extract and validate one file, converting failures into results.
fn check_one(path: &Path, eff: &Effective) -> CheckResult {
    let file = path.to_string_lossy().to_string();
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(err) => {
            return failure_result(file, 1, RULE_READ_ERROR, format!("cannot read file: {err}"))
        }
    };
    match extract::extract(&source) {
        Ok(candidates) => {
            let violations = validate::check_file(
                &file,
                &candidates,
                eff.max_line_length,
                eff.skip_missing,
            );
            CheckResult {
                file,
                checked: true,
                violations,
            }
        }
        Err(err @ ExtractError::Syntax { line }) => {
            failure_result(file, line, RULE_PARSE_ERROR, err.to_string())
        }
        Err(err) => failure_result(file, 1, RULE_INTERNAL, err.to_string()),
    }
}

fn failure_result(file: String, line: usize, rule: &str, message: String) -> CheckResult {
    let violation = Violation {
        file: file.clone(),
        line,
        column: None,
        rule: rule.to_string(),
        severity: Severity::Error,
        message,
    };
    CheckResult {
        file,
        checked: false,
        violations: vec![violation],
    }
}

/// Fold style violations into per-file results by path.
fn merge_style(results: &mut Vec<CheckResult>, found: Vec<Violation>) {
    let mut by_file: HashMap<String, usize> = results
        .iter()
        .enumerate()
        .map(|(i, r)| (r.file.clone(), i))
        .collect();
    for violation in found {
        match by_file.get(&violation.file) {
            Some(&i) => results[i].violations.push(violation),
            None => {
                by_file.insert(violation.file.clone(), results.len());
                results.push(CheckResult {
                    file: violation.file.clone(),
                    checked: true,
                    violations: vec![violation],
                });
            }
        }
    }
}

fn summarize(results: &[CheckResult]) -> Summary {
    let mut errors = 0usize;
    let mut warnings = 0usize;
    for violation in results.iter().flat_map(|r| &r.violations) {
        match violation.severity {
            Severity::Error => errors += 1,
            Severity::Warning => warnings += 1,
        }
    }
    Summary {
        files: results.len(),
        violations: errors + warnings,
        errors,
        warnings,
        unparsed: results.iter().filter(|r| !r.checked).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleError;
    use crate::validate::{RULE_LINE_LENGTH, RULE_MISSING};
    use std::path::PathBuf;
    use tempfile::tempdir;

    struct NoStyle;
    impl StyleChecker for NoStyle {
        fn check(&self, _files: &[PathBuf]) -> Result<Vec<Violation>, StyleError> {
            Ok(Vec::new())
        }
    }

    struct FixedStyle(Vec<Violation>);
    impl StyleChecker for FixedStyle {
        fn check(&self, _files: &[PathBuf]) -> Result<Vec<Violation>, StyleError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenStyle;
    impl StyleChecker for BrokenStyle {
        fn check(&self, _files: &[PathBuf]) -> Result<Vec<Violation>, StyleError> {
            Err(StyleError::Timeout {
                command: "ruff".to_string(),
                secs: 1,
            })
        }
    }

    fn eff(root: &Path) -> Effective {
        Effective {
            repo_root: root.to_path_buf(),
            max_line_length: 72,
            skip_missing: true,
            style_check: false,
            include: vec!["**/*.py".to_string()],
            exclude: Vec::new(),
            output: "human".to_string(),
            style_command: "ruff".to_string(),
            style_timeout_secs: 30,
            quiet: false,
            verbose: false,
        }
    }

    fn write(root: &Path, name: &str, content: &str) -> String {
        let path = root.join(name);
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_clean_file_passes() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "ok.py",
            "\"\"\"Module.\"\"\"\n\n\ndef func():\n    \"\"\"Func.\"\"\"\n    pass\n",
        );
        let e = eff(dir.path());
        let (run, notes) = run(&e, &[dir.path().to_string_lossy().to_string()], &NoStyle);
        assert_eq!(run.summary.files, 1);
        assert_eq!(run.summary.violations, 0);
        assert!(!run.failed());
        assert!(notes.is_empty());
    }

    #[test]
    fn test_second_docstring_line_over_limit() {
        // The docstring's second line is exactly 73 characters.
        let dir = tempdir().unwrap();
        let body = "a".repeat(73);
        let content = format!("def f():\n    \"\"\"Summary.\n{body}\n    \"\"\"\n");
        write(dir.path(), "long.py", &content);
        let e = eff(dir.path());
        let (run, _) = run(&e, &[dir.path().to_string_lossy().to_string()], &NoStyle);
        assert_eq!(run.summary.violations, 1);
        let v = &run.files[0].violations[0];
        assert_eq!(v.rule, RULE_LINE_LENGTH);
        // Docstring opens on line 2; the offending line is one below.
        assert_eq!(v.line, 3);
        assert!(run.failed());
    }

    #[test]
    fn test_parse_error_marks_file_unchecked() {
        let dir = tempdir().unwrap();
        write(dir.path(), "bad.py", "def broken(:\n");
        let e = eff(dir.path());
        let (run, _) = run(&e, &[dir.path().to_string_lossy().to_string()], &NoStyle);
        assert_eq!(run.summary.files, 1);
        assert!(!run.files[0].checked);
        assert_eq!(run.files[0].violations[0].rule, RULE_PARSE_ERROR);
        assert!(run.failed());
    }

    #[test]
    fn test_missing_root_reported_not_fatal() {
        let dir = tempdir().unwrap();
        write(dir.path(), "ok.py", "\"\"\"Mod.\"\"\"\n");
        let e = eff(dir.path());
        let gone = dir.path().join("gone.py").to_string_lossy().to_string();
        let (run, _) = run(
            &e,
            &[dir.path().to_string_lossy().to_string(), gone],
            &NoStyle,
        );
        assert_eq!(run.summary.files, 2);
        assert_eq!(run.summary.unparsed, 1);
        assert!(run.failed());
    }

    #[test]
    fn test_no_docstrings_passes_by_default() {
        let dir = tempdir().unwrap();
        write(dir.path(), "nodoc.py", "def f():\n    return 1\n");
        let e = eff(dir.path());
        let (run, _) = run(&e, &[dir.path().to_string_lossy().to_string()], &NoStyle);
        assert_eq!(run.summary.violations, 0);
        assert!(!run.failed());
    }

    #[test]
    fn test_missing_docstring_warnings_when_enabled() {
        let dir = tempdir().unwrap();
        write(dir.path(), "nodoc.py", "def f():\n    return 1\n");
        let mut e = eff(dir.path());
        e.skip_missing = false;
        let (run, _) = run(&e, &[dir.path().to_string_lossy().to_string()], &NoStyle);
        // Module scope and `f` both lack docstrings.
        assert_eq!(run.summary.warnings, 2);
        assert!(run
            .files[0]
            .violations
            .iter()
            .all(|v| v.rule == RULE_MISSING));
        assert!(run.failed());
    }

    #[test]
    fn test_style_violations_merged_by_path() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "ok.py", "\"\"\"Mod.\"\"\"\n");
        let mut e = eff(dir.path());
        e.style_check = true;
        let style = FixedStyle(vec![Violation {
            file: file.clone(),
            line: 1,
            column: Some(1),
            rule: "E501".to_string(),
            severity: Severity::Error,
            message: "Line too long".to_string(),
        }]);
        let (run, notes) = run(&e, &[dir.path().to_string_lossy().to_string()], &style);
        assert!(notes.is_empty());
        assert_eq!(run.summary.files, 1);
        assert_eq!(run.files[0].violations.len(), 1);
        assert_eq!(run.files[0].violations[0].rule, "E501");
        assert!(run.files[0].checked);
    }

    #[test]
    fn test_broken_style_pass_degrades_to_note() {
        let dir = tempdir().unwrap();
        write(dir.path(), "ok.py", "\"\"\"Mod.\"\"\"\n");
        let mut e = eff(dir.path());
        e.style_check = true;
        let (run, notes) = run(&e, &[dir.path().to_string_lossy().to_string()], &BrokenStyle);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("timed out"));
        assert!(!run.failed());
    }

    #[test]
    fn test_results_and_violations_sorted() {
        let dir = tempdir().unwrap();
        let long = "x".repeat(80);
        write(
            dir.path(),
            "b.py",
            &format!("\"\"\"Summary.\n{long}\n\"\"\"\n"),
        );
        write(dir.path(), "a.py", &format!("\"\"\"{long}\"\"\"\n"));
        let e = eff(dir.path());
        let (run, _) = run(&e, &[dir.path().to_string_lossy().to_string()], &NoStyle);
        assert!(run.files[0].file.ends_with("a.py"));
        assert!(run.files[1].file.ends_with("b.py"));
        let lines: Vec<usize> = run.files[1].violations.iter().map(|v| v.line).collect();
        let mut sorted = lines.clone();
        sorted.sort_unstable();
        assert_eq!(lines, sorted);
    }
}
