//! Docstring validation rules.
//!
//! Consumes the candidates produced by `extract` and emits one violation
//! per offending physical line. Lengths are counted in Unicode scalar
//! values, not bytes; trailing whitespace is stripped before measuring
//! while leading indentation counts, since it affects rendered width.

use crate::extract::Candidate;
use crate::models::{Severity, Violation};

pub const RULE_LINE_LENGTH: &str = "docstring-line-length";
pub const RULE_MISSING: &str = "missing-docstring";

/// Check every candidate of one file against the configured limit.
///
/// A line exactly at the limit is compliant. Candidates without a
/// docstring are skipped unless `skip_missing` is false, in which case
/// each yields one warning. Violations come out in ascending line order
/// because candidates arrive in document order.
pub fn check_file(
    file: &str,
    candidates: &[Candidate],
    max_line_length: usize,
    skip_missing: bool,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for cand in candidates {
        match &cand.text {
            Some(text) => {
                for (idx, line) in text.split('\n').enumerate() {
                    let width = line.trim_end().chars().count();
                    if width > max_line_length {
                        violations.push(Violation {
                            file: file.to_string(),
                            line: cand.start_line + idx,
                            column: None,
                            rule: RULE_LINE_LENGTH.to_string(),
                            severity: Severity::Error,
                            message: format!(
                                "docstring line too long ({width} > {max_line_length})"
                            ),
                        });
                    }
                }
            }
            None if !skip_missing => {
                violations.push(Violation {
                    file: file.to_string(),
                    line: cand.start_line,
                    column: None,
                    rule: RULE_MISSING.to_string(),
                    severity: Severity::Warning,
                    message: format!("missing docstring in {} `{}`", cand.kind, cand.name),
                });
            }
            None => {}
        }
    }
    violations
}
