//! Shared data models for check results and run summaries.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Severity of a reported violation.
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A single violation with rule id and location.
pub struct Violation {
    pub file: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub rule: String,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Serialize)]
/// Per-file outcome. `checked = false` means the file could not be read
/// or parsed; its violations then describe that failure.
pub struct CheckResult {
    pub file: String,
    pub checked: bool,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Serialize)]
/// Aggregated run summary used by printers and for the exit status.
pub struct Summary {
    pub files: usize,
    pub violations: usize,
    pub errors: usize,
    pub warnings: usize,
    pub unparsed: usize,
}

#[derive(Debug, Serialize)]
/// Run-level results container.
pub struct RunResult {
    pub files: Vec<CheckResult>,
    pub summary: Summary,
}

impl RunResult {
    /// Whether the run counts as failed for exit-code purposes: any
    /// violation or any file that could not be checked.
    pub fn failed(&self) -> bool {
        self.summary.violations > 0 || self.summary.unparsed > 0
    }
}
