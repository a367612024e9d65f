//! External style-checker collaborator.
//!
//! The engine only sees the `StyleChecker` trait; the shipped
//! implementation shells out to ruff and parses its concise output
//! (`path:line:col: CODE message`) into the shared violation shape.
//! A non-zero exit with parseable output means "violations present";
//! only a failure to start, a timeout, or unparseable output is an
//! error, and the engine degrades those to run notes.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use regex::Regex;

use crate::models::{Severity, Violation};

#[derive(Debug, thiserror::Error)]
/// Failure modes of the style pass. All are recoverable for the run.
pub enum StyleError {
    #[error("style checker `{command}` could not be started: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("style checker `{command}` timed out after {secs}s")]
    Timeout { command: String, secs: u64 },
    #[error("style checker `{command}` produced unparseable output")]
    Output { command: String },
}

/// One-operation capability boundary around the external tool.
pub trait StyleChecker {
    fn check(&self, files: &[PathBuf]) -> Result<Vec<Violation>, StyleError>;
}

/// Ruff invocation with a wall-clock timeout.
pub struct RuffChecker {
    command: String,
    timeout: Duration,
}

impl RuffChecker {
    pub fn new(command: String, timeout_secs: u64) -> Self {
        Self {
            command,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl StyleChecker for RuffChecker {
    fn check(&self, files: &[PathBuf]) -> Result<Vec<Violation>, StyleError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }
        let mut child = Command::new(&self.command)
            .arg("check")
            .arg("--output-format=concise")
            .args(files)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| StyleError::Launch {
                command: self.command.clone(),
                source,
            })?;

        // Drain stdout on a helper thread so a chatty child cannot
        // block on a full pipe while we watch the deadline.
        let mut stdout = child.stdout.take().expect("stdout was piped");
        let reader = std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = stdout.read_to_string(&mut buf);
            buf
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(StyleError::Timeout {
                            command: self.command.clone(),
                            secs: self.timeout.as_secs(),
                        });
                    }
                    std::thread::sleep(Duration::from_millis(25));
                }
                Err(source) => {
                    return Err(StyleError::Launch {
                        command: self.command.clone(),
                        source,
                    })
                }
            }
        };
        let output = reader.join().unwrap_or_default();

        let violations = parse_concise(&output);
        if violations.is_empty() && !status.success() && !output.trim().is_empty() {
            return Err(StyleError::Output {
                command: self.command.clone(),
            });
        }
        Ok(violations)
    }
}

/// Parse concise-format lines; anything else (summary lines, banners)
/// is skipped.
pub fn parse_concise(output: &str) -> Vec<Violation> {
    let re = Regex::new(r"^(?P<path>.+?):(?P<line>\d+):(?P<col>\d+): (?P<code>\S+) (?P<msg>.*)$")
        .expect("concise line pattern");
    let mut violations = Vec::new();
    for line in output.lines() {
        let Some(caps) = re.captures(line) else {
            continue;
        };
        let (Ok(line_no), Ok(col)) = (caps["line"].parse(), caps["col"].parse()) else {
            continue;
        };
        violations.push(Violation {
            file: caps["path"].to_string(),
            line: line_no,
            column: Some(col),
            rule: caps["code"].to_string(),
            severity: Severity::Error,
            message: caps["msg"].to_string(),
        });
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_concise_lines() {
        let out = "\
src/app.py:10:5: E501 Line too long (88 > 79)
src/app.py:1:1: D100 Missing docstring in public module
Found 2 errors.
";
        let vs = parse_concise(out);
        assert_eq!(vs.len(), 2);
        assert_eq!(vs[0].file, "src/app.py");
        assert_eq!(vs[0].line, 10);
        assert_eq!(vs[0].column, Some(5));
        assert_eq!(vs[0].rule, "E501");
        assert_eq!(vs[0].severity, Severity::Error);
        assert_eq!(vs[1].rule, "D100");
    }

    #[test]
    fn test_parse_concise_ignores_noise() {
        assert!(parse_concise("All checks passed!\n").is_empty());
        assert!(parse_concise("").is_empty());
    }

    #[test]
    fn test_missing_binary_is_launch_error() {
        let checker = RuffChecker::new("docgate-no-such-tool".to_string(), 5);
        let err = checker.check(&[PathBuf::from("a.py")]).unwrap_err();
        assert!(matches!(err, StyleError::Launch { .. }));
    }

    #[test]
    fn test_empty_file_list_short_circuits() {
        let checker = RuffChecker::new("docgate-no-such-tool".to_string(), 5);
        assert!(checker.check(&[]).unwrap().is_empty());
    }
}
