//! docgate core library.
//!
//! This crate exposes programmatic APIs for checking docstring line
//! lengths in Python sources and merging in the results of an external
//! style checker.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `discover`: Root-path expansion into a deterministic file list.
//! - `extract`: Tree-sitter walk producing docstring candidates.
//! - `validate`: Line-length and missing-docstring rules.
//! - `engine`: Per-file orchestration, style merge, aggregation.
//! - `style`: Subprocess wrapper around the external style checker.
//! - `models`: Violation, per-file result, and summary structs.
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod discover;
pub mod engine;
pub mod extract;
pub mod models;
pub mod output;
pub mod style;
pub mod utils;
pub mod validate;
