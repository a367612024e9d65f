//! Supporting helpers: colored stderr prefixes for diagnostics.

use owo_colors::OwoColorize;

/// Colors are suppressed when `NO_COLOR` is set.
pub fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if colors_enabled() {
        "✖ error:".red().bold().to_string()
    } else {
        "✖ error:".to_string()
    }
}

pub fn warn_prefix() -> String {
    if colors_enabled() {
        "▲ warn:".yellow().bold().to_string()
    } else {
        "▲ warn:".to_string()
    }
}

pub fn note_prefix() -> String {
    if colors_enabled() {
        "◆ note:".blue().bold().to_string()
    } else {
        "◆ note:".to_string()
    }
}

pub fn info_prefix() -> String {
    if colors_enabled() {
        "◆ info:".blue().to_string()
    } else {
        "◆ info:".to_string()
    }
}
