//! Color mapping for CLI output.
//!
//! All coloring respects `NO_COLOR` env var automatically via the `colored` crate.

use colored::Colorize;

/// Returns a colored string for an access flag.
///
/// Green: yes. Red: no. Anything else is left white.
pub fn colorize_access(access: &str) -> colored::ColoredString {
    match access.to_lowercase().as_str() {
        "yes" => access.green().bold(),
        "no" => access.red(),
        _ => access.white(),
    }
}

/// Dim placeholder attributes of unknown users.
pub fn colorize_attribute(value: &str) -> colored::ColoredString {
    if value == crate::domain::models::UNKNOWN_ATTRIBUTE {
        value.dimmed()
    } else {
        value.normal()
    }
}
