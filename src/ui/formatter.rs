//! Pure formatting functions for UI output.
//!
//! Everything here returns styled strings; printing is left to the
//! [Logger](super::Logger) implementations.

use crate::boundary::ReleaseWarning;
use console::style;

/// `message > command`, the command dimmed in blue
pub fn format_step(message: &str, command: &str) -> String {
    format!("{} {}", message, style(format!("> {}", command)).blue())
}

pub fn format_success(message: &str) -> String {
    style(message).green().to_string()
}

pub fn format_warning(warning: &ReleaseWarning) -> String {
    style(warning.to_string()).yellow().bold().to_string()
}

pub fn format_error(message: &str) -> String {
    style(message).red().bold().to_string()
}

/// `Old version: 1.0.0` / `New version: 1.1.0`
pub fn format_versions(old: &str, new: &str) -> String {
    format!(
        "Old version: {}\nNew version: {}",
        style(old).bold(),
        style(new).bold().yellow()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_step_contains_command() {
        let line = format_step("Tag created: v1.0.0", "git tag v1.0.0");
        assert!(line.starts_with("Tag created: v1.0.0 "));
        assert!(line.contains("> git tag v1.0.0"));
    }

    #[test]
    fn test_format_versions() {
        let text = format_versions("1.0.0", "1.1.0");
        assert!(text.contains("Old version: "));
        assert!(text.contains("1.1.0"));
    }
}
