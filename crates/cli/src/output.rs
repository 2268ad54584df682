//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use clap::ValueEnum;
use knocker_api_client::format::Tone;
use owo_colors::OwoColorize;
use serde::Serialize;

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tables and status lines
    #[default]
    Text,
    /// Pretty-printed JSON of the underlying view model
    Json,
}

impl OutputFormat {
    /// Whether JSON was requested
    #[must_use]
    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(console::measure_text_width(message)));
    }

    /// Print a dimmed `label: value` line
    pub fn field(label: &str, value: &str) {
        println!("  {} {}", format!("{label}:").dimmed(), value);
    }
}

/// Colour `text` by tone: green for success, red for destructive, dim for
/// muted
#[must_use]
pub fn paint(text: &str, tone: Tone) -> String {
    match tone {
        Tone::Success => text.green().to_string(),
        Tone::Destructive => text.red().to_string(),
        Tone::Muted => text.dimmed().to_string(),
    }
}

/// Print `value` as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a duration for display
#[must_use]
pub fn format_duration(duration: std::time::Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else {
        format!("{:.1}s", duration.as_secs_f32())
    }
}

/// Format a count with singular/plural
#[must_use]
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "monitor", "monitors"), "1 monitor");
        assert_eq!(format_count(0, "monitor", "monitors"), "0 monitors");
    }

    #[test]
    fn test_paint_keeps_text() {
        let painted = paint("Operational", Tone::Success);
        assert_eq!(console::strip_ansi_codes(&painted), "Operational");
    }
}
