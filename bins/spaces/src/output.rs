//! Terminal output utilities
//!
//! Colors are applied only when the stream supports them.

use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".if_supports_color(Stream::Stdout, |t| t.green()), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".if_supports_color(Stream::Stderr, |t| t.red()), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".if_supports_color(Stream::Stderr, |t| t.yellow()), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".if_supports_color(Stream::Stdout, |t| t.blue()), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.if_supports_color(Stream::Stdout, |t| t.bold()));
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned key/value line
    pub fn field(key: &str, value: impl std::fmt::Display) {
        println!(
            "  {:<12} {}",
            key.if_supports_color(Stream::Stdout, |t| t.dimmed()),
            value
        );
    }
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a coded error to stderr, as a JSON report when `json` is set
pub fn report_error(err: &spaces_core::Error, json: bool) {
    if json {
        if let Ok(report) = serde_json::to_string(&err.to_report()) {
            eprintln!("{report}");
            return;
        }
    }
    eprintln!("{} {}", "Error:".if_supports_color(Stream::Stderr, |t| t.red()), err);
}

/// `[lon, lat]` rounded for display
pub fn format_position([lon, lat]: [f64; 2]) -> String {
    format!("[{lon:.6}, {lat:.6}]")
}

/// Meters below 1 km, kilometers above
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{meters:.1} m")
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}
