//! Cargo-style output formatting
//!
//! Status lines go to stderr so `--dry-run` and `list` output on stdout stays
//! pipeable.

/// ANSI color codes
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD_GREEN: &str = "\x1b[1;32m";
    pub const BOLD_CYAN: &str = "\x1b[1;36m";
    pub const BOLD_YELLOW: &str = "\x1b[1;33m";
    pub const BOLD_RED: &str = "\x1b[1;31m";
}

/// Check if terminal supports colors
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err() && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(true)
}

/// Print a status message in cargo style
/// Format: "   {status} {message}"
fn print_status(status: &str, color: &str, message: &str) {
    if supports_color() {
        eprintln!("{}{:>12}{} {}", color, status, colors::RESET, message);
    } else {
        eprintln!("{:>12} {}", status, message);
    }
}

/// Print "Compiling" status (green)
pub fn compiling(message: &str) {
    print_status("Compiling", colors::BOLD_GREEN, message);
}

/// Print "Finished" status (green)
pub fn finished(message: &str) {
    print_status("Finished", colors::BOLD_GREEN, message);
}

/// Print "Planning" status (cyan)
pub fn planning(message: &str) {
    print_status("Planning", colors::BOLD_CYAN, message);
}

/// Print "Skipping" status (yellow)
pub fn skipping(message: &str) {
    print_status("Skipping", colors::BOLD_YELLOW, message);
}

/// Print "Warning" status (yellow)
pub fn warning(message: &str) {
    print_status("Warning", colors::BOLD_YELLOW, message);
}

/// Print "Error" status (red)
pub fn error(message: &str) {
    print_status("Error", colors::BOLD_RED, message);
}

/// Format duration in human readable form
pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let secs = secs % 60.0;
        format!("{:.0}m {:.2}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.25), "250ms");
        assert_eq!(format_duration(1.5), "1.50s");
        assert_eq!(format_duration(75.0), "1m 15.00s");
    }
}
