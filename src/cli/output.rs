//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.
//! The `*_text` helpers only format, so commands and the menu shell can write
//! them to any writer. Only `error` prints directly, from `main`.

use std::time::Duration;

use colored::{ColoredString, Colorize};
use itertools::Itertools;

use crate::domain::CourseRecord;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Success status line (green checkmark)
pub fn success_text(msg: &(impl std::fmt::Display + ?Sized)) -> String {
    format!("{} {}", "✓".green(), msg)
}

/// Failure status line (red X, indented)
pub fn failure_item_text(msg: &(impl std::fmt::Display + ?Sized)) -> String {
    format!("  {} {}", "✗".red(), msg)
}

/// Section header (cyan bold)
pub fn header_text(msg: &(impl std::fmt::Display + ?Sized)) -> ColoredString {
    msg.to_string().cyan().bold()
}

/// Warning line (yellow "Warning:" prefix) for an injected error writer
pub fn warning_text(msg: &(impl std::fmt::Display + ?Sized)) -> String {
    format!("{}: {}", "Warning".yellow(), msg)
}

/// Red text for menu errors
pub fn failure_text(msg: &(impl std::fmt::Display + ?Sized)) -> ColoredString {
    msg.to_string().red()
}

/// Yellow elapsed-time line, e.g. `  Printed in 0.042ms`
pub fn timing_text(label: &str, elapsed: Duration) -> ColoredString {
    format!("  {} {:.3}ms", label, elapsed.as_secs_f64() * 1000.0).yellow()
}

/// `Prerequisites: A B` or `Prerequisites: None`
pub fn prerequisites_text(course: &CourseRecord) -> String {
    if course.has_prerequisites() {
        format!("Prerequisites: {}", course.prerequisites.iter().join(" "))
    } else {
        "Prerequisites: None".to_string()
    }
}

/// Two-line course detail: `ID: Name` and its prerequisites.
pub fn course_detail_text(course: &CourseRecord) -> String {
    format!("{}\n{}", course, prerequisites_text(course))
}
