//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent catalog data that cannot become a course record.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{reason} ({line})")]
    MalformedLine { line: String, reason: String },

    /// `line` is the lossy rendering of the raw bytes.
    #[error("invalid UTF-8 after byte {valid_up_to} ({line})")]
    InvalidEncoding { line: String, valid_up_to: usize },
}

impl DomainError {
    pub(crate) fn malformed(line: &str, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}
