//! Application-level errors

use std::path::PathBuf;
use thiserror::Error;

/// Application errors: load lifecycle, data source and configuration failures.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("cannot load again, data was already loaded (refused {0})")]
    AlreadyLoaded(PathBuf),

    #[error("no data, catalog is empty")]
    EmptyCatalog,

    #[error("could not open file: {path}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
