//! Error types for the IRR pipeline

use thiserror::Error;

/// Fatal errors raised while reading snapshots, building accounts or
/// writing results. Solver non-convergence is not an error and never
/// shows up here.
#[derive(Error, Debug)]
pub enum IrrError {
    /// A snapshot referenced an account that was never created
    #[error("no account registered for identifier '{0}'")]
    UnknownAccount(String),

    #[error("source read failed: {0}")]
    Source(String),

    #[error("destination write failed: {0}")]
    Destination(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, IrrError>;
