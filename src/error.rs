use std::io;
use thiserror::Error;

/// Error type for loading and exporting delimited tables.
///
/// Unreadable input and empty results are not errors: loading reports them
/// as "nothing to load" instead.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// IO error while writing results.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV writer error.
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;
