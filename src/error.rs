//! Error types for the Performance Center core

use thiserror::Error;

/// Result type for Performance Center operations
pub type Result<T> = std::result::Result<T, PerformanceError>;

/// Performance Center error types
#[derive(Error, Debug)]
pub enum PerformanceError {
    /// Catalog JSON did not match the fund/category schema
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Presentation configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSV serialization failed
    #[error("Export error: {0}")]
    Export(String),

    /// Sort column key not in the table header set
    #[error("Unknown sort column: {0}")]
    UnknownColumn(String),

    /// Return variant key not recognised
    #[error("Unknown return variant: {0}")]
    UnknownVariant(String),
}

impl From<csv::Error> for PerformanceError {
    fn from(err: csv::Error) -> Self {
        PerformanceError::Export(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for PerformanceError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        PerformanceError::Export(err.to_string())
    }
}
