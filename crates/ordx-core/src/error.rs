//! Error types for the ordx-core library.

use thiserror::Error;

/// Main error type for the ordx library.
#[derive(Error, Debug)]
pub enum OrdxError {
    /// Order field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Email order-link extraction error.
    #[error("email error: {0}")]
    Email(#[from] EmailError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to order field extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A matched money token could not be read as a decimal.
    #[error("malformed money value: {value:?}")]
    MalformedMoneyValue { value: String },

    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Errors related to email order-link extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// Period string is not `YYYY-MM` with a month in 1..=12.
    #[error("invalid period {0:?}, expected YYYY-MM")]
    InvalidPeriod(String),

    /// Order URL template cannot produce a URL.
    #[error("invalid order URL template: {0}")]
    InvalidUrl(String),
}

/// Result type for the ordx library.
pub type Result<T> = std::result::Result<T, OrdxError>;
