//! Error types for header parsing.

use thiserror::Error;

/// Result type for header readers.
pub type HeaderResult<T> = Result<T, HeaderError>;

/// Errors raised while reading product headers.
#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error in {file}: {message}")]
    Xml { file: String, message: String },

    #[error("Missing required header field: {0}")]
    MissingField(String),

    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: String, value: String },

    #[error("Not an EPS product: {0}")]
    NotEps(String),
}

impl HeaderError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn invalid(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }
}
