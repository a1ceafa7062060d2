//! Error types for dynval-core

use crate::ValueKind;
use thiserror::Error;

/// Core error type
///
/// Every failed read, coercion or capability call is reported through this
/// type. None of these are fatal; callers decide what a failure means.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Type mismatch: cannot convert {from} to {to}")]
    TypeMismatch { from: ValueKind, to: ValueKind },

    #[error("Parse failure: {input:?} is not a valid {to}")]
    ParseFailure { input: String, to: ValueKind },

    #[error("Empty value: nothing to convert to {to}")]
    EmptyValue { to: ValueKind },

    #[error("Out of range: {value} does not fit in {to}")]
    OutOfRange { value: String, to: ValueKind },

    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    #[error("Call failed: {0}")]
    Call(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Config(#[from] ron::error::SpannedError),
}

impl Error {
    /// Short, stable name of the failure kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::TypeMismatch { .. } => "type_mismatch",
            Error::ParseFailure { .. } => "parse_failure",
            Error::EmptyValue { .. } => "empty_value",
            Error::OutOfRange { .. } => "out_of_range",
            Error::PropertyNotFound(_) => "property_not_found",
            Error::Call(_) => "call",
            Error::Io(_) => "io",
            Error::Config(_) => "config",
        }
    }

    /// Whether this error came out of the coercion matrix
    pub fn is_conversion(&self) -> bool {
        matches!(
            self,
            Error::TypeMismatch { .. }
                | Error::ParseFailure { .. }
                | Error::EmptyValue { .. }
                | Error::OutOfRange { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
