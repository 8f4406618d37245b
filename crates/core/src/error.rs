//! Wire-level validation error model.

use thiserror::Error;

/// Result type used when turning wire input into domain values.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Malformed or missing input detected before any storage access.
///
/// Length limits are not part of this taxonomy; those are enforced by the
/// storage schema and surface as repository errors at commit time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The payload was not a JSON object at all.
    #[error("Invalid Product: body of request contained bad or no data {0}")]
    BadBody(String),

    /// A required key was absent.
    #[error("Invalid Product: missing {0}")]
    MissingField(&'static str),

    /// A key was present with the wrong JSON type.
    #[error("Invalid Product: {field} must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    /// Price was numeric but below zero.
    #[error("Invalid Product: price must not be negative (got {0})")]
    NegativePrice(String),

    /// Price could not be read as a decimal number.
    #[error("Invalid Product: price is not a decimal number ({0})")]
    InvalidPrice(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl ValidationError {
    pub fn bad_body(msg: impl Into<String>) -> Self {
        Self::BadBody(msg.into())
    }

    pub fn invalid_type(field: &'static str, expected: &'static str) -> Self {
        Self::InvalidType { field, expected }
    }

    pub fn invalid_price(msg: impl Into<String>) -> Self {
        Self::InvalidPrice(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
