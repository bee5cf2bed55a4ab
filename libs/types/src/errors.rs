//! Error types for the snapshot model
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Errors raised while building book values from raw venue data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookError {
    #[error("Invalid decimal: {0:?}")]
    InvalidDecimal(String),

    #[error("Malformed level at index {index}: {reason}")]
    MalformedLevel { index: usize, reason: String },

    #[error("Negative {field}: {value}")]
    NegativeValue { field: &'static str, value: String },

    #[error("Level notional overflows: {price} x {quantity}")]
    NotionalOverflow { price: String, quantity: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Empty exchange identifier")]
    EmptyExchange,
}

impl BookError {
    /// Attach a level index to a field-level error.
    pub fn at_level(self, index: usize) -> Self {
        match self {
            BookError::MalformedLevel { .. } => self,
            other => BookError::MalformedLevel {
                index,
                reason: other.to_string(),
            },
        }
    }
}
