//! Identifier types for venues
//!
//! Exchanges are identified by the free-form string the snapshot logger
//! writes into each record (e.g. `"BINANCE"`, `"EX1"`).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::BookError;

/// Identifier of the venue a snapshot was captured from
///
/// Ordered lexicographically so that per-exchange maps iterate
/// deterministically. Serialized as a bare string; deserialization goes
/// through `try_new`, so blank identifiers are rejected there too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExchangeId(String);

impl ExchangeId {
    /// Create an exchange id.
    ///
    /// # Panics
    /// Panics if the identifier is empty or whitespace only.
    pub fn new(id: impl Into<String>) -> Self {
        Self::try_new(id).expect("ExchangeId must not be empty")
    }

    /// Try to create an exchange id, rejecting blank identifiers.
    pub fn try_new(id: impl Into<String>) -> Result<Self, BookError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(BookError::EmptyExchange);
        }
        Ok(Self(id))
    }

    /// Get the identifier as written by the venue logger
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ExchangeId {
    type Error = BookError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::try_new(id)
    }
}

impl From<ExchangeId> for String {
    fn from(id: ExchangeId) -> Self {
        id.0
    }
}
