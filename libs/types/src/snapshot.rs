//! Per-exchange order-book snapshots
//!
//! One `ExchangeSnapshot` corresponds to one logged record: both visible
//! sides of a venue's book captured at a single instant.

use serde::{Deserialize, Serialize};

use crate::book::{BookSide, SideSnapshot};
use crate::errors::BookError;
use crate::ids::ExchangeId;

/// Both visible sides of one exchange's book at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeSnapshot {
    /// Capture time, Unix epoch seconds (fractional)
    pub timestamp: f64,
    /// Venue the snapshot was captured from
    pub exchange: ExchangeId,
    /// Bid window, best (highest) first
    pub bids: SideSnapshot,
    /// Ask window, best (lowest) first
    pub asks: SideSnapshot,
}

impl ExchangeSnapshot {
    /// Create a snapshot, rejecting non-finite timestamps.
    pub fn new(
        timestamp: f64,
        exchange: ExchangeId,
        bids: SideSnapshot,
        asks: SideSnapshot,
    ) -> Result<Self, BookError> {
        if !timestamp.is_finite() {
            return Err(BookError::InvalidTimestamp(timestamp.to_string()));
        }
        Ok(Self {
            timestamp,
            exchange,
            bids,
            asks,
        })
    }

    /// Window for the requested side.
    pub fn side(&self, side: BookSide) -> &SideSnapshot {
        match side {
            BookSide::Bids => &self.bids,
            BookSide::Asks => &self.asks,
        }
    }
}
