//! Price levels and book sides
//!
//! A venue publishes only the top *K* levels of each side. A `SideSnapshot`
//! is that visible window, kept in the venue's own priority order:
//! bids descending by price, asks ascending by price (best first).
//! Levels beyond *K* are invisible, not absent from the real book.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::BookError;
use crate::numeric::parse_non_negative;

/// Side of the book a snapshot window belongs to
///
/// Fixes the expected sort order of a side and which price comparison means
/// "closer to the inside of the book".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    /// Resting buy interest, best (highest) price first
    Bids,
    /// Resting sell interest, best (lowest) price first
    Asks,
}

impl BookSide {
    /// Both sides, bids first.
    pub const ALL: [BookSide; 2] = [BookSide::Bids, BookSide::Asks];

    /// Whether price `a` sits strictly closer to the inside of the book than `b`.
    pub fn is_better(&self, a: Decimal, b: Decimal) -> bool {
        match self {
            BookSide::Bids => a > b,
            BookSide::Asks => a < b,
        }
    }

    /// Whether price `a` sits strictly further from the inside of the book than `b`.
    pub fn is_worse(&self, a: Decimal, b: Decimal) -> bool {
        self.is_better(b, a)
    }

    /// Lowercase label used in logs and exports.
    pub fn label(&self) -> &'static str {
        match self {
            BookSide::Bids => "bids",
            BookSide::Asks => "asks",
        }
    }
}

/// A single visible price level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLevel {
    pub price: Decimal,
    pub quantity: Decimal,
}

impl OrderLevel {
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }

    /// Build a level from the raw `[price, quantity]` strings a venue logs.
    ///
    /// Rejects levels whose notional does not fit in a `Decimal`.
    pub fn parse(price: &str, quantity: &str) -> Result<Self, BookError> {
        let level = Self {
            price: parse_non_negative(price, "price")?,
            quantity: parse_non_negative(quantity, "quantity")?,
        };
        if level.price.checked_mul(level.quantity).is_none() {
            return Err(BookError::NotionalOverflow {
                price: price.to_string(),
                quantity: quantity.to_string(),
            });
        }
        Ok(level)
    }

    /// Quote-currency notional resting at this level (`price * quantity`).
    ///
    /// Saturates at `Decimal::MAX` for levels built directly with `new`.
    pub fn volume(&self) -> Decimal {
        self.price.saturating_mul(self.quantity)
    }
}

/// The visible window of one side of one exchange's book at one instant
///
/// Levels are stored exactly as observed. The constructor does not sort:
/// consumers rely on the venue's published order and treat an unsorted
/// window as a precondition violation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SideSnapshot {
    levels: Vec<OrderLevel>,
}

impl SideSnapshot {
    pub fn new(levels: Vec<OrderLevel>) -> Self {
        Self { levels }
    }

    /// Parse raw `(price, quantity)` string pairs, preserving their order.
    pub fn parse<'a, I>(raw: I) -> Result<Self, BookError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let levels = raw
            .into_iter()
            .enumerate()
            .map(|(index, (price, quantity))| {
                OrderLevel::parse(price, quantity).map_err(|e| e.at_level(index))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[OrderLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Top-of-book level, if the window is not empty.
    pub fn best(&self) -> Option<&OrderLevel> {
        self.levels.first()
    }

    /// Whether prices are strictly ordered best-first for `side`.
    ///
    /// Diagnostic only; reconciliation never re-sorts. Equal adjacent prices
    /// count as unsorted.
    pub fn is_sorted_for(&self, side: BookSide) -> bool {
        self.levels
            .windows(2)
            .all(|pair| side.is_better(pair[0].price, pair[1].price))
    }
}

impl From<Vec<OrderLevel>> for SideSnapshot {
    fn from(levels: Vec<OrderLevel>) -> Self {
        Self::new(levels)
    }
}
