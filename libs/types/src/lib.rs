//! Types library for the liquidity analyzer
//!
//! Value types describing what a venue publishes in one order-book snapshot:
//! a truncated, best-first window of price levels per side.
//!
//! # Modules
//! - `ids`: Exchange identifiers
//! - `numeric`: Decimal parsing and conversion helpers
//! - `book`: Price levels, book sides and side snapshots
//! - `snapshot`: Timestamped per-exchange snapshots
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod numeric;
pub mod book;
pub mod snapshot;
pub mod errors;
