//! Liquidity Analyzer
//!
//! Estimates consumed trading volume from periodic, fixed-depth order-book
//! snapshots, one or more venues at a time. Each snapshot only shows the top
//! *K* levels of each side, so levels constantly enter and leave the visible
//! window without trading; the reconciler separates that churn from
//! genuine consumption.
//!
//! # Architecture
//!
//! ```text
//! snapshot log (JSON lines)
//!        │
//!  ┌─────▼──────┐
//!  │ ingestion  │  ← lazy line reader + record decoder
//!  └─────┬──────┘
//!        │ ExchangeSnapshot
//!  ┌─────▼──────┐
//!  │  analyzer  │  ← routes by exchange id
//!  └─────┬──────┘
//!        │
//!  ┌─────▼──────┐     ┌───────────┐
//!  │  tracker   │────▶│ reconcile │  ← previous vs current window, per side
//!  └─────┬──────┘     └───────────┘
//!        │ VolumeSeries
//!  ┌─────▼──────┐
//!  │  summary   │  ← totals, hourly rate
//!  └─────┬──────┘
//!  ┌─────▼──────┐
//!  │   export   │  ← JSON report, results table
//!  └────────────┘
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod reconcile;
pub mod summary;
pub mod tracker;

pub use analyzer::{AnalyzerStats, LiquidityAnalyzer};
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use ingestion::{decode_line, ReaderStats, SnapshotReader};
pub use reconcile::{price_keyed_diff, reconcile, reconcile_detailed, ReconcilePolicy, Reconciliation};
pub use summary::{hourly_rate, summarize, total_volume, ExchangeSummary};
pub use tracker::{ExchangeTracker, ProcessOutcome, VolumeSeries};

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
