//! Multi-exchange liquidity analyzer
//!
//! Routes snapshots by exchange to their `ExchangeTracker`, owning all
//! per-exchange reconciliation state in one explicit map. Snapshots are
//! processed strictly in arrival order; each exchange's state only ever
//! depends on that exchange's previous snapshot.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info, warn};
use types::book::BookSide;
use types::ids::ExchangeId;
use types::snapshot::ExchangeSnapshot;

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::summary::{summarize, ExchangeSummary};
use crate::tracker::{ExchangeTracker, ProcessOutcome};

/// Counters collected over an analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzerStats {
    /// Snapshots routed to a tracker.
    pub snapshots_processed: u64,
    /// Snapshots dropped because their exchange is not tracked.
    pub snapshots_ignored: u64,
    /// Snapshots whose timestamp went backwards for their exchange.
    pub out_of_order: BTreeMap<ExchangeId, u64>,
    /// Side windows not strictly ordered best-first (processed as-is).
    pub unsorted_windows: u64,
}

impl AnalyzerStats {
    pub fn total_out_of_order(&self) -> u64 {
        self.out_of_order.values().sum()
    }
}

/// Coordinates one tracker per exchange.
pub struct LiquidityAnalyzer {
    config: AnalyzerConfig,
    trackers: BTreeMap<ExchangeId, ExchangeTracker>,
    stats: AnalyzerStats,
}

impl LiquidityAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        info!(
            policy = %config.policy,
            exchanges = config.exchanges.len(),
            skip_invalid = config.skip_invalid,
            "LiquidityAnalyzer initialized"
        );

        Self {
            config,
            trackers: BTreeMap::new(),
            stats: AnalyzerStats::default(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(AnalyzerConfig::default())
    }

    /// Route one snapshot to its exchange's tracker.
    ///
    /// Returns `None` when the exchange is filtered out by configuration.
    /// Timestamps going backwards are logged and counted, never re-sorted.
    pub fn process(&mut self, snapshot: &ExchangeSnapshot) -> Option<ProcessOutcome> {
        if !self.config.tracks(&snapshot.exchange) {
            self.stats.snapshots_ignored += 1;
            debug!(exchange = %snapshot.exchange, "Ignoring untracked exchange");
            return None;
        }

        let policy = self.config.policy;
        let tracker = self
            .trackers
            .entry(snapshot.exchange.clone())
            .or_insert_with(|| {
                debug!(exchange = %snapshot.exchange, "Tracking new exchange");
                ExchangeTracker::with_policy(snapshot.exchange.clone(), policy)
            });

        if let Some(last) = tracker.last_timestamp() {
            if snapshot.timestamp < last {
                warn!(
                    exchange = %snapshot.exchange,
                    last_timestamp = last,
                    received_timestamp = snapshot.timestamp,
                    "Non-monotonic snapshot timestamp"
                );
                *self
                    .stats
                    .out_of_order
                    .entry(snapshot.exchange.clone())
                    .or_insert(0) += 1;
            }
        }

        for side in BookSide::ALL {
            if !snapshot.side(side).is_sorted_for(side) {
                warn!(
                    exchange = %snapshot.exchange,
                    side = side.label(),
                    timestamp = snapshot.timestamp,
                    "Unsorted book window"
                );
                self.stats.unsorted_windows += 1;
            }
        }

        self.stats.snapshots_processed += 1;
        Some(tracker.process(snapshot))
    }

    /// Drain a snapshot source to exhaustion.
    ///
    /// Stops at the first error the source yields. Progress is logged every
    /// `progress_interval` records.
    pub fn run<I>(&mut self, source: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<ExchangeSnapshot>>,
    {
        let start = Instant::now();
        let interval = self.config.progress_interval;
        let mut records: u64 = 0;

        info!("Starting snapshot analysis");

        for snapshot in source {
            let snapshot = snapshot?;
            self.process(&snapshot);
            records += 1;

            if interval > 0 && records % interval == 0 {
                info!(
                    records,
                    exchanges = self.trackers.len(),
                    last_timestamp = snapshot.timestamp,
                    "Analysis progress"
                );
            }
        }

        info!(
            records,
            processed = self.stats.snapshots_processed,
            ignored = self.stats.snapshots_ignored,
            out_of_order = self.stats.total_out_of_order(),
            unsorted_windows = self.stats.unsorted_windows,
            exchanges = self.trackers.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Snapshot analysis completed"
        );

        Ok(())
    }

    pub fn tracker(&self, exchange: &ExchangeId) -> Option<&ExchangeTracker> {
        self.trackers.get(exchange)
    }

    /// Trackers in exchange-id order.
    pub fn trackers(&self) -> impl Iterator<Item = &ExchangeTracker> {
        self.trackers.values()
    }

    pub fn exchanges(&self) -> impl Iterator<Item = &ExchangeId> {
        self.trackers.keys()
    }

    /// Summaries for every tracked exchange, in exchange-id order.
    pub fn summaries(&self) -> Vec<ExchangeSummary> {
        self.trackers.values().map(summarize).collect()
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn stats(&self) -> &AnalyzerStats {
        &self.stats
    }
}
