//! Per-exchange reconciliation state and volume series
//!
//! An `ExchangeTracker` owns, for one venue, the last seen window of each
//! side and the timestamped series of consumed-volume estimates. The first
//! snapshot only seeds state; every later snapshot appends one point per side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;
use types::book::{BookSide, SideSnapshot};
use types::ids::ExchangeId;
use types::snapshot::ExchangeSnapshot;

use crate::reconcile::ReconcilePolicy;

/// Append-only series of consumed-volume estimates for one exchange side.
///
/// `timestamps[k]` is the capture time of the newer snapshot of the k-th
/// reconciled pair and `volumes[k]` its estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeSeries {
    timestamps: Vec<f64>,
    volumes: Vec<Decimal>,
}

impl VolumeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one reconciled point.
    pub fn push(&mut self, timestamp: f64, volume: Decimal) {
        self.timestamps.push(timestamp);
        self.volumes.push(volume);
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn volumes(&self) -> &[Decimal] {
        &self.volumes
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<f64> {
        self.timestamps.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.timestamps.last().copied()
    }

    /// Sum of all estimates (zero for an empty series), saturating at
    /// `Decimal::MAX`.
    pub fn total(&self) -> Decimal {
        self.volumes
            .iter()
            .copied()
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Point with the largest estimate; earliest wins on ties.
    pub fn peak(&self) -> Option<(f64, Decimal)> {
        self.iter()
            .fold(None, |best: Option<(f64, Decimal)>, (ts, v)| match best {
                Some((_, best_v)) if best_v >= v => best,
                _ => Some((ts, v)),
            })
    }

    /// `(timestamp, volume)` pairs in append order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, Decimal)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.volumes.iter().copied())
    }
}

/// Estimates produced by one `ExchangeTracker::process` call.
///
/// `None` for a side means it had no prior window (first snapshot).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub bids: Option<Decimal>,
    pub asks: Option<Decimal>,
}

impl ProcessOutcome {
    pub fn side(&self, side: BookSide) -> Option<Decimal> {
        match side {
            BookSide::Bids => self.bids,
            BookSide::Asks => self.asks,
        }
    }

    fn set(&mut self, side: BookSide, volume: Decimal) {
        match side {
            BookSide::Bids => self.bids = Some(volume),
            BookSide::Asks => self.asks = Some(volume),
        }
    }
}

/// Reconciliation state for a single exchange.
#[derive(Debug, Clone)]
pub struct ExchangeTracker {
    exchange: ExchangeId,
    policy: ReconcilePolicy,
    prev_bids: Option<SideSnapshot>,
    prev_asks: Option<SideSnapshot>,
    bids_series: VolumeSeries,
    asks_series: VolumeSeries,
    snapshots_seen: u64,
    last_timestamp: Option<f64>,
}

impl ExchangeTracker {
    /// Create a tracker using the default depth-window policy.
    pub fn new(exchange: ExchangeId) -> Self {
        Self::with_policy(exchange, ReconcilePolicy::default())
    }

    pub fn with_policy(exchange: ExchangeId, policy: ReconcilePolicy) -> Self {
        Self {
            exchange,
            policy,
            prev_bids: None,
            prev_asks: None,
            bids_series: VolumeSeries::new(),
            asks_series: VolumeSeries::new(),
            snapshots_seen: 0,
            last_timestamp: None,
        }
    }

    /// Reconcile both sides of `snapshot` against the stored windows.
    ///
    /// Each side with a stored window gets one series point at
    /// `snapshot.timestamp`. The stored window is then replaced by the
    /// incoming one, including on the first call.
    pub fn process(&mut self, snapshot: &ExchangeSnapshot) -> ProcessOutcome {
        let mut outcome = ProcessOutcome::default();

        for side in BookSide::ALL {
            let incoming = snapshot.side(side);
            let policy = self.policy;
            let (prev, series) = self.state_mut(side);

            if let Some(prior) = prev.as_ref() {
                let volume = policy.apply(incoming, prior, side);
                trace!(side = side.label(), volume = %volume, "Side reconciled");
                series.push(snapshot.timestamp, volume);
                outcome.set(side, volume);
            }
            *prev = Some(incoming.clone());
        }

        self.snapshots_seen += 1;
        self.last_timestamp = Some(snapshot.timestamp);

        trace!(
            exchange = %self.exchange,
            timestamp = snapshot.timestamp,
            bids = ?outcome.bids,
            asks = ?outcome.asks,
            "Snapshot reconciled"
        );

        outcome
    }

    fn state_mut(&mut self, side: BookSide) -> (&mut Option<SideSnapshot>, &mut VolumeSeries) {
        match side {
            BookSide::Bids => (&mut self.prev_bids, &mut self.bids_series),
            BookSide::Asks => (&mut self.prev_asks, &mut self.asks_series),
        }
    }

    pub fn exchange(&self) -> &ExchangeId {
        &self.exchange
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    /// Series for the requested side.
    pub fn series(&self, side: BookSide) -> &VolumeSeries {
        match side {
            BookSide::Bids => &self.bids_series,
            BookSide::Asks => &self.asks_series,
        }
    }

    pub fn bids_series(&self) -> &VolumeSeries {
        &self.bids_series
    }

    pub fn asks_series(&self) -> &VolumeSeries {
        &self.asks_series
    }

    /// Last stored window for `side`, if any snapshot has been seen.
    pub fn previous(&self, side: BookSide) -> Option<&SideSnapshot> {
        match side {
            BookSide::Bids => self.prev_bids.as_ref(),
            BookSide::Asks => self.prev_asks.as_ref(),
        }
    }

    pub fn snapshots_seen(&self) -> u64 {
        self.snapshots_seen
    }

    /// Timestamp of the most recently processed snapshot.
    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }
}
