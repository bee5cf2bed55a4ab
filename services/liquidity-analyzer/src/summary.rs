//! Summary aggregation over volume series
//!
//! Pure functions; no state. Timestamps are assumed to be non-decreasing
//! within each series (caller-guaranteed input ordering). Nothing here
//! re-sorts: a reversed span is reported as "not computable" (zero).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::ExchangeId;
use types::numeric::{from_f64, SECONDS_PER_HOUR};

use crate::tracker::{ExchangeTracker, VolumeSeries};

/// Sum of every estimate in `series`; zero when empty.
pub fn total_volume(series: &VolumeSeries) -> Decimal {
    series.total()
}

/// Seconds between the earliest first point and the latest last point of
/// the two series. `None` when either series is empty.
pub fn time_span(bids: &VolumeSeries, asks: &VolumeSeries) -> Option<f64> {
    let first = bids.first_timestamp()?.min(asks.first_timestamp()?);
    let last = bids.last_timestamp()?.max(asks.last_timestamp()?);
    Some(last - first)
}

/// Average consumed notional per hour across both sides.
///
/// `(total_bids + total_asks) / span * 3600`. Zero when either series is
/// empty or the span is not positive.
pub fn hourly_rate(bids: &VolumeSeries, asks: &VolumeSeries) -> Decimal {
    let span = match time_span(bids, asks).and_then(from_f64) {
        Some(span) if span > Decimal::ZERO => span,
        _ => return Decimal::ZERO,
    };

    let total = total_volume(bids).saturating_add(total_volume(asks));
    total
        .checked_mul(SECONDS_PER_HOUR)
        .and_then(|scaled| scaled.checked_div(span))
        .unwrap_or(Decimal::ZERO)
}

/// Per-exchange summary exposed to reports and callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeSummary {
    pub exchange: ExchangeId,
    pub total_bids_volume: Decimal,
    pub total_asks_volume: Decimal,
    pub total_volume: Decimal,
    pub avg_hourly_volume: Decimal,
    pub snapshots: u64,
    pub bids_samples: usize,
    pub asks_samples: usize,
    pub first_timestamp: Option<f64>,
    pub last_timestamp: Option<f64>,
    /// Largest single bids estimate as `(timestamp, volume)`.
    pub peak_bids: Option<(f64, Decimal)>,
    /// Largest single asks estimate as `(timestamp, volume)`.
    pub peak_asks: Option<(f64, Decimal)>,
}

/// Build the summary for one tracker.
pub fn summarize(tracker: &ExchangeTracker) -> ExchangeSummary {
    let bids = tracker.bids_series();
    let asks = tracker.asks_series();

    let total_bids_volume = total_volume(bids);
    let total_asks_volume = total_volume(asks);

    let first_timestamp = match (bids.first_timestamp(), asks.first_timestamp()) {
        (Some(b), Some(a)) => Some(b.min(a)),
        (b, a) => b.or(a),
    };
    let last_timestamp = match (bids.last_timestamp(), asks.last_timestamp()) {
        (Some(b), Some(a)) => Some(b.max(a)),
        (b, a) => b.or(a),
    };

    ExchangeSummary {
        exchange: tracker.exchange().clone(),
        total_bids_volume,
        total_asks_volume,
        total_volume: total_bids_volume.saturating_add(total_asks_volume),
        avg_hourly_volume: hourly_rate(bids, asks),
        snapshots: tracker.snapshots_seen(),
        bids_samples: bids.len(),
        asks_samples: asks.len(),
        first_timestamp,
        last_timestamp,
        peak_bids: bids.peak(),
        peak_asks: asks.peak(),
    }
}
