//! Side reconciler
//!
//! Compares two consecutive visible windows of the same book side and
//! estimates how much resting notional was consumed between them.
//!
//! A naive price-keyed diff treats every level that leaves the window as
//! consumed, but a fixed-depth window also loses levels when better prices
//! enter at the top and push the worst ones past the truncation depth. The
//! depth-window reconciler walks both windows best-first with a drift offset
//! and only credits a vanished level once the book is shown to continue at a
//! later matching price.
//!
//! Precondition for every function here: both windows are sorted best-first
//! for the given side. This is not checked; an unsorted window produces an
//! unspecified (but non-panicking, non-negative) estimate.
//!
//! Notional arithmetic saturates at `Decimal::MAX` instead of overflowing.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::book::{BookSide, SideSnapshot};

/// Which volume estimator a run uses.
///
/// Exactly one policy applies to every reconciliation of an analyzer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcilePolicy {
    /// Two-pointer alignment; unconfirmed tail removals are discarded.
    #[default]
    DepthWindow,
    /// Per-price diff; every quantity reduction counts, including levels
    /// that merely fell out of the visible window.
    PriceKeyedDiff,
}

impl ReconcilePolicy {
    /// Estimate consumed notional between `old_side` and `new_side`.
    pub fn apply(&self, new_side: &SideSnapshot, old_side: &SideSnapshot, side: BookSide) -> Decimal {
        match self {
            ReconcilePolicy::DepthWindow => reconcile(new_side, old_side, side),
            ReconcilePolicy::PriceKeyedDiff => price_keyed_diff(new_side, old_side),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReconcilePolicy::DepthWindow => "depth-window",
            ReconcilePolicy::PriceKeyedDiff => "price-keyed-diff",
        }
    }
}

impl fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReconcilePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "depth-window" => Ok(ReconcilePolicy::DepthWindow),
            "price-keyed-diff" => Ok(ReconcilePolicy::PriceKeyedDiff),
            other => Err(format!(
                "unknown policy {other:?} (expected depth-window or price-keyed-diff)"
            )),
        }
    }
}

/// Breakdown of a single depth-window reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Estimated consumed notional (`confirmed_removals + level_reductions`).
    pub volume: Decimal,
    /// Notional of vanished levels credited once a later level matched.
    pub confirmed_removals: Decimal,
    /// Notional of quantity shrinkage at prices present in both windows.
    pub level_reductions: Decimal,
    /// Notional of vanished levels never reconfirmed before a window ran out.
    pub discarded_tail: Decimal,
    /// Prices present in both windows at the aligned position.
    pub matched_levels: usize,
    /// New levels that appeared at a better price than the aligned old level.
    pub entered_levels: usize,
    /// Old levels that dropped out of the aligned window.
    pub vanished_levels: usize,
}

/// Estimate consumed notional on one side between two consecutive windows.
///
/// Always `>= 0`. See [`reconcile_detailed`] for the breakdown.
pub fn reconcile(new_side: &SideSnapshot, old_side: &SideSnapshot, side: BookSide) -> Decimal {
    reconcile_detailed(new_side, old_side, side).volume
}

/// Depth-window reconciliation with a per-category breakdown.
///
/// Walks the new window with `i` and the old window with `j = i + offset`,
/// where `offset` is the drift caused by levels present in only one window:
///
/// - new price better than old: a level entered ahead of the old one;
///   advance the new pointer only (offset shrinks). Not evidence of consumption.
/// - new price worse than old: the old level left the aligned window, either
///   consumed or pushed past the truncation depth. Stage its full notional
///   and advance the old pointer only (offset grows).
/// - equal prices: the book continues here, so staged notional is credited.
///   Any quantity shrinkage at this price is added too. Advance both.
///
/// Staged notional still pending when either window runs out is discarded:
/// the estimator undercounts near the tail of the visible depth rather than
/// counting truncation churn as consumption.
pub fn reconcile_detailed(
    new_side: &SideSnapshot,
    old_side: &SideSnapshot,
    side: BookSide,
) -> Reconciliation {
    let new_levels = new_side.levels();
    let old_levels = old_side.levels();

    let mut result = Reconciliation::default();
    let mut unmatched_volume = Decimal::ZERO;

    // i indexes new_levels, j = i + offset indexes old_levels; j never decreases.
    let mut i = 0usize;
    let mut j = 0usize;

    while i < new_levels.len() && j < old_levels.len() {
        let cur = &new_levels[i];
        let prior = &old_levels[j];

        if side.is_better(cur.price, prior.price) {
            result.entered_levels += 1;
            i += 1;
        } else if side.is_worse(cur.price, prior.price) {
            result.vanished_levels += 1;
            unmatched_volume = unmatched_volume.saturating_add(prior.volume());
            j += 1;
        } else {
            result.matched_levels += 1;
            if unmatched_volume > Decimal::ZERO {
                result.confirmed_removals =
                    result.confirmed_removals.saturating_add(unmatched_volume);
            }
            unmatched_volume = Decimal::ZERO;

            let level_delta = (prior.quantity - cur.quantity).saturating_mul(cur.price);
            if level_delta > Decimal::ZERO {
                result.level_reductions = result.level_reductions.saturating_add(level_delta);
            }
            i += 1;
            j += 1;
        }
    }

    if unmatched_volume > Decimal::ZERO {
        result.discarded_tail = unmatched_volume;
    }
    result.volume = result
        .confirmed_removals
        .saturating_add(result.level_reductions);
    result
}

/// Price-keyed diff between two windows.
///
/// Every old price is looked up in the new window (missing = zero quantity)
/// and any positive reduction is credited at that price. Additions never
/// count. Window truncation shows up here as consumption.
pub fn price_keyed_diff(new_side: &SideSnapshot, old_side: &SideSnapshot) -> Decimal {
    let current: BTreeMap<Decimal, Decimal> = new_side
        .levels()
        .iter()
        .map(|level| (level.price, level.quantity))
        .collect();

    old_side
        .levels()
        .iter()
        .map(|prior| {
            let new_qty = current.get(&prior.price).copied().unwrap_or(Decimal::ZERO);
            let delta = (prior.quantity - new_qty).saturating_mul(prior.price);
            delta.max(Decimal::ZERO)
        })
        .fold(Decimal::ZERO, Decimal::saturating_add)
}
