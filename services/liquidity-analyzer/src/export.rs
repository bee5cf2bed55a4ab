//! Report export
//!
//! Serializes per-exchange summaries and the raw volume series to JSON for
//! external plotting, and renders the plain-text results table.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::LiquidityAnalyzer;
use crate::error::{AnalyzerError, Result};
use crate::reconcile::ReconcilePolicy;
use crate::summary::{summarize, ExchangeSummary};
use crate::tracker::VolumeSeries;

/// Summary plus raw series for one exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeReport {
    pub summary: ExchangeSummary,
    pub bids: VolumeSeries,
    pub asks: VolumeSeries,
}

/// Combined export containing every exchange of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub policy: ReconcilePolicy,
    pub snapshots_processed: u64,
    pub snapshots_ignored: u64,
    pub exchanges: Vec<ExchangeReport>,
}

/// Build a report from a finished analyzer.
pub fn build_report(analyzer: &LiquidityAnalyzer) -> AnalysisReport {
    let exchanges = analyzer
        .trackers()
        .map(|tracker| ExchangeReport {
            summary: summarize(tracker),
            bids: tracker.bids_series().clone(),
            asks: tracker.asks_series().clone(),
        })
        .collect();

    AnalysisReport {
        version: crate::VERSION.to_string(),
        generated_at: Utc::now(),
        policy: analyzer.config().policy,
        snapshots_processed: analyzer.stats().snapshots_processed,
        snapshots_ignored: analyzer.stats().snapshots_ignored,
        exchanges,
    }
}

/// Export a report as pretty-printed JSON.
pub fn export_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write a report to a file path.
pub fn write_to_file(report: &AnalysisReport, path: impl AsRef<Path>) -> Result<()> {
    let json = export_json(report)?;
    std::fs::write(path.as_ref(), json).map_err(AnalyzerError::Io)
}

fn format_timestamp(ts: Option<f64>) -> String {
    ts.and_then(|secs| {
        let whole = secs.floor();
        let nanos = ((secs - whole) * 1e9) as u32;
        DateTime::<Utc>::from_timestamp(whole as i64, nanos)
    })
    .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
    .unwrap_or_else(|| "-".to_string())
}

/// Render the results table printed at the end of a run.
pub fn render_table(summaries: &[ExchangeSummary]) -> String {
    let rule = "-".repeat(30);
    let mut out = String::new();

    let _ = writeln!(out, "--- RESULTS ---");
    let _ = writeln!(out, "{rule}");
    for s in summaries {
        let _ = writeln!(out, "{} bids volume: {:.2}", s.exchange, s.total_bids_volume);
        let _ = writeln!(out, "{} asks volume: {:.2}", s.exchange, s.total_asks_volume);
    }
    let _ = writeln!(out, "{rule}");
    for s in summaries {
        let _ = writeln!(
            out,
            "{} average hourly volume: {:.2}",
            s.exchange, s.avg_hourly_volume
        );
    }
    let _ = writeln!(out, "{rule}");
    for s in summaries {
        let _ = writeln!(
            out,
            "{} snapshots: {} ({} -> {})",
            s.exchange,
            s.snapshots,
            format_timestamp(s.first_timestamp),
            format_timestamp(s.last_timestamp)
        );
    }
    out
}
