//! End-to-end tests for the liquidity analyzer
//!
//! Feeds snapshot logs through the reader, analyzer, summary and export
//! layers and checks the estimates produced for realistic sequences.
//!
//! Tests include:
//! - Two interleaved venues
//! - Depth-window churn vs. genuine sweeps
//! - Policy comparison on the same log
//! - Malformed input handling
//! - Deterministic re-runs

use std::io::{Cursor, Write};

use liquidity_analyzer::export::{build_report, export_json};
use liquidity_analyzer::{
    AnalyzerConfig, AnalyzerError, LiquidityAnalyzer, ReconcilePolicy, SnapshotReader,
};
use rust_decimal::Decimal;
use serde_json::json;
use types::book::BookSide;
use types::ids::ExchangeId;

fn record(ts: f64, exchange: &str, bids: &[(&str, &str)], asks: &[(&str, &str)]) -> String {
    json!({
        "timestamp": ts,
        "exchange": exchange,
        "bids": bids.iter().map(|(p, q)| vec![*p, *q]).collect::<Vec<_>>(),
        "asks": asks.iter().map(|(p, q)| vec![*p, *q]).collect::<Vec<_>>(),
    })
    .to_string()
}

fn run(log: &str, config: AnalyzerConfig) -> LiquidityAnalyzer {
    let reader = SnapshotReader::new(Cursor::new(log.to_string())).skip_invalid(config.skip_invalid);
    let mut analyzer = LiquidityAnalyzer::new(config);
    analyzer.run(reader).unwrap();
    analyzer
}

/// Window of five levels per side that drifts up by one tick every snapshot
/// without any quantity changing: pure truncation churn.
fn drifting_log(exchange: &str, snapshots: usize) -> String {
    let mut lines = Vec::new();
    for k in 0..snapshots {
        let base = 100 + k as i64;
        let bids: Vec<(String, String)> =
            (0..5).map(|d| ((base - d).to_string(), "1".to_string())).collect();
        let asks: Vec<(String, String)> =
            (1..6).map(|d| ((base + d).to_string(), "1".to_string())).collect();
        let bids: Vec<(&str, &str)> = bids.iter().map(|(p, q)| (p.as_str(), q.as_str())).collect();
        let asks: Vec<(&str, &str)> = asks.iter().map(|(p, q)| (p.as_str(), q.as_str())).collect();
        lines.push(record(k as f64 * 60.0, exchange, &bids, &asks));
    }
    lines.join("\n")
}

#[test]
fn test_two_interleaved_venues() {
    let log = [
        record(0.0, "EX1", &[("100", "10")], &[("101", "10")]),
        record(1.0, "EX2", &[("200", "5")], &[("201", "5")]),
        record(1800.0, "EX1", &[("100", "7")], &[("101", "10")]),
        record(1801.0, "EX2", &[("200", "5")], &[("201", "4")]),
        record(3600.0, "EX1", &[("100", "7")], &[("101", "8")]),
        record(3601.0, "EX2", &[("200", "5")], &[("201", "4")]),
    ]
    .join("\n");

    let analyzer = run(&log, AnalyzerConfig::default());
    let summaries = analyzer.summaries();
    assert_eq!(summaries.len(), 2);

    let ex1 = &summaries[0];
    assert_eq!(ex1.exchange, ExchangeId::new("EX1"));
    assert_eq!(ex1.total_bids_volume, Decimal::from(300));
    assert_eq!(ex1.total_asks_volume, Decimal::from(202));
    // 502 over 1800 seconds
    assert_eq!(ex1.avg_hourly_volume, Decimal::from(1004));

    let ex2 = &summaries[1];
    assert_eq!(ex2.total_bids_volume, Decimal::ZERO);
    assert_eq!(ex2.total_asks_volume, Decimal::from(201));
    assert_eq!(ex2.bids_samples, 2);
    assert_eq!(ex2.asks_samples, 2);
}

#[test]
fn test_window_churn_is_not_consumption() {
    let analyzer = run(&drifting_log("EX1", 20), AnalyzerConfig::default());
    let summary = &analyzer.summaries()[0];

    // Bids: a better level enters each time and the worst one falls off.
    assert_eq!(summary.total_bids_volume, Decimal::ZERO);
    assert_eq!(summary.bids_samples, 19);
}

#[test]
fn test_price_keyed_diff_overcounts_churn() {
    let log = drifting_log("EX1", 20);
    let depth = run(&log, AnalyzerConfig::default());
    let naive = run(
        &log,
        AnalyzerConfig::default().with_policy(ReconcilePolicy::PriceKeyedDiff),
    );

    let depth_total = depth.summaries()[0].total_volume;
    let naive_total = naive.summaries()[0].total_volume;
    assert!(naive_total > depth_total);
    // Every step the worst bid (base - 4) and the best ask (base + 1) vanish.
    let expected: i64 = (0..19).map(|k| (100 + k - 4) + (100 + k + 1)).sum();
    assert_eq!(naive_total, Decimal::from(expected));
}

#[test]
fn test_ask_sweep_is_credited() {
    let log = [
        record(0.0, "EX1", &[], &[("101", "2"), ("102", "3"), ("103", "4")]),
        // 101 swept, 102 partially taken, new level 104 appears at the tail
        record(1.0, "EX1", &[], &[("102", "1"), ("103", "4"), ("104", "9")]),
    ]
    .join("\n");

    let analyzer = run(&log, AnalyzerConfig::default());
    let tracker = analyzer.tracker(&ExchangeId::new("EX1")).unwrap();
    assert_eq!(
        tracker.series(BookSide::Asks).volumes(),
        &[Decimal::from(202 + 204)]
    );
}

#[test]
fn test_allow_list_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"exchanges": ["EX2"]}}"#).unwrap();
    let config = AnalyzerConfig::from_file(file.path()).unwrap();

    let log = [
        record(0.0, "EX1", &[("100", "1")], &[]),
        record(0.0, "EX2", &[("100", "1")], &[]),
        record(1.0, "EX1", &[("100", "0")], &[]),
    ]
    .join("\n");
    let analyzer = run(&log, config);

    assert_eq!(analyzer.exchanges().collect::<Vec<_>>(), vec![&ExchangeId::new("EX2")]);
    assert_eq!(analyzer.stats().snapshots_ignored, 2);
}

#[test]
fn test_malformed_record_aborts_by_default() {
    let log = [
        record(0.0, "EX1", &[("100", "1")], &[]),
        record(1.0, "EX1", &[("1o0", "1")], &[]),
    ]
    .join("\n");

    let reader = SnapshotReader::new(Cursor::new(log));
    let mut analyzer = LiquidityAnalyzer::with_defaults();
    let err = analyzer.run(reader).unwrap_err();
    assert!(matches!(err, AnalyzerError::Book { line: 2, .. }));
}

#[test]
fn test_malformed_record_skipped_when_configured() {
    let log = [
        record(0.0, "EX1", &[("100", "5")], &[]),
        "{\"timestamp\": 1".to_string(),
        record(2.0, "EX1", &[("100", "4")], &[]),
    ]
    .join("\n");

    let analyzer = run(&log, AnalyzerConfig::default().with_skip_invalid(true));
    assert_eq!(analyzer.summaries()[0].total_bids_volume, Decimal::from(100));
}

#[test]
fn test_reruns_are_deterministic() {
    let log = drifting_log("EX1", 10) + "\n" + &drifting_log("EX2", 10);
    let a = build_report(&run(&log, AnalyzerConfig::default()));
    let b = build_report(&run(&log, AnalyzerConfig::default()));

    let strip = |report: &liquidity_analyzer::export::AnalysisReport| {
        let mut value: serde_json::Value =
            serde_json::from_str(&export_json(report).unwrap()).unwrap();
        value["generated_at"] = serde_json::Value::Null;
        value
    };
    assert_eq!(strip(&a), strip(&b));
}
