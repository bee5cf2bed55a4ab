//! Analyze consumed liquidity in an order-book snapshot log.
//!
//! ```bash
//! analyze-liquidity --input ORDER_BOOK.log --exchange EX1 --exchange EX2 \
//!     --output analysis.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use liquidity_analyzer::export::{build_report, render_table, write_to_file};
use liquidity_analyzer::{AnalyzerConfig, LiquidityAnalyzer, ReconcilePolicy, SnapshotReader};
use tracing_subscriber::EnvFilter;
use types::ids::ExchangeId;

#[derive(Parser, Debug)]
#[command(author, version, about = "Estimate consumed volume from order-book snapshots")]
struct Args {
    /// Snapshot log, one JSON record per line
    #[arg(short, long)]
    input: PathBuf,

    /// JSON configuration file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only analyze this exchange (repeatable)
    #[arg(short, long = "exchange")]
    exchanges: Vec<String>,

    /// Volume estimator: depth-window or price-keyed-diff
    #[arg(long)]
    policy: Option<ReconcilePolicy>,

    /// Skip malformed records instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Write the JSON report (summaries and raw series) here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_config(args: &Args) -> Result<AnalyzerConfig> {
    let mut config = match &args.config {
        Some(path) => AnalyzerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    for exchange in &args.exchanges {
        let id = ExchangeId::try_new(exchange.clone())
            .with_context(|| format!("invalid --exchange value {exchange:?}"))?;
        config = config.with_exchange(id);
    }
    if let Some(policy) = args.policy {
        config = config.with_policy(policy);
    }
    if args.skip_invalid {
        config = config.with_skip_invalid(true);
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = build_config(&args)?;
    let mut reader = SnapshotReader::open(&args.input)?.skip_invalid(config.skip_invalid);
    let mut analyzer = LiquidityAnalyzer::new(config);

    analyzer
        .run(reader.by_ref())
        .with_context(|| format!("analyzing {}", args.input.display()))?;

    let stats = reader.stats();
    tracing::info!(
        lines_read = stats.lines_read,
        records_decoded = stats.records_decoded,
        records_skipped = stats.records_skipped,
        "Snapshot log consumed"
    );
    drop(reader);

    print!("{}", render_table(&analyzer.summaries()));

    if let Some(path) = &args.output {
        write_to_file(&build_report(&analyzer), path)
            .with_context(|| format!("writing report {}", path.display()))?;
        tracing::info!(path = %path.display(), "Report written");
    }

    Ok(())
}
