//! Analyzer configuration
//!
//! Defaults cover the common case (all exchanges, depth-window policy,
//! fail on the first malformed record). A JSON file can override any
//! subset of fields; the CLI applies its flags on top.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use types::ids::ExchangeId;

use crate::error::{AnalyzerError, Result};
use crate::reconcile::ReconcilePolicy;

/// Configuration for a liquidity analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Volume estimator applied to every reconciliation of the run.
    pub policy: ReconcilePolicy,
    /// Only these exchanges are tracked; empty means all.
    pub exchanges: BTreeSet<ExchangeId>,
    /// Skip malformed records with a warning instead of aborting.
    pub skip_invalid: bool,
    /// Log progress every N records read (0 disables).
    pub progress_interval: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            policy: ReconcilePolicy::DepthWindow,
            exchanges: BTreeSet::new(),
            skip_invalid: false,
            progress_interval: 100_000,
        }
    }
}

impl AnalyzerConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse a configuration from a JSON document.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| AnalyzerError::Config(e.to_string()))
    }

    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Restrict tracking to the given exchange (may be called repeatedly).
    pub fn with_exchange(mut self, exchange: ExchangeId) -> Self {
        self.exchanges.insert(exchange);
        self
    }

    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Whether records from `exchange` should be tracked.
    pub fn tracks(&self, exchange: &ExchangeId) -> bool {
        self.exchanges.is_empty() || self.exchanges.contains(exchange)
    }
}
