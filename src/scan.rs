//! Batch orchestration
//!
//! Symbols are processed one at a time, in input order. Each symbol produces a
//! [`SymbolOutcome`]; the [`Report`] folds outcomes into its `results` and `errors` lists.
//! Nothing that goes wrong for one symbol can reach another.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{
    adapter::{PatternDetectorAdapter, ProviderRegistry},
    config::ScanConfig,
    table::normalize,
    NormalizedTable, Result, MIN_BARS,
};

// ============================================================
// REPORT TYPES
// ============================================================

/// One labeled pattern occurrence
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PatternMatch {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
}

/// Patterns found for one symbol
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SymbolResult {
    pub symbol: String,
    pub patterns: Vec<PatternMatch>,
}

/// Aggregate output of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Report {
    pub results: Vec<SymbolResult>,
    pub errors: Vec<String>,
}

/// What happened to a single symbol
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    /// Bar value absent, empty or not a list
    Skipped,
    /// Normalization rejected the series
    Rejected(String),
    /// Detection ran
    Detected(SymbolResult),
    /// The detector reported an error; the symbol is still listed with no patterns
    DetectFailed { result: SymbolResult, error: String },
}

/// Run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub total_scanned: usize,
    pub with_patterns: usize,
    pub errors: usize,
}

impl Report {
    pub fn push(&mut self, outcome: SymbolOutcome) {
        match outcome {
            SymbolOutcome::Skipped => {}
            SymbolOutcome::Rejected(error) => self.errors.push(error),
            SymbolOutcome::Detected(result) => self.results.push(result),
            SymbolOutcome::DetectFailed { result, error } => {
                self.errors.push(error);
                self.results.push(result);
            }
        }
    }

    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            total_scanned: self.results.len(),
            with_patterns: self.results.iter().filter(|r| !r.patterns.is_empty()).count(),
            errors: self.errors.len(),
        }
    }
}

// ============================================================
// DETECT
// ============================================================

/// Per-symbol detection step.
///
/// An `Err` is the orchestrator's outer boundary: the symbol is reported in both lists.
pub trait Detect {
    fn detect(&self, table: &NormalizedTable, symbol: &str) -> Result<Vec<PatternMatch>>;
}

impl<D: Detect + ?Sized> Detect for &D {
    fn detect(&self, table: &NormalizedTable, symbol: &str) -> Result<Vec<PatternMatch>> {
        (**self).detect(table, symbol)
    }
}

// ============================================================
// SCANNER
// ============================================================

/// Batch orchestrator
pub struct Scanner<D: Detect = PatternDetectorAdapter> {
    detector: D,
}

impl Scanner<PatternDetectorAdapter> {
    /// Resolve the configured providers from `registry` and build a scanner around them
    pub fn with_registry(registry: &ProviderRegistry, config: &ScanConfig) -> Self {
        Self::new(PatternDetectorAdapter::resolve(registry, config.providers.as_slice()))
    }
}

impl<D: Detect> Scanner<D> {
    pub fn new(detector: D) -> Self {
        Self { detector }
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Scan every symbol in `input`, in iteration order.
    pub fn scan(&self, input: &Map<String, Value>) -> Report {
        let mut report = Report::default();
        for (symbol, bars) in input {
            report.push(self.scan_symbol(symbol, bars));
        }

        let summary = report.summary();
        info!(
            total_scanned = summary.total_scanned,
            with_patterns = summary.with_patterns,
            errors = summary.errors,
            "scan complete"
        );
        report
    }

    /// Normalize and detect a single symbol.
    pub fn scan_symbol(&self, symbol: &str, bars: &Value) -> SymbolOutcome {
        let records = match bars.as_array() {
            Some(records) if !records.is_empty() => records,
            _ => {
                debug!(symbol, "skipping symbol without bars");
                return SymbolOutcome::Skipped;
            }
        };

        let table = match normalize(records) {
            Ok(Some(table)) => table,
            Ok(None) => {
                debug!(symbol, bars = records.len(), "not enough bars");
                return SymbolOutcome::Rejected(format!(
                    "{symbol}: not enough bars (need at least {MIN_BARS})"
                ));
            }
            Err(error) => {
                debug!(symbol, %error, "malformed bars");
                return SymbolOutcome::Rejected(format!("{symbol}: {error}"));
            }
        };

        let result = |patterns| SymbolResult {
            symbol: symbol.to_string(),
            patterns,
        };
        match self.detector.detect(&table, symbol) {
            Ok(patterns) => {
                debug!(symbol, rows = table.len(), found = patterns.len(), "scanned");
                SymbolOutcome::Detected(result(patterns))
            }
            Err(error) => SymbolOutcome::DetectFailed {
                result: result(Vec::new()),
                error: format!("{symbol}: {error}"),
            },
        }
    }
}

// ============================================================
// TESTS
// ============================================================
