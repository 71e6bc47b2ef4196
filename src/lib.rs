//! # pattern-scan
//!
//! Batch chart-pattern scanner for multi-symbol daily bar series.
//!
//! The pipeline reads one JSON document mapping symbols to bar arrays, normalizes each
//! series into a fixed five-column table, hands the table to a pattern-labeling capability
//! and folds every per-symbol outcome into a single [`Report`].
//!
//! ## Quick Start
//!
//! ```rust
//! use pattern_scan::prelude::*;
//!
//! let input: serde_json::Map<String, serde_json::Value> = serde_json::from_str(
//!     r#"{ "XYZ": [ { "t": "2024-01-02", "o": 1, "h": 2, "l": 0.5, "c": 1.5 } ] }"#,
//! )
//! .unwrap();
//!
//! let scanner = Scanner::with_registry(&ProviderRegistry::builtin(), &ScanConfig::default());
//! let report = scanner.scan(&input);
//!
//! assert!(report.results.is_empty());
//! assert_eq!(report.errors, vec!["XYZ: not enough bars (need at least 20)".to_string()]);
//! ```

pub mod adapter;
pub mod bar;
pub mod config;
pub mod detectors;
pub mod io;
pub mod scan;
pub mod table;
pub mod telemetry;

pub use adapter::{PatternDetectorAdapter, ProviderRegistry, Resolution};
pub use bar::Bar;
pub use config::ScanConfig;
pub use io::{load, load_from_reader, write_report, Source};
pub use scan::{Detect, PatternMatch, Report, ScanSummary, Scanner, SymbolOutcome, SymbolResult};
pub use table::{normalize, DateValue, LabelColumn, LabeledTable, NormalizedTable};

pub mod prelude {
    pub use crate::{
        // Capability
        detectors::{NoopLabeler, PatternLabeler},
        // Adapter
        PatternDetectorAdapter,
        ProviderRegistry,
        Resolution,
        // Data model
        Bar,
        DateValue,
        LabelColumn,
        LabeledTable,
        NormalizedTable,
        PatternMatch,
        Report,
        SymbolResult,
        // Orchestration
        Detect,
        ScanConfig,
        ScanSummary,
        Scanner,
        SymbolOutcome,
        // I/O
        load,
        load_from_reader,
        normalize,
        write_report,
        Source,
        // Errors
        CapabilityError,
        Period,
        Result,
        ScanError,
        // Constants
        DEFAULT_PROVIDERS,
        LABEL_COLUMN,
        MIN_BARS,
        PATTERN_WINDOW,
    };
}

// ============================================================
// CONSTANTS
// ============================================================

/// Minimum number of bars a series needs before it is handed to a detector.
pub const MIN_BARS: usize = 20;

/// Rolling window width passed to the labeling capability.
pub const PATTERN_WINDOW: Period = Period::new_const(20);

/// Name of the label column a capability adds to the table.
pub const LABEL_COLUMN: &str = "head_shoulder_pattern";

/// Provider search order used when nothing else is configured.
pub const DEFAULT_PROVIDERS: &[&str] = &["head-shoulders"];

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors raised by the scanning pipeline
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("malformed input JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bar {index} is not an object (got {kind})")]
    InvalidRecord { index: usize, kind: &'static str },

    #[error("bar {index}: field `{field}` is not numeric ({value})")]
    NonNumeric {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("detection failed: {0}")]
    Detection(String),
}

/// Errors raised by, or while resolving, a pattern-labeling capability
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CapabilityError {
    #[error("provider `{name}` is unavailable: {reason}")]
    Unavailable { name: String, reason: String },

    #[error("labeled table is missing column `{0}`")]
    MissingColumn(String),

    #[error("labeled table has {got} rows, expected {expected}")]
    RowCountMismatch { expected: usize, got: usize },

    #[error("labeling failed: {0}")]
    Failed(String),

    #[error("labeler panicked: {0}")]
    Panicked(String),
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Period (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period; `None` for zero
    pub fn new(value: usize) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

// ============================================================
// TESTS
// ============================================================
