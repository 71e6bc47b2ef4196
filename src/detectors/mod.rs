//! Pattern-labeling capabilities
//!
//! A capability takes a [`NormalizedTable`] by value together with a rolling window width
//! and returns a [`LabeledTable`] of the same row count carrying one extra label column.
//! Rows where no pattern completes have an empty label.
//!
//! # Providers
//!
//! - **head-shoulders** (feature `head-shoulders`): rolling-window head-and-shoulders and
//!   inverse head-and-shoulders labeler.
//! - **noop**: bound when no provider resolves; labels nothing.

pub mod helpers;

#[cfg(feature = "head-shoulders")]
pub mod head_shoulder;

#[cfg(feature = "head-shoulders")]
pub use head_shoulder::HeadShoulderLabeler;

use crate::{CapabilityError, LabeledTable, NormalizedTable, Period, LABEL_COLUMN};

/// Object-safe pattern-labeling capability
pub trait PatternLabeler: Send + Sync {
    /// Provider name, used in logs
    fn name(&self) -> &str;

    /// Label `table` over a rolling `window`.
    ///
    /// The table is owned by the callee and may be mutated or returned as part of the result.
    fn label_patterns(
        &self,
        table: NormalizedTable,
        window: Period,
    ) -> Result<LabeledTable, CapabilityError>;
}

/// Capability bound when nothing else resolves: returns the table with an empty label column
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLabeler;

impl PatternLabeler for NoopLabeler {
    fn name(&self) -> &str {
        "noop"
    }

    fn label_patterns(
        &self,
        table: NormalizedTable,
        _window: Period,
    ) -> Result<LabeledTable, CapabilityError> {
        let rows = table.len();
        Ok(LabeledTable::new(table).with_column(LABEL_COLUMN, vec![None; rows]))
    }
}
