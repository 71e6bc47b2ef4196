//! Rolling-window head-and-shoulders labeler
//!
//! Marks the row where a shoulder confirms: the row's High dips below both neighbours while
//! the rolling High maximum (the head) still towers over them. The inverse pattern mirrors
//! this on Low. Only `High` and `Low` are read.

use super::{
    helpers::{neighbours, rolling_max, rolling_min},
    PatternLabeler,
};
use crate::{CapabilityError, LabeledTable, NormalizedTable, Period, LABEL_COLUMN};

pub const HEAD_AND_SHOULDER: &str = "Head and Shoulder";
pub const INVERSE_HEAD_AND_SHOULDER: &str = "Inverse Head and Shoulder";

/// Built-in `head-shoulders` provider
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadShoulderLabeler;

impl HeadShoulderLabeler {
    pub fn with_defaults() -> Self {
        Self
    }

    /// Compute the per-row label column for the given High/Low series.
    pub fn label(&self, high: &[f64], low: &[f64], window: Period) -> Vec<Option<String>> {
        let high_max = rolling_max(high, window.get());
        let low_min = rolling_min(low, window.get());

        (0..high.len())
            .map(|i| {
                // Inverse is evaluated last and wins when both hold
                if is_inverse(low, low_min[i], i) {
                    Some(INVERSE_HEAD_AND_SHOULDER.to_string())
                } else if is_head_shoulder(high, high_max[i], i) {
                    Some(HEAD_AND_SHOULDER.to_string())
                } else {
                    None
                }
            })
            .collect()
    }
}

fn is_head_shoulder(high: &[f64], head: Option<f64>, i: usize) -> bool {
    let (Some(head), (Some(prev), Some(next))) = (head, neighbours(high, i)) else {
        return false;
    };
    head > prev && head > next && high[i] < prev && high[i] < next
}

fn is_inverse(low: &[f64], trough: Option<f64>, i: usize) -> bool {
    let (Some(trough), (Some(prev), Some(next))) = (trough, neighbours(low, i)) else {
        return false;
    };
    trough < prev && trough < next && low[i] > prev && low[i] > next
}

impl PatternLabeler for HeadShoulderLabeler {
    fn name(&self) -> &str {
        "head-shoulders"
    }

    fn label_patterns(
        &self,
        table: NormalizedTable,
        window: Period,
    ) -> Result<LabeledTable, CapabilityError> {
        if table.high.len() != table.len() || table.low.len() != table.len() {
            return Err(CapabilityError::Failed(
                "High/Low columns do not match the date column".to_string(),
            ));
        }
        let labels = self.label(&table.high, &table.low, window);
        Ok(LabeledTable::new(table).with_column(LABEL_COLUMN, labels))
    }
}

// ============================================================
// TESTS
// ============================================================
