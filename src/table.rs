//! Normalized five-column tables and the labeled tables capabilities return

use chrono::NaiveDate;
use serde_json::Value;

use crate::{bar::Bar, Result, MIN_BARS};

/// Canonical column names, in order
pub const COLUMNS: [&str; 5] = ["date", "Open", "High", "Low", "Close"];

// ============================================================
// DATE CELLS
// ============================================================

/// A table's date cell.
///
/// Normalization always produces `Text`; a capability may hand back `Calendar` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateValue {
    Text(String),
    Calendar(NaiveDate),
}

impl DateValue {
    /// Render for output: calendar dates as `YYYY-MM-DD`, text as given
    pub fn render(&self) -> String {
        match self {
            DateValue::Text(s) => s.clone(),
            DateValue::Calendar(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

// ============================================================
// NORMALIZED TABLE
// ============================================================

/// Columnar `date, Open, High, Low, Close` table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedTable {
    pub date: Vec<DateValue>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

impl NormalizedTable {
    fn with_capacity(n: usize) -> Self {
        Self {
            date: Vec::with_capacity(n),
            open: Vec::with_capacity(n),
            high: Vec::with_capacity(n),
            low: Vec::with_capacity(n),
            close: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, bar: Bar) {
        self.date.push(DateValue::Text(bar.date));
        self.open.push(bar.open);
        self.high.push(bar.high);
        self.low.push(bar.low);
        self.close.push(bar.close);
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.date.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.date.is_empty()
    }
}

/// Normalize a symbol's raw bar records.
///
/// Returns `Ok(None)` when the series is shorter than [`MIN_BARS`]; a record that cannot
/// be parsed fails the whole series.
pub fn normalize(records: &[Value]) -> Result<Option<NormalizedTable>> {
    let mut table = NormalizedTable::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        table.push(Bar::from_record(record, index)?);
    }

    if table.len() < MIN_BARS {
        return Ok(None);
    }
    Ok(Some(table))
}

// ============================================================
// LABELED TABLE
// ============================================================

/// A named column of optional per-row labels
#[derive(Debug, Clone, PartialEq)]
pub struct LabelColumn {
    pub name: String,
    pub values: Vec<Option<String>>,
}

/// A normalized table augmented with label columns by a capability
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTable {
    pub table: NormalizedTable,
    pub labels: Vec<LabelColumn>,
}

impl LabeledTable {
    pub fn new(table: NormalizedTable) -> Self {
        Self {
            table,
            labels: Vec::new(),
        }
    }

    /// Add (or replace) a label column
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        let name = name.into();
        self.labels.retain(|c| c.name != name);
        self.labels.push(LabelColumn { name, values });
        self
    }

    pub fn column(&self, name: &str) -> Option<&LabelColumn> {
        self.labels.iter().find(|c| c.name == name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

// ============================================================
// TESTS
// ============================================================
