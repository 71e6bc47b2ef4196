//! Strict bar record and the loose-record parser that feeds it
//!
//! Input bars arrive as JSON objects whose keys may be short (`t`, `o`, `h`, `l`, `c`) or
//! long (`date`, `open`, `high`, `low`, `close`). The short key wins whenever it is present,
//! even if its value turns out to be unusable.

use serde_json::{Map, Value};

use crate::{Result, ScanError};

// ============================================================
// FIELD ALIASES
// ============================================================

/// (short key, long key) for the date field
const DATE_KEYS: (&str, &str) = ("t", "date");
const OPEN_KEYS: (&str, &str) = ("o", "open");
const HIGH_KEYS: (&str, &str) = ("h", "high");
const LOW_KEYS: (&str, &str) = ("l", "low");
const CLOSE_KEYS: (&str, &str) = ("c", "close");

// ============================================================
// BAR
// ============================================================

/// One trading day
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(date: impl Into<String>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date: date.into(),
            open,
            high,
            low,
            close,
        }
    }

    /// Parse a loosely-typed bar record.
    ///
    /// `index` is the record's position in its series and only feeds error messages.
    pub fn from_record(record: &Value, index: usize) -> Result<Self> {
        let fields = record.as_object().ok_or(ScanError::InvalidRecord {
            index,
            kind: json_kind(record),
        })?;

        Ok(Self {
            date: lookup(fields, DATE_KEYS).map(render_date).unwrap_or_default(),
            open: price(fields, OPEN_KEYS, "open", index)?,
            high: price(fields, HIGH_KEYS, "high", index)?,
            low: price(fields, LOW_KEYS, "low", index)?,
            close: price(fields, CLOSE_KEYS, "close", index)?,
        })
    }
}

// ============================================================
// COERCION
// ============================================================

#[inline]
fn lookup<'a>(fields: &'a Map<String, Value>, (short, long): (&str, &str)) -> Option<&'a Value> {
    fields.get(short).or_else(|| fields.get(long))
}

fn price(
    fields: &Map<String, Value>,
    keys: (&str, &str),
    field: &'static str,
    index: usize,
) -> Result<f64> {
    match lookup(fields, keys) {
        None => Ok(0.0),
        Some(value) => coerce_f64(value).ok_or_else(|| ScanError::NonNumeric {
            index,
            field,
            value: value.to_string(),
        }),
    }
}

/// Coerce a present JSON value to `f64`.
///
/// Numbers pass through, strings are parsed after trimming, booleans map to 1.0 / 0.0.
/// Everything else (null, arrays, objects) is rejected.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Dates are passthrough: strings as-is, null as empty, anything else as its JSON text.
///
/// A null date renders as `""` rather than the literal text `None`.
fn render_date(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================
// TESTS
// ============================================================
