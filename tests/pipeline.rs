//! End-to-end tests for the scanning pipeline: JSON in, JSON report out.

#![cfg(feature = "head-shoulders")]

use pattern_scan::detectors::head_shoulder::{HEAD_AND_SHOULDER, INVERSE_HEAD_AND_SHOULDER};
use pattern_scan::prelude::*;
use serde_json::{json, Value};

// ============================================================
// TEST HELPERS
// ============================================================

/// Bars with steadily increasing prices
fn rising_bars(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                let base = 185.0 + i as f64 * 0.1;
                json!({ "t": format!("2024-01-{:02}", i + 1), "o": base, "h": base + 1.0, "l": base - 1.0, "c": base })
            })
            .collect(),
    )
}

/// Flat bars with the given High/Low overrides
fn shaped_bars(n: usize, highs: &[(usize, f64)], lows: &[(usize, f64)]) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                let h = highs.iter().find(|(row, _)| *row == i).map_or(100.0, |(_, v)| *v);
                let l = lows.iter().find(|(row, _)| *row == i).map_or(90.0, |(_, v)| *v);
                json!({ "t": format!("2024-01-{:02}", i + 1), "o": 95.0, "h": h, "l": l, "c": 95.0 })
            })
            .collect(),
    )
}

fn builtin_scanner() -> Scanner {
    Scanner::with_registry(&ProviderRegistry::builtin(), &ScanConfig::default())
}

fn run(scanner: &Scanner, input: &str) -> String {
    let map = load_from_reader(input.as_bytes()).unwrap();
    let report = scanner.scan(&map);
    let mut out = Vec::new();
    write_report(&report, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn run_json(scanner: &Scanner, input: &Value) -> Value {
    serde_json::from_str(&run(scanner, &input.to_string())).unwrap()
}

struct PanickingLabeler;

impl PatternLabeler for PanickingLabeler {
    fn name(&self) -> &str {
        "panicking"
    }

    fn label_patterns(
        &self,
        _table: NormalizedTable,
        _window: Period,
    ) -> std::result::Result<LabeledTable, CapabilityError> {
        panic!("index out of bounds")
    }
}

// ============================================================
// SCENARIOS
// ============================================================

#[test]
fn test_scenario_rising_series() {
    let out = run_json(&builtin_scanner(), &json!({ "AAPL": rising_bars(25) }));

    let results = out["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["symbol"], "AAPL");
    assert!(results[0]["patterns"].is_array());
    assert_eq!(out["errors"], json!([]));
}

#[test]
fn test_scenario_short_series() {
    let out = run_json(&builtin_scanner(), &json!({ "XYZ": rising_bars(5) }));
    assert_eq!(
        out,
        json!({ "results": [], "errors": ["XYZ: not enough bars (need at least 20)"] })
    );
}

#[test]
fn test_scenario_empty_series_skipped() {
    let out = run_json(&builtin_scanner(), &json!({ "A": rising_bars(25), "B": [] }));

    let results = out["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["symbol"], "A");
    assert_eq!(out["errors"], json!([]));
}

#[test]
fn test_non_list_values_skipped() {
    let out = run_json(
        &builtin_scanner(),
        &json!({ "A": null, "B": "bars", "C": 12, "D": { "t": "2024-01-01" } }),
    );
    assert_eq!(out, json!({ "results": [], "errors": [] }));
}

#[test]
fn test_empty_object() {
    assert_eq!(
        run(&builtin_scanner(), "{}"),
        "{\n  \"results\": [],\n  \"errors\": []\n}\n"
    );
}

#[test]
fn test_non_object_document() {
    assert_eq!(
        run(&builtin_scanner(), "[1, 2, 3]"),
        "{\n  \"results\": [],\n  \"errors\": []\n}\n"
    );
}

#[test]
fn test_malformed_document_is_fatal() {
    assert!(matches!(
        load_from_reader("{\"AAPL\": [".as_bytes()),
        Err(ScanError::Json(_))
    ));
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("pattern-scan-{}.json", std::process::id()));
    std::fs::write(&path, json!({ "AAPL": rising_bars(25) }).to_string()).unwrap();

    let map = load(&Source::Path(path.clone())).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(map.contains_key("AAPL"));
    let table = normalize(map["AAPL"].as_array().unwrap()).unwrap().unwrap();
    assert_eq!(table.len(), 25);
}

// ============================================================
// DETECTION
// ============================================================

#[test]
fn test_head_and_shoulder_detected() {
    // Head at row 10, shoulder dip confirms at row 25
    let bars = shaped_bars(30, &[(10, 120.0), (24, 105.0), (25, 101.0), (26, 103.0)], &[]);
    let out = run_json(&builtin_scanner(), &json!({ "HS": bars }));

    assert_eq!(
        out["results"][0]["patterns"],
        json!([{ "type": HEAD_AND_SHOULDER, "date": "2024-01-26" }])
    );
}

#[test]
fn test_inverse_head_and_shoulder_detected() {
    let bars = shaped_bars(30, &[], &[(10, 70.0), (24, 85.0), (25, 89.0), (26, 87.0)]);
    let out = run_json(&builtin_scanner(), &json!({ "IHS": bars }));

    assert_eq!(
        out["results"][0]["patterns"],
        json!([{ "type": INVERSE_HEAD_AND_SHOULDER, "date": "2024-01-26" }])
    );
}

#[test]
fn test_capability_absent() {
    let bars = shaped_bars(30, &[(10, 120.0), (24, 105.0), (25, 101.0), (26, 103.0)], &[]);
    let scanner = Scanner::with_registry(&ProviderRegistry::empty(), &ScanConfig::default());
    assert!(!scanner.detector().is_available());

    let out = run_json(&scanner, &json!({ "HS": bars }));
    assert_eq!(
        out,
        json!({ "results": [{ "symbol": "HS", "patterns": [] }], "errors": [] })
    );
}

#[test]
fn test_detection_disabled_by_config() {
    let scanner = Scanner::with_registry(&ProviderRegistry::builtin(), &ScanConfig::without_detection());
    assert_eq!(scanner.detector().provider(), None);
}

#[test]
fn test_panicking_capability_absorbed() {
    let registry = ProviderRegistry::empty().register("explode", || {
        Ok(Box::new(PanickingLabeler) as Box<dyn PatternLabeler>)
    });
    let scanner = Scanner::with_registry(&registry, &ScanConfig::with_providers(["explode"]));

    let out = run_json(&scanner, &json!({ "A": rising_bars(25), "B": rising_bars(30) }));
    assert_eq!(
        out,
        json!({
            "results": [
                { "symbol": "A", "patterns": [] },
                { "symbol": "B", "patterns": [] }
            ],
            "errors": []
        })
    );
}

#[test]
fn test_failed_provider_falls_back() {
    let registry = ProviderRegistry::builtin().register("broken", || {
        Err(CapabilityError::Unavailable {
            name: "broken".into(),
            reason: "shared library missing".into(),
        })
    });
    let resolution = registry.resolve(&["broken", "head-shoulders"]);
    assert_eq!(resolution.failures.len(), 1);

    let scanner = Scanner::new(PatternDetectorAdapter::from(resolution));
    let bars = shaped_bars(30, &[(10, 120.0), (24, 105.0), (25, 101.0), (26, 103.0)], &[]);
    let out = run_json(&scanner, &json!({ "HS": bars }));
    assert_eq!(out["results"][0]["patterns"][0]["type"], HEAD_AND_SHOULDER);
}

// ============================================================
// PER-SYMBOL ISOLATION
// ============================================================

#[test]
fn test_bad_symbol_does_not_affect_others() {
    let mut bad = rising_bars(25);
    bad[0]["c"] = json!("abc");

    let out = run_json(
        &builtin_scanner(),
        &json!({ "GOOD": rising_bars(25), "BAD": bad, "SHORT": rising_bars(3), "LAST": rising_bars(20) }),
    );

    let symbols: Vec<_> = out["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["symbol"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(symbols, vec!["GOOD", "LAST"]);
    assert_eq!(
        out["errors"],
        json!([
            "BAD: bar 0: field `close` is not numeric (\"abc\")",
            "SHORT: not enough bars (need at least 20)"
        ])
    );
}

#[test]
fn test_symbol_order_preserved() {
    let input = format!(
        r#"{{"ZZZ": {bars}, "AAA": {bars}, "MMM": {bars}}}"#,
        bars = rising_bars(20)
    );
    let out: Value = serde_json::from_str(&run(&builtin_scanner(), &input)).unwrap();
    let symbols: Vec<_> = out["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["symbol"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(symbols, vec!["ZZZ", "AAA", "MMM"]);
}

#[test]
fn test_long_keys_and_numeric_strings() {
    let bars: Vec<Value> = (0..20)
        .map(|i| {
            json!({ "date": format!("2024-02-{:02}", i + 1), "open": "10.5", "high": "11", "low": 10, "close": 10.75 })
        })
        .collect();
    let out = run_json(&builtin_scanner(), &json!({ "LONG": bars }));
    assert_eq!(
        out,
        json!({ "results": [{ "symbol": "LONG", "patterns": [] }], "errors": [] })
    );
}

#[test]
fn test_idempotent_output() {
    let input = json!({
        "HS": shaped_bars(30, &[(10, 120.0), (24, 105.0), (25, 101.0), (26, 103.0)], &[]),
        "XYZ": rising_bars(5),
        "A": rising_bars(25),
        "B": [],
    })
    .to_string();

    let scanner = builtin_scanner();
    let first = run(&scanner, &input);
    let second = run(&builtin_scanner(), &input);
    assert_eq!(first, second);
    assert_eq!(first, run(&scanner, &input));
}
