//! Pattern detector adapter
//!
//! Binds a labeling capability once, from an ordered list of provider names, then runs it
//! against each symbol's table and turns the label column into [`PatternMatch`]es. Every
//! failure inside the capability is absorbed here: the adapter logs it and reports no
//! patterns for that symbol.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::{
    detectors::{NoopLabeler, PatternLabeler},
    scan::{Detect, PatternMatch},
    CapabilityError, LabeledTable, NormalizedTable, Period, LABEL_COLUMN, PATTERN_WINDOW,
};

// ============================================================
// PROVIDER REGISTRY
// ============================================================

type LabelerFactory =
    Box<dyn Fn() -> Result<Box<dyn PatternLabeler>, CapabilityError> + Send + Sync>;

/// Named capability providers, looked up in caller-supplied order
pub struct ProviderRegistry {
    providers: Vec<(String, LabelerFactory)>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProviderRegistry {
    /// Registry with no providers; every resolution falls back to the no-op labeler.
    pub fn empty() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Registry with the providers compiled into this build.
    pub fn builtin() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::empty();
        #[cfg(feature = "head-shoulders")]
        {
            registry = registry.register("head-shoulders", || {
                Ok(Box::new(crate::detectors::HeadShoulderLabeler::with_defaults())
                    as Box<dyn PatternLabeler>)
            });
        }
        registry
    }

    /// Add a provider. A later registration under the same name replaces the earlier one.
    pub fn register<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn PatternLabeler>, CapabilityError> + Send + Sync + 'static,
    {
        let name = name.into();
        self.providers.retain(|(n, _)| *n != name);
        self.providers.push((name, Box::new(factory)));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|(n, _)| n.as_str())
    }

    /// Bind the first provider in `order` whose factory succeeds.
    ///
    /// Unknown names are treated as absent. Factory errors are recorded and the walk moves
    /// on. When nothing binds, the no-op labeler is returned.
    pub fn resolve<S: AsRef<str>>(&self, order: &[S]) -> Resolution {
        let mut failures = Vec::new();

        for name in order {
            let name: &str = name.as_ref();
            let Some((_, factory)) = self.providers.iter().find(|(n, _)| n == name) else {
                debug!(provider = name, "pattern provider not found");
                continue;
            };
            match factory() {
                Ok(labeler) => {
                    info!(provider = name, "pattern provider bound");
                    return Resolution {
                        labeler,
                        provider: Some(name.to_string()),
                        failures,
                    };
                }
                Err(error) => {
                    warn!(provider = name, %error, "pattern provider failed to load");
                    failures.push(error);
                }
            }
        }

        info!("no pattern provider available, detection disabled");
        Resolution {
            labeler: Box::new(NoopLabeler),
            provider: None,
            failures,
        }
    }
}

/// Outcome of capability resolution
pub struct Resolution {
    pub labeler: Box<dyn PatternLabeler>,
    /// Name of the bound provider; `None` when the no-op labeler was bound
    pub provider: Option<String>,
    /// Providers that were found but failed to load, in search order
    pub failures: Vec<CapabilityError>,
}

impl Resolution {
    #[inline]
    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }
}

// ============================================================
// ADAPTER
// ============================================================

/// Runs a bound capability against normalized tables
pub struct PatternDetectorAdapter {
    labeler: Box<dyn PatternLabeler>,
    provider: Option<String>,
    window: Period,
}

impl PatternDetectorAdapter {
    /// Wrap an already-bound labeler
    pub fn new(labeler: Box<dyn PatternLabeler>) -> Self {
        let provider = Some(labeler.name().to_string());
        Self {
            labeler,
            provider,
            window: PATTERN_WINDOW,
        }
    }

    /// Adapter that never finds anything
    pub fn disabled() -> Self {
        Self::from(ProviderRegistry::empty().resolve::<&str>(&[]))
    }

    /// Resolve a provider from `registry` in `order` and wrap it
    pub fn resolve<S: AsRef<str>>(registry: &ProviderRegistry, order: &[S]) -> Self {
        Self::from(registry.resolve(order))
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn window(&self) -> Period {
        self.window
    }

    /// Run the capability once on a copy of `table` and extract its matches.
    pub fn try_detect(
        &self,
        table: &NormalizedTable,
    ) -> Result<Vec<PatternMatch>, CapabilityError> {
        let copy = table.clone();
        let labeled = catch_unwind(AssertUnwindSafe(|| {
            self.labeler.label_patterns(copy, self.window)
        }))
        .map_err(|payload| CapabilityError::Panicked(panic_message(payload.as_ref())))??;

        extract_matches(&labeled, table.len())
    }
}

impl From<Resolution> for PatternDetectorAdapter {
    fn from(resolution: Resolution) -> Self {
        Self {
            labeler: resolution.labeler,
            provider: resolution.provider,
            window: PATTERN_WINDOW,
        }
    }
}

impl Detect for PatternDetectorAdapter {
    fn detect(&self, table: &NormalizedTable, symbol: &str) -> crate::Result<Vec<PatternMatch>> {
        match self.try_detect(table) {
            Ok(matches) => Ok(matches),
            Err(error) => {
                warn!(symbol, labeler = self.labeler.name(), %error, "pattern detection failed");
                Ok(Vec::new())
            }
        }
    }
}

/// Turn the label column into matches, in row order.
fn extract_matches(
    labeled: &LabeledTable,
    expected_rows: usize,
) -> Result<Vec<PatternMatch>, CapabilityError> {
    if labeled.len() != expected_rows {
        return Err(CapabilityError::RowCountMismatch {
            expected: expected_rows,
            got: labeled.len(),
        });
    }
    let Some(column) = labeled.column(LABEL_COLUMN) else {
        return Ok(Vec::new());
    };
    if column.values.len() != expected_rows {
        return Err(CapabilityError::RowCountMismatch {
            expected: expected_rows,
            got: column.values.len(),
        });
    }

    let matches = column
        .values
        .iter()
        .zip(&labeled.table.date)
        .filter_map(|(label, date)| {
            let kind = label.as_deref()?.trim();
            (!kind.is_empty()).then(|| PatternMatch {
                kind: kind.to_string(),
                date: date.render(),
            })
        })
        .collect();
    Ok(matches)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================
// TESTS
// ============================================================
