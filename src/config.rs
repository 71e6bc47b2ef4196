//! Run configuration

use crate::DEFAULT_PROVIDERS;

/// Settings for one scan run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Capability providers to try, in order. Empty disables detection.
    pub providers: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            providers: DEFAULT_PROVIDERS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl ScanConfig {
    pub fn with_providers<I, S>(providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            providers: providers.into_iter().map(Into::into).collect(),
        }
    }

    /// Configuration that never binds a provider
    pub fn without_detection() -> Self {
        Self {
            providers: Vec::new(),
        }
    }
}
