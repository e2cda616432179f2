//! Harness configuration

use std::env;

/// Environment variable that switches testing off when set to any non-empty value.
pub const DISABLE_ENV: &str = "DISABLE_TESTING";

/// Default absolute tolerance for `similar()`.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Harness configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Skip paired-test lookup, execution and reporting entirely
    pub disabled: bool,
    /// Absolute tolerance used by `similar()` when none is given
    pub tolerance: f64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl HarnessConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the disable toggle from `DISABLE_TESTING`.
    pub fn from_env() -> Self {
        let value = env::var_os(DISABLE_ENV);
        Self::from_env_value(value.as_deref().map(|v| v.to_string_lossy()).as_deref())
    }

    /// Build a config from the raw value of the disable toggle, as `from_env` would see it.
    ///
    /// Any non-empty value disables testing, including `"0"` and `"false"`.
    pub fn from_env_value(value: Option<&str>) -> Self {
        Self::default().with_disabled(value.is_some_and(|v| !v.is_empty()))
    }

    /// Enable or disable testing
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the default `similar()` tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}
