//! Handler and chain configuration bundles.
//!
//! Both are built once when the chain is assembled and shared read-only by
//! every handler afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use fed_core::{ConfigValue, ProviderConfig};

use crate::constants::CONFIGURATION;

/// Handler-local parameters.
#[derive(Debug, Clone, Default)]
pub struct HandlerConfig {
    parameters: HashMap<String, ConfigValue>,
}

impl HandlerConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Gets a parameter.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&ConfigValue> {
        self.parameters.get(key)
    }

    /// Gets a string parameter.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&str> {
        self.parameter(key).and_then(ConfigValue::as_str)
    }

    /// Gets a boolean parameter, falling back to `default`.
    #[must_use]
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.parameter(key)
            .and_then(ConfigValue::as_bool)
            .unwrap_or(default)
    }
}

/// Chain-wide parameters.
///
/// Must carry the active provider configuration under
/// [`CONFIGURATION`](crate::constants::CONFIGURATION).
#[derive(Debug, Clone, Default)]
pub struct ChainConfig {
    parameters: HashMap<String, ConfigValue>,
}

impl ChainConfig {
    /// Creates a chain configuration for the given provider.
    #[must_use]
    pub fn new(provider: impl Into<Arc<ProviderConfig>>) -> Self {
        Self::empty().with_parameter(CONFIGURATION, ConfigValue::Provider(provider.into()))
    }

    /// Creates a chain configuration without any parameter.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Gets a parameter.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&ConfigValue> {
        self.parameters.get(key)
    }
}
