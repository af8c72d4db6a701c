//! Provider-type classification.
//!
//! Every handler works on exactly one side of the federation. The side is
//! derived from the active [`ProviderConfig`] and validated once, when the
//! chain configuration is injected into a handler.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigValue, ProviderConfig};
use crate::error::{ConfigResult, ConfigurationError};

/// The federation role a handler runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderType {
    /// Identity Provider.
    Idp,
    /// Service Provider.
    Sp,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idp => f.write_str("IDP"),
            Self::Sp => f.write_str("SP"),
        }
    }
}

/// Classifies a configuration: IDP for the identity provider variant, SP otherwise.
#[must_use]
pub const fn classify(config: &ProviderConfig) -> ProviderType {
    match config {
        ProviderConfig::IdentityProvider(_) => ProviderType::Idp,
        ProviderConfig::ServiceProvider(_) => ProviderType::Sp,
    }
}

/// Validates the value found under the configuration key of a chain config.
///
/// # Errors
///
/// - [`ConfigurationError::NullProvider`] when no value is present
/// - [`ConfigurationError::UnsupportedProviderType`] when the value is not a
///   provider configuration
pub fn validate(value: Option<&ConfigValue>) -> ConfigResult<&Arc<ProviderConfig>> {
    match value {
        None => Err(ConfigurationError::NullProvider),
        Some(ConfigValue::Provider(config)) => Ok(config),
        Some(other) => Err(ConfigurationError::UnsupportedProviderType(
            other.kind().to_string(),
        )),
    }
}
