//! Configuration errors.
//!
//! Raised while the handler chain is being assembled. They are fatal to the
//! current operation and are never retried.

use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;

/// Errors raised by invalid or missing provider configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// No provider configuration was supplied.
    #[error("provider configuration is missing")]
    NullProvider,

    /// The supplied configuration is neither an IDP nor an SP configuration.
    #[error("unsupported provider type: {0}")]
    UnsupportedProviderType(String),

    /// A handler was asked for its type before the chain config was set.
    #[error("handler chain configuration has not been initialized")]
    ChainNotInitialized,

    /// Any other invalid setting.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
