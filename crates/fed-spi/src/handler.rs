//! Handler lifecycle contract.

use std::fmt::Debug;
use std::sync::Arc;

use fed_core::{classify, validate, ConfigurationError, ProviderConfig, ProviderType};
use fed_crypto::TrustKeyError;
use thiserror::Error;

use crate::config::{ChainConfig, HandlerConfig};
use crate::constants::CONFIGURATION;
use crate::request::HandlerRequest;
use crate::response::HandlerResponse;

/// Result type for handler callbacks.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Unexpected failure inside a handler.
///
/// Request-specific protocol failures are reported through
/// [`HandlerResponse::set_error`] instead.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Generic processing failure.
    #[error("processing error: {0}")]
    Processing(String),

    /// Configuration problem discovered while processing.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Key material could not be resolved.
    #[error(transparent)]
    TrustKey(#[from] TrustKeyError),

    /// The handler does not run on this side of the federation.
    #[error("handler does not support {0} chains")]
    UnsupportedHandlerType(ProviderType),
}

/// Configuration state every handler carries.
///
/// Embed it in a handler and return it from [`SamlHandler::base`]; the
/// provided trait methods take care of the rest.
#[derive(Debug, Clone, Default)]
pub struct HandlerBase {
    handler_config: Option<Arc<HandlerConfig>>,
    chain_config: Option<Arc<ChainConfig>>,
    provider_config: Option<Arc<ProviderConfig>>,
}

impl HandlerBase {
    /// Creates an uninitialized base.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the handler configuration.
    pub fn init_handler(&mut self, config: Arc<HandlerConfig>) {
        self.handler_config = Some(config);
    }

    /// Stores the chain configuration and validates its provider configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NullProvider`] or
    /// [`ConfigurationError::UnsupportedProviderType`].
    pub fn init_chain(&mut self, config: Arc<ChainConfig>) -> Result<(), ConfigurationError> {
        let provider = Arc::clone(validate(config.parameter(CONFIGURATION))?);
        self.provider_config = Some(provider);
        self.chain_config = Some(config);
        Ok(())
    }

    /// The handler type derived from the provider configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ChainNotInitialized`] before
    /// [`init_chain`](Self::init_chain) succeeded.
    pub fn handler_type(&self) -> Result<ProviderType, ConfigurationError> {
        self.provider_config
            .as_deref()
            .map(classify)
            .ok_or(ConfigurationError::ChainNotInitialized)
    }

    /// The handler configuration.
    #[must_use]
    pub fn handler_config(&self) -> Option<&HandlerConfig> {
        self.handler_config.as_deref()
    }

    /// The chain configuration.
    #[must_use]
    pub fn chain_config(&self) -> Option<&ChainConfig> {
        self.chain_config.as_deref()
    }

    /// The validated provider configuration.
    #[must_use]
    pub fn provider_config(&self) -> Option<&ProviderConfig> {
        self.provider_config.as_deref()
    }
}

/// A unit of the handler chain.
///
/// Handlers live as long as their chain and are reused by every invocation.
/// Any state a handler keeps between [`reset`](Self::reset) and
/// [`generate_request`](Self::generate_request) is protected by the chain
/// lock, so callbacks take `&mut self`.
pub trait SamlHandler: Send + Debug {
    /// The embedded configuration state.
    fn base(&self) -> &HandlerBase;

    /// The embedded configuration state, mutably.
    fn base_mut(&mut self) -> &mut HandlerBase;

    /// Name used for chain membership and logging.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Stores handler-local configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unusable.
    fn init_handler_config(&mut self, config: Arc<HandlerConfig>) -> Result<(), ConfigurationError> {
        self.base_mut().init_handler(config);
        Ok(())
    }

    /// Stores the chain configuration and validates the provider type.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider configuration is absent or unsupported.
    fn init_chain_config(&mut self, config: Arc<ChainConfig>) -> Result<(), ConfigurationError> {
        self.base_mut().init_chain(config)
    }

    /// Whether this handler runs at the IDP or the SP.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain configuration was never injected.
    fn handler_type(&self) -> Result<ProviderType, ConfigurationError> {
        self.base().handler_type()
    }

    /// Clears state left over from the previous chain run.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be cleared.
    fn reset(&mut self) -> HandlerResult<()> {
        Ok(())
    }

    /// Contributes to the outbound SAML request.
    ///
    /// # Errors
    ///
    /// Returns an error on unexpected internal failure.
    fn generate_request(
        &mut self,
        _request: &mut HandlerRequest<'_>,
        _response: &mut HandlerResponse,
    ) -> HandlerResult<()> {
        Ok(())
    }

    /// Processes an inbound status response.
    ///
    /// # Errors
    ///
    /// Returns an error on unexpected internal failure.
    fn handle_status_response(
        &mut self,
        _request: &mut HandlerRequest<'_>,
        _response: &mut HandlerResponse,
    ) -> HandlerResult<()> {
        Ok(())
    }
}
