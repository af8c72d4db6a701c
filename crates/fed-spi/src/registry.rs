//! Registry of named handler factories.
//!
//! Deployments list handlers by name; the registry turns that list into an
//! initialized [`HandlerChain`], preserving the configured order.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use fed_core::ConfigurationError;
use thiserror::Error;

use crate::chain::HandlerChain;
use crate::config::{ChainConfig, HandlerConfig};
use crate::handler::SamlHandler;

/// Error type for chain assembly.
#[derive(Debug, Error)]
pub enum SpiError {
    /// No factory is registered under the name.
    #[error("handler not found: {0}")]
    HandlerNotFound(String),

    /// The chain already contains a handler with this name.
    #[error("duplicate handler in chain: {0}")]
    DuplicateHandler(String),

    /// A handler rejected its configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Creates a fresh handler instance.
pub type HandlerFactory = Arc<dyn Fn() -> Box<dyn SamlHandler> + Send + Sync>;

/// Named handler factories.
#[derive(Default)]
pub struct HandlerRegistry {
    factories: DashMap<String, HandlerFactory>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `name`, replacing any previous one.
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn SamlHandler> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(handler = %name, "registered handler factory");
        self.factories.insert(name, Arc::new(factory));
    }

    /// Checks if a factory is registered.
    #[must_use]
    pub fn has_handler(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Lists registered names, sorted.
    #[must_use]
    pub fn list_handlers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Instantiates and initializes the named handlers in order.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is unknown, a handler appears twice, or a
    /// handler rejects its configuration.
    pub fn build_chain(
        &self,
        names: &[&str],
        handler_config: &Arc<HandlerConfig>,
        chain_config: &Arc<ChainConfig>,
    ) -> Result<HandlerChain, SpiError> {
        let chain = HandlerChain::new();
        for name in names {
            let factory = self
                .factories
                .get(*name)
                .map(|entry| Arc::clone(entry.value()))
                .ok_or_else(|| SpiError::HandlerNotFound((*name).to_string()))?;

            let mut handler = factory();
            handler.init_handler_config(Arc::clone(handler_config))?;
            handler.init_chain_config(Arc::clone(chain_config))?;
            chain.add(handler)?;
        }
        tracing::info!(handlers = chain.len(), "handler chain assembled");
        Ok(chain)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.list_handlers())
            .finish()
    }
}
