//! Trust key management.
//!
//! A [`TrustKeyManager`] resolves the keys a service provider needs to talk to
//! its identity provider: the IDP's validating key, looked up by alias, and
//! the local signing key. It is read-only once configured and shared across
//! request threads.

use std::fmt::Debug;
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

use crate::keys::{PublicKey, SigningKey};

/// Result type for trust key operations.
pub type TrustKeyResult<T> = Result<T, TrustKeyError>;

/// Errors raised while resolving trust keys.
#[derive(Debug, Error)]
pub enum TrustKeyError {
    /// No key manager collaborator is configured.
    #[error("trust key manager is missing")]
    MissingKeyManager,

    /// The IDP URL has no usable host to derive a key alias from.
    #[error("identity URL has no host to derive a key alias: {0}")]
    UnparsableIdentityUrl(String),

    /// The key manager is misconfigured for the request.
    #[error("trust key configuration error: {0}")]
    Configuration(String),

    /// The key store failed while loading a key.
    #[error("trust key processing error: {0}")]
    Processing(String),
}

/// Key lookup collaborator.
pub trait TrustKeyManager: Send + Sync + Debug {
    /// Looks up a named additional option.
    fn additional_option(&self, name: &str) -> Option<String>;

    /// Returns the validating key registered under `alias`.
    ///
    /// # Errors
    ///
    /// Returns an error if no key is registered or the store fails.
    fn validating_key(&self, alias: &str) -> TrustKeyResult<PublicKey>;

    /// Returns the local signing key, also used for decryption.
    ///
    /// # Errors
    ///
    /// Returns an error if no signing key is configured.
    fn signing_key(&self) -> TrustKeyResult<Arc<SigningKey>>;
}

/// Key manager backed by in-process maps.
#[derive(Debug, Default)]
pub struct InMemoryTrustKeyManager {
    validating_keys: DashMap<String, PublicKey>,
    options: DashMap<String, String>,
    signing_key: Option<Arc<SigningKey>>,
}

impl InMemoryTrustKeyManager {
    /// Creates an empty key manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the local signing key.
    #[must_use]
    pub fn with_signing_key(mut self, key: SigningKey) -> Self {
        self.signing_key = Some(Arc::new(key));
        self
    }

    /// Registers a validating key under an alias.
    #[must_use]
    pub fn with_validating_key(self, alias: impl Into<String>, key: PublicKey) -> Self {
        self.validating_keys.insert(alias.into(), key);
        self
    }

    /// Sets an additional option.
    #[must_use]
    pub fn with_option(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }
}

impl TrustKeyManager for InMemoryTrustKeyManager {
    fn additional_option(&self, name: &str) -> Option<String> {
        self.options.get(name).map(|value| value.clone())
    }

    fn validating_key(&self, alias: &str) -> TrustKeyResult<PublicKey> {
        self.validating_keys
            .get(alias)
            .map(|key| key.clone())
            .ok_or_else(|| {
                tracing::debug!(alias, "no validating key registered");
                TrustKeyError::Configuration(format!("no validating key for alias '{alias}'"))
            })
    }

    fn signing_key(&self) -> TrustKeyResult<Arc<SigningKey>> {
        self.signing_key
            .clone()
            .ok_or_else(|| TrustKeyError::Configuration("no signing key configured".to_string()))
    }
}
