//! Trust key resolution.
//!
//! The IDP's validating key is looked up by alias. Deployments can name the
//! alias explicitly through the key manager option [`IDP_KEY`]; otherwise
//! the host of the configured IDP URL is the alias.

use std::sync::Arc;

use fed_core::{AuditHelper, ConfigurationError, ProviderConfig};
use fed_crypto::{PublicKey, TrustKeyError, TrustKeyManager, TrustKeyResult};
use fed_spi::constants::{
    AUDIT_HELPER, CONFIGURATION, DECRYPTING_KEY, SENDER_PUBLIC_KEY, SUPPORTS_SIGNATURES,
};
use fed_spi::{OptionValue, RequestOptions};
use url::Url;

use crate::error::ProcessResult;

/// Key manager option that overrides the IDP validating key alias.
pub const IDP_KEY: &str = "idp.key";

/// Resolves the key that verifies messages signed by the IDP.
///
/// # Errors
///
/// - [`TrustKeyError::MissingKeyManager`] without a key manager
/// - [`TrustKeyError::UnparsableIdentityUrl`] when no alias override is set
///   and the IDP URL has no host
/// - any error of the key manager's lookup, unchanged
pub fn resolve_idp_public_key(
    key_manager: Option<&dyn TrustKeyManager>,
    config: &ProviderConfig,
) -> TrustKeyResult<PublicKey> {
    let key_manager = key_manager.ok_or(TrustKeyError::MissingKeyManager)?;

    let alias = match key_manager
        .additional_option(IDP_KEY)
        .filter(|alias| !alias.trim().is_empty())
    {
        Some(alias) => alias,
        None => alias_from_url(config.identity_url())?,
    };

    tracing::debug!(alias = %alias, "resolving IDP validating key");
    key_manager.validating_key(&alias)
}

fn alias_from_url(identity_url: &str) -> TrustKeyResult<String> {
    Url::parse(identity_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .ok_or_else(|| TrustKeyError::UnparsableIdentityUrl(identity_url.to_string()))
}

/// Assembles the option bag handed to every handler.
///
/// The configuration and signature flag are always present, the audit helper
/// when given. With a key manager, the IDP's validating key and the local
/// decryption key are added; a failure to resolve either aborts the whole
/// bag.
///
/// # Errors
///
/// Returns [`ConfigurationError::NullProvider`] without a configuration, or
/// the trust key error that stopped key resolution.
pub fn build_request_options(
    config: Option<&Arc<ProviderConfig>>,
    key_manager: Option<&Arc<dyn TrustKeyManager>>,
    audit_helper: Option<&Arc<dyn AuditHelper>>,
) -> ProcessResult<RequestOptions> {
    let config = config.ok_or(ConfigurationError::NullProvider)?;

    let mut options = RequestOptions::new();
    options.insert(CONFIGURATION, OptionValue::Configuration(Arc::clone(config)));

    if let Some(helper) = audit_helper {
        options.insert(AUDIT_HELPER, OptionValue::AuditHelper(Arc::clone(helper)));
    }

    if let Some(manager) = key_manager {
        let validating_key = resolve_idp_public_key(Some(manager.as_ref()), config)?;
        options.insert(SENDER_PUBLIC_KEY, OptionValue::PublicKey(validating_key));
        options.insert(DECRYPTING_KEY, OptionValue::DecryptingKey(manager.signing_key()?));
    }

    options.insert(
        SUPPORTS_SIGNATURES,
        OptionValue::Bool(config.supports_signature()),
    );
    Ok(options)
}
