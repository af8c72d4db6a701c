//! Per-invocation handler request.

use std::collections::HashMap;
use std::sync::Arc;

use fed_core::{AuditHelper, ProviderConfig, ProviderType};
use fed_crypto::{PublicKey, SigningKey};

use crate::constants::{
    AUDIT_HELPER, CONFIGURATION, CONTEXT_PATH, DECRYPTING_KEY, SENDER_PUBLIC_KEY,
    SUPPORTS_SIGNATURES,
};
use crate::context::{HttpContext, HttpSession};

/// The kind of SAML request the chain is asked to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestKind {
    /// An `AuthnRequest`.
    #[default]
    Authentication,
    /// A `LogoutRequest`.
    Logout,
}

/// A serialized SAML message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamlDocument {
    xml: String,
}

impl SamlDocument {
    /// Wraps a serialized message.
    #[must_use]
    pub fn new(xml: impl Into<String>) -> Self {
        Self { xml: xml.into() }
    }

    /// Returns the XML text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.xml
    }
}

/// A value in the request option bag.
#[derive(Debug, Clone)]
pub enum OptionValue {
    /// The active provider configuration.
    Configuration(Arc<ProviderConfig>),
    /// The audit sink.
    AuditHelper(Arc<dyn AuditHelper>),
    /// A peer's validating key.
    PublicKey(PublicKey),
    /// The local decryption key.
    DecryptingKey(Arc<SigningKey>),
    /// A flag.
    Bool(bool),
    /// A string.
    String(String),
}

/// Keyed options handed to every handler.
///
/// Keys are the names in [`constants`](crate::constants); the typed getters
/// return `None` when the key is absent or holds another kind of value.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    values: HashMap<String, OptionValue>,
}

impl RequestOptions {
    /// Creates an empty option bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an option, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) {
        self.values.insert(key.into(), value);
    }

    /// Copies every option of `other` into this bag.
    pub fn extend(&mut self, other: Self) {
        self.values.extend(other.values);
    }

    /// Gets an option.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    /// Whether an option is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The provider configuration.
    #[must_use]
    pub fn configuration(&self) -> Option<&Arc<ProviderConfig>> {
        match self.get(CONFIGURATION) {
            Some(OptionValue::Configuration(config)) => Some(config),
            _ => None,
        }
    }

    /// The audit helper.
    #[must_use]
    pub fn audit_helper(&self) -> Option<&Arc<dyn AuditHelper>> {
        match self.get(AUDIT_HELPER) {
            Some(OptionValue::AuditHelper(helper)) => Some(helper),
            _ => None,
        }
    }

    /// The IDP's validating key.
    #[must_use]
    pub fn sender_public_key(&self) -> Option<&PublicKey> {
        match self.get(SENDER_PUBLIC_KEY) {
            Some(OptionValue::PublicKey(key)) => Some(key),
            _ => None,
        }
    }

    /// The local decryption key.
    #[must_use]
    pub fn decrypting_key(&self) -> Option<&Arc<SigningKey>> {
        match self.get(DECRYPTING_KEY) {
            Some(OptionValue::DecryptingKey(key)) => Some(key),
            _ => None,
        }
    }

    /// The signature-support flag; false when unset.
    #[must_use]
    pub fn supports_signatures(&self) -> bool {
        matches!(self.get(SUPPORTS_SIGNATURES), Some(OptionValue::Bool(true)))
    }

    /// The web application context path.
    #[must_use]
    pub fn context_path(&self) -> Option<&str> {
        match self.get(CONTEXT_PATH) {
            Some(OptionValue::String(path)) => Some(path),
            _ => None,
        }
    }
}

/// Mutable context shared by every handler during one chain run.
pub struct HandlerRequest<'a> {
    context: &'a dyn HttpContext,
    issuer: String,
    document: Option<SamlDocument>,
    handler_type: ProviderType,
    options: RequestOptions,
    kind: RequestKind,
}

impl<'a> HandlerRequest<'a> {
    /// Creates a request.
    #[must_use]
    pub fn new(
        context: &'a dyn HttpContext,
        issuer: impl Into<String>,
        document: Option<SamlDocument>,
        handler_type: ProviderType,
    ) -> Self {
        Self {
            context,
            issuer: issuer.into(),
            document,
            handler_type,
            options: RequestOptions::new(),
            kind: RequestKind::default(),
        }
    }

    /// The transport context.
    #[must_use]
    pub fn context(&self) -> &'a dyn HttpContext {
        self.context
    }

    /// The HTTP session, if one exists.
    #[must_use]
    pub fn session(&self) -> Option<&'a HttpSession> {
        self.context.session()
    }

    /// The effective issuer of messages generated by this chain.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// The inbound SAML document, if any.
    #[must_use]
    pub fn document(&self) -> Option<&SamlDocument> {
        self.document.as_ref()
    }

    /// The side this request is processed on.
    #[must_use]
    pub const fn handler_type(&self) -> ProviderType {
        self.handler_type
    }

    /// The option bag.
    #[must_use]
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Replaces the option bag.
    pub fn set_options(&mut self, options: RequestOptions) {
        self.options = options;
    }

    /// Adds a single option.
    pub fn add_option(&mut self, key: impl Into<String>, value: OptionValue) {
        self.options.insert(key, value);
    }

    /// The kind of request to generate.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Sets the kind of request to generate.
    pub fn set_kind(&mut self, kind: RequestKind) {
        self.kind = kind;
    }
}

impl std::fmt::Debug for HandlerRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRequest")
            .field("issuer", &self.issuer)
            .field("has_document", &self.document.is_some())
            .field("handler_type", &self.handler_type)
            .field("options", &self.options.len())
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SimpleHttpContext;
    use fed_core::ServiceProviderConfig;

    #[test]
    fn typed_getters_ignore_mismatched_values() {
        let mut options = RequestOptions::new();
        options.insert(SUPPORTS_SIGNATURES, OptionValue::String("true".to_string()));
        options.insert(CONTEXT_PATH, OptionValue::String("/app".to_string()));

        assert!(!options.supports_signatures());
        assert_eq!(options.context_path(), Some("/app"));
        assert!(options.configuration().is_none());
        assert!(options.sender_public_key().is_none());
    }

    #[test]
    fn extend_overrides_existing_keys() {
        let sp = ProviderConfig::from(ServiceProviderConfig::new("https://idp", "https://sp"));
        let mut options = RequestOptions::new();
        options.insert(SUPPORTS_SIGNATURES, OptionValue::Bool(false));

        let mut other = RequestOptions::new();
        other.insert(SUPPORTS_SIGNATURES, OptionValue::Bool(true));
        other.insert(CONFIGURATION, OptionValue::Configuration(Arc::new(sp)));
        options.extend(other);

        assert_eq!(options.len(), 2);
        assert!(options.supports_signatures());
        assert!(options.configuration().is_some());
    }

    #[test]
    fn request_defaults_to_authentication() {
        let context = SimpleHttpContext::new("/app");
        let mut request = HandlerRequest::new(&context, "https://sp", None, ProviderType::Sp);

        assert_eq!(request.kind(), RequestKind::Authentication);
        assert!(request.document().is_none());
        assert!(request.session().is_none());

        request.set_kind(RequestKind::Logout);
        assert_eq!(request.kind(), RequestKind::Logout);
    }
}
