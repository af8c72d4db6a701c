//! Provider configuration model.
//!
//! A deployment runs either as an Identity Provider or as a Service Provider.
//! The active configuration is built once at startup and shared read-only by
//! every handler for the lifetime of the process.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// HTTP binding used to deliver a SAML message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Binding {
    /// HTML form auto-posted by the browser.
    #[default]
    Post,
    /// Deflated message carried in the query string.
    Redirect,
}

impl Binding {
    /// Returns true for the POST binding.
    #[must_use]
    pub const fn is_post(self) -> bool {
        matches!(self, Self::Post)
    }
}

/// Configuration of an Identity Provider deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProviderConfig {
    /// Public URL of this identity provider.
    pub identity_url: String,

    /// Whether messages are digitally signed.
    #[serde(default)]
    pub supports_signature: bool,
}

impl IdentityProviderConfig {
    /// Creates an IDP configuration for the given URL.
    #[must_use]
    pub fn new(identity_url: impl Into<String>) -> Self {
        Self {
            identity_url: identity_url.into(),
            supports_signature: false,
        }
    }

    /// Enables or disables signature support.
    #[must_use]
    pub const fn with_signatures(mut self, supports_signature: bool) -> Self {
        self.supports_signature = supports_signature;
        self
    }
}

/// Configuration of a Service Provider deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderConfig {
    /// URL of the identity provider this SP federates with.
    pub identity_url: String,

    /// Service URL of this SP, also its default issuer.
    pub service_url: String,

    /// Whether messages are digitally signed.
    #[serde(default)]
    pub supports_signature: bool,

    /// Where global logout requests are sent instead of the IDP URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logout_url: Option<String>,

    /// Issuer that differs from the service URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Binding for outbound requests. Overrides the processor's default when
    /// set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<Binding>,
}

impl ServiceProviderConfig {
    /// Creates an SP configuration.
    #[must_use]
    pub fn new(identity_url: impl Into<String>, service_url: impl Into<String>) -> Self {
        Self {
            identity_url: identity_url.into(),
            service_url: service_url.into(),
            supports_signature: false,
            logout_url: None,
            issuer: None,
            binding: None,
        }
    }

    /// Sets the explicit logout URL.
    #[must_use]
    pub fn with_logout_url(mut self, url: impl Into<String>) -> Self {
        self.logout_url = Some(url.into());
        self
    }

    /// Sets an issuer that differs from the service URL.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Enables or disables signature support.
    #[must_use]
    pub const fn with_signatures(mut self, supports_signature: bool) -> Self {
        self.supports_signature = supports_signature;
        self
    }

    /// Sets the preferred binding.
    #[must_use]
    pub const fn with_binding(mut self, binding: Binding) -> Self {
        self.binding = Some(binding);
        self
    }
}

/// The active provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// This deployment is an identity provider.
    IdentityProvider(IdentityProviderConfig),
    /// This deployment is a service provider.
    ServiceProvider(ServiceProviderConfig),
}

impl ProviderConfig {
    /// Whether digital signatures are supported.
    #[must_use]
    pub const fn supports_signature(&self) -> bool {
        match self {
            Self::IdentityProvider(idp) => idp.supports_signature,
            Self::ServiceProvider(sp) => sp.supports_signature,
        }
    }

    /// The identity provider URL known to this configuration.
    #[must_use]
    pub fn identity_url(&self) -> &str {
        match self {
            Self::IdentityProvider(idp) => &idp.identity_url,
            Self::ServiceProvider(sp) => &sp.identity_url,
        }
    }

    /// The explicit logout URL. Identity providers never carry one.
    #[must_use]
    pub fn logout_url(&self) -> Option<&str> {
        self.as_service_provider()
            .and_then(|sp| sp.logout_url.as_deref())
    }

    /// Returns the SP configuration, if this is one.
    #[must_use]
    pub const fn as_service_provider(&self) -> Option<&ServiceProviderConfig> {
        match self {
            Self::ServiceProvider(sp) => Some(sp),
            Self::IdentityProvider(_) => None,
        }
    }

    /// Variant name used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::IdentityProvider(_) => "identity_provider",
            Self::ServiceProvider(_) => "service_provider",
        }
    }
}

impl From<IdentityProviderConfig> for ProviderConfig {
    fn from(config: IdentityProviderConfig) -> Self {
        Self::IdentityProvider(config)
    }
}

impl From<ServiceProviderConfig> for ProviderConfig {
    fn from(config: ServiceProviderConfig) -> Self {
        Self::ServiceProvider(config)
    }
}

/// A value held in a chain configuration parameter bag.
#[derive(Debug, Clone)]
pub enum ConfigValue {
    /// A provider configuration.
    Provider(Arc<ProviderConfig>),
    /// A plain string setting.
    String(String),
    /// A boolean setting.
    Bool(bool),
    /// Any other structured setting.
    Json(serde_json::Value),
}

impl ConfigValue {
    /// Variant name used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Provider(config) => config.kind(),
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Json(_) => "json",
        }
    }

    /// Returns the string setting, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the boolean setting, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<ProviderConfig> for ConfigValue {
    fn from(config: ProviderConfig) -> Self {
        Self::Provider(Arc::new(config))
    }
}

impl From<Arc<ProviderConfig>> for ConfigValue {
    fn from(config: Arc<ProviderConfig>) -> Self {
        Self::Provider(config)
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}
