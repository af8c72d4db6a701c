//! Effective issuer of generated messages.

/// Holds the issuer a service provider puts in its outbound messages.
///
/// The explicitly configured issuer wins; otherwise the SP's service URL is
/// used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerInfoHolder {
    issuer: String,
}

impl IssuerInfoHolder {
    /// Creates a holder for a fixed issuer.
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
        }
    }

    /// Picks the explicit issuer if there is one, else the service URL.
    #[must_use]
    pub fn resolve(explicit: Option<&str>, service_url: &str) -> Self {
        Self::new(explicit.unwrap_or(service_url))
    }

    /// The effective issuer.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}
