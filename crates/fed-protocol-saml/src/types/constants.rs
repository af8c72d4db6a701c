//! SAML 2.0 namespaces, bindings and name ID formats.

/// SAML 2.0 assertion namespace URI.
pub const SAML_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// SAML 2.0 protocol namespace URI.
pub const SAMLP_NS: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// Top-level status code of a successful request.
pub const STATUS_SUCCESS: &str = "urn:oasis:names:tc:SAML:2.0:status:Success";

/// SAML binding types an SP sends requests with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamlBinding {
    /// HTTP POST binding.
    HttpPost,
    /// HTTP Redirect binding.
    HttpRedirect,
}

impl SamlBinding {
    /// Returns the URI for this binding.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::HttpPost => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST",
            Self::HttpRedirect => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect",
        }
    }

    /// Picks the binding for a post-binding flag.
    #[must_use]
    pub const fn from_post_flag(post: bool) -> Self {
        if post {
            Self::HttpPost
        } else {
            Self::HttpRedirect
        }
    }
}

/// SAML Name ID formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameIdFormat {
    /// Unspecified name ID format.
    #[default]
    Unspecified,
    /// Email address format.
    Email,
    /// Persistent identifier format.
    Persistent,
    /// Transient identifier format.
    Transient,
}

impl NameIdFormat {
    /// Returns the URI for this name ID format.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Unspecified => "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified",
            Self::Email => "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress",
            Self::Persistent => "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent",
            Self::Transient => "urn:oasis:names:tc:SAML:2.0:nameid-format:transient",
        }
    }

    /// Parses a name ID format from its URI or short name.
    ///
    /// Handler configuration may use the short names `unspecified`, `email`,
    /// `persistent` and `transient`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified" | "unspecified" => {
                Some(Self::Unspecified)
            }
            "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress" | "email" => {
                Some(Self::Email)
            }
            "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent" | "persistent" => {
                Some(Self::Persistent)
            }
            "urn:oasis:names:tc:SAML:2.0:nameid-format:transient" | "transient" => {
                Some(Self::Transient)
            }
            _ => None,
        }
    }
}
