//! SAML Name ID.

use serde::{Deserialize, Serialize};

use super::{xml_escape, NameIdFormat, SAML_NS};

/// Identifier of the principal a message is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameId {
    /// The actual identifier value.
    pub value: String,

    /// The format of the name identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl NameId {
    /// Creates a name ID without a format.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            format: None,
        }
    }

    /// Sets the format for this name ID.
    #[must_use]
    pub fn with_format(mut self, format: NameIdFormat) -> Self {
        self.format = Some(format.uri().to_string());
        self
    }

    /// Serializes the `saml:NameID` element.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let format = self
            .format
            .as_deref()
            .map(|f| format!(r#" Format="{}""#, xml_escape(f)))
            .unwrap_or_default();
        format!(
            r#"<saml:NameID xmlns:saml="{SAML_NS}"{format}>{}</saml:NameID>"#,
            xml_escape(&self.value)
        )
    }
}

/// Name ID policy of an authentication request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameIdPolicy {
    /// The requested name ID format.
    pub format: String,

    /// Whether the IDP may create a new identifier.
    #[serde(default)]
    pub allow_create: bool,
}

impl NameIdPolicy {
    /// Creates a policy for the given format.
    #[must_use]
    pub fn new(format: NameIdFormat) -> Self {
        Self {
            format: format.uri().to_string(),
            allow_create: true,
        }
    }

    /// Serializes the `samlp:NameIDPolicy` element.
    #[must_use]
    pub fn to_xml(&self) -> String {
        format!(
            r#"<samlp:NameIDPolicy Format="{}" AllowCreate="{}"/>"#,
            xml_escape(&self.format),
            self.allow_create
        )
    }
}
