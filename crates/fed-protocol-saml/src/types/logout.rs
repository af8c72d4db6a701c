//! SAML LogoutRequest.
//!
//! Single Logout (SLO) request sent by a service provider.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{new_message_id, xml_escape, NameId, SAMLP_NS, SAML_NS};

/// SAML Logout Request.
///
/// A request to terminate an existing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Unique identifier for this request.
    pub id: String,

    /// Timestamp when this request was issued.
    pub issue_instant: DateTime<Utc>,

    /// The entity ID of the requester.
    pub issuer: String,

    /// The URL where this request is sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// The name identifier of the principal to log out.
    pub name_id: NameId,

    /// Session indexes to terminate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub session_indexes: Vec<String>,

    /// Reason for the logout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Time after which the request is no longer valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_on_or_after: Option<DateTime<Utc>>,
}

impl LogoutRequest {
    /// User logout reason.
    pub const REASON_USER: &'static str = "urn:oasis:names:tc:SAML:2.0:logout:user";

    /// Admin logout reason.
    pub const REASON_ADMIN: &'static str = "urn:oasis:names:tc:SAML:2.0:logout:admin";

    /// Creates a new logout request.
    #[must_use]
    pub fn new(issuer: impl Into<String>, name_id: NameId) -> Self {
        Self {
            id: new_message_id(),
            issue_instant: Utc::now(),
            issuer: issuer.into(),
            destination: None,
            name_id,
            session_indexes: Vec::new(),
            reason: None,
            not_on_or_after: None,
        }
    }

    /// Sets the destination URL.
    #[must_use]
    pub fn with_destination(mut self, url: impl Into<String>) -> Self {
        self.destination = Some(url.into());
        self
    }

    /// Adds a session index to terminate.
    #[must_use]
    pub fn with_session_index(mut self, index: impl Into<String>) -> Self {
        self.session_indexes.push(index.into());
        self
    }

    /// Sets the logout reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Sets the validity period.
    #[must_use]
    pub fn valid_for(mut self, minutes: i64) -> Self {
        self.not_on_or_after = Some(Utc::now() + chrono::Duration::minutes(minutes));
        self
    }

    /// Checks if the request has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.not_on_or_after
            .is_some_and(|not_after| Utc::now() >= not_after)
    }

    /// Serializes the request as a `samlp:LogoutRequest` document.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut attributes = String::new();
        if let Some(destination) = &self.destination {
            attributes.push_str(&format!(r#" Destination="{}""#, xml_escape(destination)));
        }
        if let Some(reason) = &self.reason {
            attributes.push_str(&format!(r#" Reason="{}""#, xml_escape(reason)));
        }
        if let Some(not_after) = &self.not_on_or_after {
            attributes.push_str(&format!(
                r#" NotOnOrAfter="{}""#,
                not_after.to_rfc3339_opts(SecondsFormat::Millis, true)
            ));
        }

        let session_indexes: String = self
            .session_indexes
            .iter()
            .map(|index| format!("<samlp:SessionIndex>{}</samlp:SessionIndex>", xml_escape(index)))
            .collect();

        format!(
            r#"<samlp:LogoutRequest xmlns:samlp="{SAMLP_NS}" xmlns:saml="{SAML_NS}" ID="{}" Version="2.0" IssueInstant="{}"{attributes}><saml:Issuer>{}</saml:Issuer>{}{session_indexes}</samlp:LogoutRequest>"#,
            xml_escape(&self.id),
            self.issue_instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            xml_escape(&self.issuer),
            self.name_id.to_xml(),
        )
    }
}
