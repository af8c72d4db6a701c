//! Audit events.
//!
//! Handlers record security-relevant protocol steps through an
//! [`AuditHelper`]. The engine itself never inspects the helper; it only
//! passes it to handlers through the request option bag.
//!
//! Every event carries:
//! - Timestamp (ISO 8601)
//! - Event type
//! - Outcome (success/failure)
//! - Issuer and destination of the protocol message, when known

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audited protocol steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    /// An authentication request was sent to the IDP.
    RequestToIdp,
    /// A logout request was sent to the IDP.
    LogoutRequestToIdp,
    /// A status response was received from the IDP.
    ResponseFromIdp,
    /// A handler aborted the chain with a protocol error.
    ChainAborted,
}

/// Outcome of an audited step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    /// Step succeeded.
    Success,
    /// Step failed.
    Failure,
}

/// A single audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event (ISO 8601).
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: AuditEventType,

    /// Outcome of the event.
    pub outcome: AuditOutcome,

    /// Issuer of the protocol message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Destination of the protocol message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// HTTP session the step belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Error message (for failure events).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Additional details as key-value pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<(String, String)>,
}

impl AuditEvent {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: AuditEventType) -> AuditEventBuilder {
        AuditEventBuilder::new(event_type)
    }
}

/// Builder for audit events.
pub struct AuditEventBuilder {
    event_type: AuditEventType,
    outcome: AuditOutcome,
    issuer: Option<String>,
    destination: Option<String>,
    session_id: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl AuditEventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub const fn new(event_type: AuditEventType) -> Self {
        Self {
            event_type,
            outcome: AuditOutcome::Success,
            issuer: None,
            destination: None,
            session_id: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the outcome to failure with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = AuditOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the message issuer.
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets the message destination.
    #[must_use]
    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Sets the session ID.
    #[must_use]
    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> AuditEvent {
        AuditEvent {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            issuer: self.issuer,
            destination: self.destination,
            session_id: self.session_id,
            error: self.error,
            details: self.details,
        }
    }
}

/// Sink for audit events.
pub trait AuditHelper: Send + Sync + Debug {
    /// Records an event.
    fn audit(&self, event: AuditEvent);
}

/// Audit helper that writes events to the `audit` tracing target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditHelper;

impl AuditHelper for TracingAuditHelper {
    fn audit(&self, event: AuditEvent) {
        tracing::info!(
            target: "audit",
            id = %event.id,
            event_type = ?event.event_type,
            outcome = ?event.outcome,
            issuer = event.issuer.as_deref().unwrap_or(""),
            destination = event.destination.as_deref().unwrap_or(""),
            error = event.error.as_deref().unwrap_or(""),
            "audit event"
        );
    }
}
