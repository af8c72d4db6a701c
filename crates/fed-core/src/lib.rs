//! # fed-core
//!
//! Provider configuration, provider-type classification and audit events
//! shared by every crate of the SAML2 Service Provider engine.
//!
//! ## Contents
//!
//! - [`config`] - Identity/Service Provider configuration model
//! - [`provider`] - classification and validation of the active configuration
//! - [`error`] - configuration errors
//! - [`event`] - audit events and the [`AuditHelper`] seam

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod event;
pub mod provider;

pub use config::{
    Binding, ConfigValue, IdentityProviderConfig, ProviderConfig, ServiceProviderConfig,
};
pub use error::{ConfigResult, ConfigurationError};
pub use event::{AuditEvent, AuditEventType, AuditHelper, AuditOutcome, TracingAuditHelper};
pub use provider::{classify, validate, ProviderType};
