//! SAML 2.0 Service Provider protocol engine.
//!
//! This crate drives a [`HandlerChain`](fed_spi::HandlerChain) to build
//! outbound SAML requests and to process inbound status responses:
//!
//! - **Processor** - builds the per-invocation request and response, detects
//!   global logout and runs the chain under its lock
//! - **Trust key resolution** - finds the IDP's validating key and the local
//!   decryption key for the request option bag
//! - **Built-in handlers** - `AuthnRequest` and `LogoutRequest` generation
//!
//! # Architecture
//!
//! - [`processor`] - the [`ServiceProviderProcessor`]
//! - [`trust`] - IDP key alias resolution and request options
//! - [`issuer`] - effective issuer of generated messages
//! - [`handlers`] - handlers shipped with the engine
//! - [`types`] - SAML message types and constants
//! - [`error`] - error types for processing
//!
//! # Example
//!
//! ```rust,ignore
//! use fed_protocol_saml::ServiceProviderProcessor;
//!
//! let processor = ServiceProviderProcessor::new(true, "https://sp.example.org")
//!     .with_configuration(sp_config)
//!     .with_trust_key_manager(key_manager);
//!
//! let response = processor.process(&http_context, &chain)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod handlers;
pub mod issuer;
pub mod processor;
pub mod trust;
pub mod types;

pub use error::{ProcessError, ProcessResult};
pub use handlers::{register_builtin_handlers, AuthnRequestHandler, LogoutRequestHandler};
pub use issuer::IssuerInfoHolder;
pub use processor::ServiceProviderProcessor;
pub use trust::{build_request_options, resolve_idp_public_key, IDP_KEY};
pub use types::*;
