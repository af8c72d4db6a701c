//! # fed-spi
//!
//! Handler extension point of the SAML2 Service Provider engine.
//!
//! A handler is a pluggable protocol unit. Several handlers form a
//! [`HandlerChain`] that cooperatively builds one outbound SAML message or
//! processes one inbound status response.
//!
//! ## Design
//!
//! - [`SamlHandler`] - the handler lifecycle contract, with no-op defaults
//! - [`HandlerBase`] - configuration state every handler embeds
//! - [`HandlerRequest`] / [`HandlerResponse`] - per-invocation contexts
//! - [`HttpContext`] - the transport seam handlers and the engine talk to
//! - [`HandlerChain`] - ordered handlers behind the chain lock
//! - [`HandlerRegistry`] - named factories that assemble chains

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod chain;
pub mod config;
pub mod constants;
pub mod context;
pub mod handler;
pub mod registry;
pub mod request;
pub mod response;

pub use chain::HandlerChain;
pub use config::{ChainConfig, HandlerConfig};
pub use context::{HttpContext, HttpSession, SimpleHttpContext};
pub use handler::{HandlerBase, HandlerError, HandlerResult, SamlHandler};
pub use registry::{HandlerRegistry, SpiError};
pub use request::{HandlerRequest, OptionValue, RequestKind, RequestOptions, SamlDocument};
pub use response::HandlerResponse;
