//! SAML 2.0 message types.
//!
//! The messages a service provider sends are modelled in full: the
//! authentication request and the logout request. Status responses coming
//! back are only read at the root element.

mod authn_request;
mod constants;
mod logout;
mod name_id;
mod status_response;

pub use authn_request::*;
pub use constants::*;
pub use logout::*;
pub use name_id::*;
pub use status_response::*;

/// Escapes XML special characters for attribute and text content.
pub(crate) fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Generates a message ID, which must not start with a digit.
pub(crate) fn new_message_id() -> String {
    format!("_id{}", uuid::Uuid::new_v4())
}
