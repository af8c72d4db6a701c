//! Per-invocation handler response.

use crate::request::SamlDocument;

/// Mutable outcome of one chain run.
///
/// A handler that detects a request-specific failure sets the error state
/// instead of returning an error; the engine then stops the chain and asks
/// the transport to send the recorded status.
#[derive(Debug, Clone, Default)]
pub struct HandlerResponse {
    destination: String,
    post_binding: bool,
    error_code: Option<u16>,
    error_message: Option<String>,
    resulting_document: Option<SamlDocument>,
    relay_state: Option<String>,
    send_request: bool,
}

impl HandlerResponse {
    /// Creates a response for the given destination and binding.
    #[must_use]
    pub fn new(destination: impl Into<String>, post_binding: bool) -> Self {
        Self {
            destination: destination.into(),
            post_binding,
            ..Self::default()
        }
    }

    /// Where the generated message is sent.
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Overrides the destination.
    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.destination = destination.into();
    }

    /// Whether the message goes out with the POST binding.
    #[must_use]
    pub const fn is_post_binding(&self) -> bool {
        self.post_binding
    }

    /// Selects the POST (true) or redirect (false) binding.
    pub fn set_post_binding(&mut self, post_binding: bool) {
        self.post_binding = post_binding;
    }

    /// Records a protocol error and the HTTP status to send.
    pub fn set_error(&mut self, code: u16, message: impl Into<String>) {
        self.error_code = Some(code);
        self.error_message = Some(message.into());
    }

    /// Whether a handler recorded a protocol error.
    #[must_use]
    pub const fn is_in_error(&self) -> bool {
        self.error_code.is_some()
    }

    /// The recorded HTTP status.
    #[must_use]
    pub const fn error_code(&self) -> Option<u16> {
        self.error_code
    }

    /// The recorded error message.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// The SAML message produced by the chain.
    #[must_use]
    pub fn resulting_document(&self) -> Option<&SamlDocument> {
        self.resulting_document.as_ref()
    }

    /// Stores the SAML message produced by a handler.
    pub fn set_resulting_document(&mut self, document: SamlDocument) {
        self.resulting_document = Some(document);
    }

    /// The relay state to send along with the message.
    #[must_use]
    pub fn relay_state(&self) -> Option<&str> {
        self.relay_state.as_deref()
    }

    /// Sets the relay state.
    pub fn set_relay_state(&mut self, relay_state: impl Into<String>) {
        self.relay_state = Some(relay_state.into());
    }

    /// Whether the caller should send the resulting document as a request.
    #[must_use]
    pub const fn send_request(&self) -> bool {
        self.send_request
    }

    /// Marks the resulting document as a request to send.
    pub fn set_send_request(&mut self, send_request: bool) {
        self.send_request = send_request;
    }
}
