//! Transport context.
//!
//! The engine does not own an HTTP stack. Callers adapt their framework's
//! request, response and session to [`HttpContext`]; handlers reach the same
//! context through [`HandlerRequest::context`](crate::HandlerRequest::context).

use std::collections::HashMap;
use std::io;

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

/// One inbound HTTP interaction as seen by the engine.
pub trait HttpContext: Send + Sync {
    /// Returns a query or form parameter.
    fn parameter(&self, name: &str) -> Option<String>;

    /// Returns the web application context path.
    fn context_path(&self) -> &str;

    /// Returns the existing HTTP session, without creating one.
    fn session(&self) -> Option<&HttpSession>;

    /// Sends an HTTP error status to the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the response can no longer be written.
    fn send_error(&self, status: u16) -> io::Result<()>;
}

/// An HTTP session.
///
/// Handlers keep cross-request protocol state here, such as the ID of the
/// last request sent or the authenticated principal.
#[derive(Debug)]
pub struct HttpSession {
    id: Uuid,
    attributes: RwLock<HashMap<String, String>>,
    invalidated: RwLock<bool>,
}

impl HttpSession {
    /// Creates a new session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            attributes: RwLock::new(HashMap::new()),
            invalidated: RwLock::new(false),
        }
    }

    /// Returns the session ID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Sets a session attribute.
    pub fn set_attribute(&self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.write().insert(key.into(), value.into());
    }

    /// Gets a session attribute.
    #[must_use]
    pub fn get_attribute(&self, key: &str) -> Option<String> {
        self.attributes.read().get(key).cloned()
    }

    /// Removes a session attribute.
    pub fn remove_attribute(&self, key: &str) -> Option<String> {
        self.attributes.write().remove(key)
    }

    /// Returns whether the session has been invalidated.
    #[must_use]
    pub fn is_invalidated(&self) -> bool {
        *self.invalidated.read()
    }

    /// Invalidates the session and drops its attributes.
    pub fn invalidate(&self) {
        self.attributes.write().clear();
        *self.invalidated.write() = true;
    }
}

impl Default for HttpSession {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory [`HttpContext`].
///
/// Used by embedders without a servlet-like layer and by tests. Error
/// statuses are recorded instead of written to a socket.
#[derive(Debug, Default)]
pub struct SimpleHttpContext {
    context_path: String,
    parameters: HashMap<String, String>,
    session: Option<HttpSession>,
    sent_errors: Mutex<Vec<u16>>,
}

impl SimpleHttpContext {
    /// Creates a context for the given context path.
    #[must_use]
    pub fn new(context_path: impl Into<String>) -> Self {
        Self {
            context_path: context_path.into(),
            ..Self::default()
        }
    }

    /// Adds a request parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Attaches a session.
    #[must_use]
    pub fn with_session(mut self, session: HttpSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Returns every status passed to [`HttpContext::send_error`].
    #[must_use]
    pub fn sent_errors(&self) -> Vec<u16> {
        self.sent_errors.lock().clone()
    }
}

impl HttpContext for SimpleHttpContext {
    fn parameter(&self, name: &str) -> Option<String> {
        self.parameters.get(name).cloned()
    }

    fn context_path(&self) -> &str {
        &self.context_path
    }

    fn session(&self) -> Option<&HttpSession> {
        self.session.as_ref()
    }

    fn send_error(&self, status: u16) -> io::Result<()> {
        self.sent_errors.lock().push(status);
        Ok(())
    }
}
