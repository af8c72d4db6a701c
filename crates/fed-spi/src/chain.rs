//! The handler chain and its lock.
//!
//! Handlers are shared by every request routed through the chain and may
//! keep state between `reset` and `generate_request`. The chain lock owns the
//! handler sequence, so a traversal cannot reach a handler without holding
//! it. Handlers run in insertion order.

use parking_lot::{Mutex, MutexGuard};

use crate::handler::SamlHandler;
use crate::registry::SpiError;

/// Guard over the locked handler sequence.
pub type ChainGuard<'a> = MutexGuard<'a, Vec<Box<dyn SamlHandler>>>;

/// Ordered handlers with unique names, behind a single lock.
#[derive(Debug, Default)]
pub struct HandlerChain {
    handlers: Mutex<Vec<Box<dyn SamlHandler>>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    ///
    /// # Errors
    ///
    /// Returns [`SpiError::DuplicateHandler`] if a handler with the same
    /// name is already a member.
    pub fn add(&self, handler: Box<dyn SamlHandler>) -> Result<(), SpiError> {
        let mut handlers = self.handlers.lock();
        let name = handler.name();
        if handlers.iter().any(|h| h.name() == name) {
            return Err(SpiError::DuplicateHandler(name.to_string()));
        }
        tracing::debug!(handler = name, position = handlers.len(), "added handler to chain");
        handlers.push(handler);
        Ok(())
    }

    /// Appends a handler, builder style.
    ///
    /// # Errors
    ///
    /// See [`add`](Self::add).
    pub fn with_handler(self, handler: impl SamlHandler + 'static) -> Result<Self, SpiError> {
        self.add(Box::new(handler))?;
        Ok(self)
    }

    /// Number of handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.lock().len()
    }

    /// Whether the chain has no handler.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handler names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.lock().iter().map(|h| h.name()).collect()
    }

    /// Acquires the chain lock, blocking until it is free.
    ///
    /// The lock is released when the guard is dropped, including during
    /// unwinding.
    pub fn lock(&self) -> ChainGuard<'_> {
        self.handlers.lock()
    }

    /// Acquires the chain lock if it is free.
    pub fn try_lock(&self) -> Option<ChainGuard<'_>> {
        self.handlers.try_lock()
    }
}
