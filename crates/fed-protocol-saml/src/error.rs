//! Processing error types.
//!
//! Failures of the processor itself. Protocol errors a handler detects for a
//! single request are not errors here: they travel in the
//! [`HandlerResponse`](fed_spi::HandlerResponse) error state.

use std::io;

use fed_core::ConfigurationError;
use fed_crypto::TrustKeyError;
use fed_spi::HandlerError;
use thiserror::Error;

/// Result type for processor operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Errors surfaced by the processor.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The processor is missing or has an unusable configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Trust key resolution failed before the chain ran.
    #[error(transparent)]
    TrustKey(#[from] TrustKeyError),

    /// A handler failed while the chain was running.
    #[error("handler chain processing error in {handler}: {source}")]
    ChainProcessing {
        /// Name of the failing handler.
        handler: String,
        /// The handler's error.
        #[source]
        source: HandlerError,
    },

    /// The error status could not be delivered to the client.
    #[error("failed to deliver error status: {0}")]
    Transport(#[from] io::Error),
}

impl ProcessError {
    /// Wraps a handler failure.
    #[must_use]
    pub fn chain(handler: impl Into<String>, source: HandlerError) -> Self {
        Self::ChainProcessing {
            handler: handler.into(),
            source,
        }
    }

    /// The HTTP status a transport should answer with.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Configuration(_) | Self::TrustKey(_) | Self::ChainProcessing { .. } => 500,
            Self::Transport(_) => 502,
        }
    }
}
