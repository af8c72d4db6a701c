//! Fixtures shared by the integration tests.
//!
//! Scripted handlers record what the chain did to them in a [`Journal`], and
//! [`BrokenTransport`] stands in for a client that went away.

#![forbid(unsafe_code)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fed_core::{ProviderConfig, ServiceProviderConfig};
use fed_protocol_saml::ServiceProviderProcessor;
use fed_spi::{
    ChainConfig, HandlerBase, HandlerChain, HandlerError, HandlerRequest, HandlerResponse,
    HandlerResult, HttpContext, HttpSession, SamlHandler,
};
use parking_lot::Mutex;

/// IDP single sign-on endpoint used throughout the tests.
pub const IDP_URL: &str = "https://idp.example.org/sso";

/// SP service URL used throughout the tests.
pub const SP_URL: &str = "https://sp.example.org";

/// SP logout URL used throughout the tests.
pub const LOGOUT_URL: &str = "https://sp.example.org/logout";

/// Installs a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("fed_protocol_saml=debug,fed_spi=debug,audit=info")
        .with_test_writer()
        .try_init();
}

/// The SP configuration most tests start from.
#[must_use]
pub fn sp_config() -> ServiceProviderConfig {
    ServiceProviderConfig::new(IDP_URL, SP_URL)
}

/// A processor for [`sp_config`] with the POST binding.
#[must_use]
pub fn processor(config: ServiceProviderConfig) -> ServiceProviderProcessor {
    ServiceProviderProcessor::new(true, SP_URL).with_configuration(ProviderConfig::from(config))
}

/// Chain config wrapping [`sp_config`].
#[must_use]
pub fn chain_config() -> Arc<ChainConfig> {
    Arc::new(ChainConfig::new(ProviderConfig::from(sp_config())))
}

/// Ordered log of handler callbacks.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    /// Appends an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    /// Returns a copy of all entries.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// What a [`ScriptedHandler`] does in `generate_request`.
#[derive(Debug, Clone, Copy)]
pub enum Script {
    /// Nothing.
    Noop,
    /// Records a protocol error with the given status.
    SetError(u16),
    /// Returns a processing error.
    Fail,
    /// Panics.
    Panic,
    /// Holds the chain for a while, tracking overlapping traversals.
    Busy(Duration),
}

/// Handler whose behavior is fixed at construction.
#[derive(Debug)]
pub struct ScriptedHandler {
    base: HandlerBase,
    label: &'static str,
    script: Script,
    journal: Journal,
    active: Arc<AtomicUsize>,
    overlaps: Arc<AtomicUsize>,
}

impl ScriptedHandler {
    /// Creates a handler recording into `journal`.
    #[must_use]
    pub fn new(label: &'static str, script: Script, journal: &Journal) -> Self {
        Self {
            base: HandlerBase::new(),
            label,
            script,
            journal: journal.clone(),
            active: Arc::default(),
            overlaps: Arc::default(),
        }
    }

    /// Shares overlap counters with other handlers.
    #[must_use]
    pub fn with_counters(mut self, active: &Arc<AtomicUsize>, overlaps: &Arc<AtomicUsize>) -> Self {
        self.active = Arc::clone(active);
        self.overlaps = Arc::clone(overlaps);
        self
    }
}

impl SamlHandler for ScriptedHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HandlerBase {
        &mut self.base
    }

    fn name(&self) -> &'static str {
        self.label
    }

    fn reset(&mut self) -> HandlerResult<()> {
        self.journal.record(format!("{}:reset", self.label));
        Ok(())
    }

    fn generate_request(
        &mut self,
        request: &mut HandlerRequest<'_>,
        response: &mut HandlerResponse,
    ) -> HandlerResult<()> {
        self.journal
            .record(format!("{}:generate:{:?}", self.label, request.kind()));
        match self.script {
            Script::Noop => Ok(()),
            Script::SetError(status) => {
                response.set_error(status, "scripted error");
                Ok(())
            }
            Script::Fail => Err(HandlerError::Processing("scripted failure".to_string())),
            Script::Panic => panic!("scripted panic in {}", self.label),
            Script::Busy(duration) => {
                if self.active.fetch_add(1, Ordering::SeqCst) > 0 {
                    self.overlaps.fetch_add(1, Ordering::SeqCst);
                }
                thread::sleep(duration);
                self.active.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        }
    }
}

/// Builds a chain of initialized handlers.
///
/// # Panics
///
/// Panics if a handler rejects the chain config or names collide.
#[must_use]
pub fn chain_of(handlers: Vec<ScriptedHandler>) -> HandlerChain {
    let config = chain_config();
    let chain = HandlerChain::new();
    for mut handler in handlers {
        handler
            .init_chain_config(Arc::clone(&config))
            .expect("valid chain config");
        chain.add(Box::new(handler)).expect("unique handler names");
    }
    chain
}

/// Transport whose response stream is already closed.
#[derive(Debug, Default)]
pub struct BrokenTransport {
    session: Option<HttpSession>,
    attempts: AtomicUsize,
}

impl BrokenTransport {
    /// Number of `send_error` calls seen.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl HttpContext for BrokenTransport {
    fn parameter(&self, _name: &str) -> Option<String> {
        None
    }

    fn context_path(&self) -> &str {
        "/"
    }

    fn session(&self) -> Option<&HttpSession> {
        self.session.as_ref()
    }

    fn send_error(&self, _status: u16) -> io::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "client disconnected"))
    }
}
