//! Service Provider processor.
//!
//! Entry point of the engine. A transport layer calls
//! [`ServiceProviderProcessor::process`] for every user-initiated request
//! and [`ServiceProviderProcessor::handle_status_response`] for every status
//! response coming back from the IDP. Both run the shared handler chain
//! under its lock and return the [`HandlerResponse`] the transport turns
//! into an HTTP redirect or auto-posted form.

use std::sync::Arc;

use fed_core::{AuditHelper, Binding, ConfigurationError, ProviderConfig, ProviderType};
use fed_crypto::TrustKeyManager;
use fed_spi::constants::{CONTEXT_PATH, GLOBAL_LOGOUT, SUPPORTS_SIGNATURES};
use fed_spi::{
    HandlerChain, HandlerError, HandlerRequest, HandlerResponse, HttpContext, OptionValue,
    RequestKind, SamlDocument,
};

use crate::error::{ProcessError, ProcessResult};
use crate::issuer::IssuerInfoHolder;
use crate::trust::build_request_options;

/// Which handler callback a chain run drives.
#[derive(Debug, Clone, Copy)]
enum Phase {
    Generate(RequestKind),
    StatusResponse,
}

/// Drives the handler chain on the Service Provider side.
#[derive(Debug, Clone)]
pub struct ServiceProviderProcessor {
    post_binding: bool,
    service_url: String,
    identity_url: Option<String>,
    issuer: Option<String>,
    configuration: Option<Arc<ProviderConfig>>,
    key_manager: Option<Arc<dyn TrustKeyManager>>,
    audit_helper: Option<Arc<dyn AuditHelper>>,
}

impl ServiceProviderProcessor {
    /// Creates a processor for the SP at `service_url`.
    #[must_use]
    pub fn new(post_binding: bool, service_url: impl Into<String>) -> Self {
        Self {
            post_binding,
            service_url: service_url.into(),
            identity_url: None,
            issuer: None,
            configuration: None,
            key_manager: None,
            audit_helper: None,
        }
    }

    /// Sets the SP configuration.
    #[must_use]
    pub fn with_configuration(mut self, config: impl Into<Arc<ProviderConfig>>) -> Self {
        self.configuration = Some(config.into());
        self
    }

    /// Sets the trust key manager.
    #[must_use]
    pub fn with_trust_key_manager(mut self, key_manager: Arc<dyn TrustKeyManager>) -> Self {
        self.key_manager = Some(key_manager);
        self
    }

    /// Overrides the IDP URL taken from the configuration.
    #[must_use]
    pub fn with_identity_url(mut self, identity_url: impl Into<String>) -> Self {
        self.identity_url = Some(identity_url.into());
        self
    }

    /// Sets an issuer that differs from the service URL.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets the audit helper passed to handlers.
    #[must_use]
    pub fn with_audit_helper(mut self, helper: Arc<dyn AuditHelper>) -> Self {
        self.audit_helper = Some(helper);
        self
    }

    /// The SP service URL.
    #[must_use]
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Where outbound requests go unless a handler or logout says otherwise.
    #[must_use]
    pub fn identity_url(&self) -> Option<&str> {
        self.identity_url
            .as_deref()
            .or_else(|| self.configuration.as_deref().map(ProviderConfig::identity_url))
    }

    /// The effective issuer of generated messages.
    #[must_use]
    pub fn issuer_info(&self) -> IssuerInfoHolder {
        let configured = self
            .configuration
            .as_deref()
            .and_then(ProviderConfig::as_service_provider)
            .and_then(|sp| sp.issuer.as_deref());
        IssuerInfoHolder::resolve(self.issuer.as_deref().or(configured), &self.service_url)
    }

    /// Whether outbound messages use the POST binding.
    ///
    /// A binding set in the SP configuration wins over the flag given to
    /// [`new`](Self::new).
    #[must_use]
    pub fn is_post_binding(&self) -> bool {
        self.configuration
            .as_deref()
            .and_then(ProviderConfig::as_service_provider)
            .and_then(|sp| sp.binding)
            .map_or(self.post_binding, Binding::is_post)
    }

    /// Whether the request asks for a global logout.
    #[must_use]
    pub fn is_logout_request(context: &dyn HttpContext) -> bool {
        context
            .parameter(GLOBAL_LOGOUT)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }

    /// Runs the chain to generate an authentication or logout request.
    ///
    /// The response starts out addressed to the IDP with the configured
    /// binding. A global logout is redirected to the SP's logout URL when
    /// one is configured. If a handler records a protocol error, the
    /// remaining handlers are skipped and the error status is sent through
    /// `context` once.
    ///
    /// # Errors
    ///
    /// - [`ProcessError::Configuration`] without an SP configuration
    /// - [`ProcessError::TrustKey`] when key material cannot be resolved; the
    ///   chain does not run
    /// - [`ProcessError::ChainProcessing`] when a handler fails
    /// - [`ProcessError::Transport`] when the error status cannot be sent
    pub fn process(
        &self,
        context: &dyn HttpContext,
        chain: &HandlerChain,
    ) -> ProcessResult<HandlerResponse> {
        tracing::trace!("processing user request");
        let config = self.configuration()?;

        let mut request = self.handler_request(None, context)?;
        request.add_option(
            CONTEXT_PATH,
            OptionValue::String(context.context_path().to_string()),
        );
        request.add_option(
            SUPPORTS_SIGNATURES,
            OptionValue::Bool(config.supports_signature()),
        );

        let mut response = HandlerResponse::new(self.destination()?, self.is_post_binding());

        let logout = Self::is_logout_request(context);
        if logout {
            if let Some(logout_url) = config.logout_url() {
                tracing::debug!(destination = logout_url, "global logout uses the SP logout URL");
                response.set_destination(logout_url);
            }
        }
        let kind = if logout {
            RequestKind::Logout
        } else {
            RequestKind::Authentication
        };

        Self::run_chain(chain, &mut request, &mut response, Phase::Generate(kind))?;
        Self::deliver_error(context, &response)?;
        Ok(response)
    }

    /// Runs the chain over a status response received from the IDP.
    ///
    /// Same lock and abort rules as [`process`](Self::process). The
    /// response is addressed to the SP service URL.
    ///
    /// # Errors
    ///
    /// See [`process`](Self::process).
    pub fn handle_status_response(
        &self,
        context: &dyn HttpContext,
        chain: &HandlerChain,
        document: SamlDocument,
    ) -> ProcessResult<HandlerResponse> {
        tracing::trace!("processing IDP status response");
        let mut request = self.handler_request(Some(document), context)?;
        request.add_option(
            CONTEXT_PATH,
            OptionValue::String(context.context_path().to_string()),
        );

        let mut response = HandlerResponse::new(self.service_url.clone(), self.is_post_binding());

        Self::run_chain(chain, &mut request, &mut response, Phase::StatusResponse)?;
        Self::deliver_error(context, &response)?;
        Ok(response)
    }

    fn configuration(&self) -> ProcessResult<&Arc<ProviderConfig>> {
        self.configuration
            .as_ref()
            .ok_or(ProcessError::Configuration(ConfigurationError::NullProvider))
    }

    fn destination(&self) -> ProcessResult<String> {
        self.identity_url()
            .map(str::to_string)
            .ok_or(ProcessError::Configuration(ConfigurationError::NullProvider))
    }

    /// Builds the request every handler shares, with its option bag.
    fn handler_request<'a>(
        &self,
        document: Option<SamlDocument>,
        context: &'a dyn HttpContext,
    ) -> ProcessResult<HandlerRequest<'a>> {
        let options = build_request_options(
            self.configuration.as_ref(),
            self.key_manager.as_ref(),
            self.audit_helper.as_ref(),
        )?;

        let issuer = self.issuer_info();
        let mut request = HandlerRequest::new(context, issuer.issuer(), document, ProviderType::Sp);
        request.set_options(options);
        Ok(request)
    }

    /// One traversal of the chain under its lock.
    ///
    /// The guard is dropped on every return path, so a failing handler never
    /// leaves the chain locked.
    fn run_chain(
        chain: &HandlerChain,
        request: &mut HandlerRequest<'_>,
        response: &mut HandlerResponse,
        phase: Phase,
    ) -> ProcessResult<()> {
        let mut handlers = chain.lock();
        tracing::trace!(handlers = handlers.len(), ?phase, "acquired chain lock");

        for handler in handlers.iter_mut() {
            let name = handler.name();

            handler.reset().map_err(|err| Self::handler_failed(name, err))?;
            if response.is_in_error() {
                break;
            }

            match phase {
                Phase::Generate(kind) => {
                    request.set_kind(kind);
                    handler.generate_request(request, response)
                }
                Phase::StatusResponse => handler.handle_status_response(request, response),
            }
            .map_err(|err| Self::handler_failed(name, err))?;

            tracing::trace!(handler = name, "finished processing handler");
            if response.is_in_error() {
                tracing::warn!(
                    handler = name,
                    status = response.error_code(),
                    message = response.error_message().unwrap_or(""),
                    "handler aborted the chain"
                );
                break;
            }
        }
        Ok(())
    }

    fn handler_failed(name: &str, err: HandlerError) -> ProcessError {
        tracing::error!(handler = name, error = %err, "handler chain processing failed");
        ProcessError::chain(name, err)
    }

    fn deliver_error(context: &dyn HttpContext, response: &HandlerResponse) -> ProcessResult<()> {
        if let Some(status) = response.error_code() {
            context.send_error(status)?;
        }
        Ok(())
    }
}
