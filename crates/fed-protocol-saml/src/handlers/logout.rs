//! `LogoutRequest` generation and logout completion.

use fed_core::{AuditEvent, AuditEventType};
use fed_spi::{
    HandlerBase, HandlerRequest, HandlerResponse, HandlerResult, RequestKind, SamlDocument,
    SamlHandler,
};

use super::{audit, require_service_provider, NAMEID_FORMAT};
use crate::types::{LogoutRequest, NameId, NameIdFormat, StatusResponse};

/// Session attribute holding the authenticated principal.
pub const PRINCIPAL_ATTRIBUTE: &str = "saml.principal";

/// Session attribute holding the IDP session index.
pub const SESSION_INDEX_ATTRIBUTE: &str = "saml.session.index";

const FORBIDDEN: u16 = 403;

/// Builds the `LogoutRequest` of a global logout run.
///
/// Without an authenticated principal in the session the chain is aborted
/// with HTTP 403. When the IDP answers with a successful `LogoutResponse`,
/// the local session is invalidated.
#[derive(Debug, Default)]
pub struct LogoutRequestHandler {
    base: HandlerBase,
}

impl LogoutRequestHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn name_id(&self, principal: String) -> NameId {
        let name_id = NameId::new(principal);
        match self
            .base
            .handler_config()
            .and_then(|config| config.string(NAMEID_FORMAT))
            .and_then(NameIdFormat::parse)
        {
            Some(format) => name_id.with_format(format),
            None => name_id,
        }
    }
}

impl SamlHandler for LogoutRequestHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HandlerBase {
        &mut self.base
    }

    fn generate_request(
        &mut self,
        request: &mut HandlerRequest<'_>,
        response: &mut HandlerResponse,
    ) -> HandlerResult<()> {
        require_service_provider(self.handler_type()?)?;
        if request.kind() != RequestKind::Logout {
            return Ok(());
        }

        let session = request.session();
        let Some(principal) = session.and_then(|s| s.get_attribute(PRINCIPAL_ATTRIBUTE)) else {
            tracing::warn!("logout requested without an authenticated principal");
            audit(
                request,
                AuditEvent::builder(AuditEventType::ChainAborted)
                    .failure("no authenticated principal")
                    .issuer(request.issuer())
                    .build(),
            );
            response.set_error(FORBIDDEN, "no authenticated principal");
            return Ok(());
        };

        let mut logout = LogoutRequest::new(request.issuer(), self.name_id(principal))
            .with_destination(response.destination())
            .with_reason(LogoutRequest::REASON_USER);
        if let Some(index) = session.and_then(|s| s.get_attribute(SESSION_INDEX_ATTRIBUTE)) {
            logout = logout.with_session_index(index);
        }

        let mut event = AuditEvent::builder(AuditEventType::LogoutRequestToIdp)
            .issuer(request.issuer())
            .destination(response.destination())
            .detail("request_id", logout.id.clone());
        if let Some(session) = session {
            event = event.session(session.id().to_string());
        }
        audit(request, event.build());

        tracing::debug!(
            request_id = %logout.id,
            destination = response.destination(),
            "generated LogoutRequest"
        );
        response.set_resulting_document(SamlDocument::new(logout.to_xml()));
        response.set_send_request(true);
        Ok(())
    }

    fn handle_status_response(
        &mut self,
        request: &mut HandlerRequest<'_>,
        _response: &mut HandlerResponse,
    ) -> HandlerResult<()> {
        require_service_provider(self.handler_type()?)?;

        let Some(status) = request
            .document()
            .and_then(|document| StatusResponse::parse(document.as_str()))
            .filter(StatusResponse::is_logout_response)
        else {
            return Ok(());
        };

        if !status.is_success() {
            tracing::warn!(
                status = status.status_code.as_deref().unwrap_or("none"),
                "IDP logout failed, keeping session"
            );
            audit(
                request,
                AuditEvent::builder(AuditEventType::ResponseFromIdp)
                    .failure("logout failed at the IDP")
                    .detail("message", "LogoutResponse")
                    .build(),
            );
            return Ok(());
        }

        if let Some(session) = request.session() {
            tracing::debug!(session = %session.id(), "logout completed, invalidating session");
            audit(
                request,
                AuditEvent::builder(AuditEventType::ResponseFromIdp)
                    .session(session.id().to_string())
                    .detail("message", "LogoutResponse")
                    .build(),
            );
            session.invalidate();
        }
        Ok(())
    }
}
