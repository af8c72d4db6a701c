//! `AuthnRequest` generation.

use fed_core::{AuditEvent, AuditEventType, ConfigurationError, ProviderConfig};
use fed_spi::{
    HandlerBase, HandlerRequest, HandlerResponse, HandlerResult, RequestKind, SamlDocument,
    SamlHandler,
};

use super::{audit, require_service_provider, NAMEID_FORMAT};
use crate::types::{AuthnRequest, NameIdFormat, NameIdPolicy, SamlBinding, StatusResponse};

/// Session attribute holding the ID of the last `AuthnRequest` sent.
pub const REQUEST_ID_ATTRIBUTE: &str = "saml.request.id";

/// Handler configuration flag asking the IDP to re-authenticate the user.
const FORCE_AUTHN: &str = "FORCE_AUTHN";

/// Handler configuration flag asking the IDP not to interact with the user.
const IS_PASSIVE: &str = "IS_PASSIVE";

const BAD_REQUEST: u16 = 400;

/// Builds the `AuthnRequest` of an authentication run.
///
/// The request is addressed to the response destination, asks for the
/// response binding, and names the SP service URL as assertion consumer.
/// Its ID is remembered in the HTTP session. A `Response` that names an
/// `InResponseTo` must answer that pending request, otherwise the chain is
/// aborted with HTTP 400. Responses without `InResponseTo` are IDP-initiated
/// and pass through.
#[derive(Debug, Default)]
pub struct AuthnRequestHandler {
    base: HandlerBase,
    last_request_id: Option<String>,
}

impl AuthnRequestHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ID of the request generated in the current chain run.
    #[must_use]
    pub fn last_request_id(&self) -> Option<&str> {
        self.last_request_id.as_deref()
    }

    fn name_id_policy(&self) -> HandlerResult<Option<NameIdPolicy>> {
        let Some(value) = self
            .base
            .handler_config()
            .and_then(|config| config.string(NAMEID_FORMAT))
        else {
            return Ok(None);
        };
        let format = NameIdFormat::parse(value).ok_or_else(|| {
            ConfigurationError::Invalid(format!("unknown name ID format '{value}'"))
        })?;
        Ok(Some(NameIdPolicy::new(format)))
    }

    fn flag(&self, key: &str) -> bool {
        self.base
            .handler_config()
            .is_some_and(|config| config.flag(key, false))
    }
}

impl SamlHandler for AuthnRequestHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HandlerBase {
        &mut self.base
    }

    fn reset(&mut self) -> HandlerResult<()> {
        self.last_request_id = None;
        Ok(())
    }

    fn generate_request(
        &mut self,
        request: &mut HandlerRequest<'_>,
        response: &mut HandlerResponse,
    ) -> HandlerResult<()> {
        require_service_provider(self.handler_type()?)?;
        if request.kind() != RequestKind::Authentication {
            return Ok(());
        }

        let acs_url = self
            .base
            .provider_config()
            .and_then(ProviderConfig::as_service_provider)
            .map_or(request.issuer(), |sp| sp.service_url.as_str())
            .to_string();

        let mut authn = AuthnRequest::new(request.issuer())
            .with_destination(response.destination())
            .with_acs_url(acs_url)
            .with_binding(SamlBinding::from_post_flag(response.is_post_binding()))
            .force_authn(self.flag(FORCE_AUTHN))
            .is_passive(self.flag(IS_PASSIVE));
        if let Some(policy) = self.name_id_policy()? {
            authn = authn.with_name_id_policy(policy);
        }

        let mut event = AuditEvent::builder(AuditEventType::RequestToIdp)
            .issuer(request.issuer())
            .destination(response.destination())
            .detail("request_id", authn.id.clone());
        if let Some(session) = request.session() {
            session.set_attribute(REQUEST_ID_ATTRIBUTE, authn.id.clone());
            event = event.session(session.id().to_string());
        }
        audit(request, event.build());

        tracing::debug!(
            request_id = %authn.id,
            destination = response.destination(),
            "generated AuthnRequest"
        );
        response.set_resulting_document(SamlDocument::new(authn.to_xml()));
        response.set_send_request(true);
        self.last_request_id = Some(authn.id);
        Ok(())
    }

    fn handle_status_response(
        &mut self,
        request: &mut HandlerRequest<'_>,
        response: &mut HandlerResponse,
    ) -> HandlerResult<()> {
        require_service_provider(self.handler_type()?)?;

        let Some(in_response_to) = request
            .document()
            .and_then(|document| StatusResponse::parse(document.as_str()))
            .filter(StatusResponse::is_authn_response)
            .and_then(|status| status.in_response_to)
        else {
            return Ok(());
        };

        let session = request.session();
        let pending = session.and_then(|s| s.get_attribute(REQUEST_ID_ATTRIBUTE));
        if pending.as_deref() == Some(in_response_to.as_str()) {
            if let Some(session) = session {
                session.remove_attribute(REQUEST_ID_ATTRIBUTE);
            }
            tracing::debug!(request_id = %in_response_to, "response matches pending AuthnRequest");
            return Ok(());
        }

        tracing::warn!(
            in_response_to = %in_response_to,
            pending = pending.as_deref().unwrap_or("none"),
            "response does not answer the pending AuthnRequest"
        );
        audit(
            request,
            AuditEvent::builder(AuditEventType::ChainAborted)
                .failure("unsolicited InResponseTo")
                .detail("in_response_to", in_response_to)
                .build(),
        );
        response.set_error(BAD_REQUEST, "response does not match a pending request");
        Ok(())
    }
}
