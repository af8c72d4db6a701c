//! Complete SP request flows through registry-built chains.

use std::sync::Arc;

use fed_core::{AuditEvent, AuditEventType, AuditHelper, Binding, ProviderConfig};
use fed_crypto::{InMemoryTrustKeyManager, KeyAlgorithm, SigningKey, TrustKeyManager};
use fed_integration_tests::{
    chain_config, chain_of, init_tracing, processor, sp_config, BrokenTransport, Journal, Script,
    ScriptedHandler, IDP_URL, LOGOUT_URL, SP_URL,
};
use fed_protocol_saml::handlers::{
    AUTHN_REQUEST_HANDLER, LOGOUT_REQUEST_HANDLER, NAMEID_FORMAT, PRINCIPAL_ATTRIBUTE,
    REQUEST_ID_ATTRIBUTE, SESSION_INDEX_ATTRIBUTE,
};
use fed_protocol_saml::{
    register_builtin_handlers, ProcessError, ServiceProviderProcessor, STATUS_SUCCESS,
};
use fed_spi::constants::GLOBAL_LOGOUT;
use fed_spi::{
    HandlerBase, HandlerChain, HandlerConfig, HandlerRegistry, HandlerRequest, HandlerResponse,
    HandlerResult, HttpContext, HttpSession, SamlDocument, SamlHandler, SimpleHttpContext,
    SpiError,
};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct RecordingAudit {
    events: Mutex<Vec<AuditEvent>>,
}

impl AuditHelper for RecordingAudit {
    fn audit(&self, event: AuditEvent) {
        self.events.lock().push(event);
    }
}

fn builtin_chain(names: &[&str]) -> Result<HandlerChain, SpiError> {
    let registry = HandlerRegistry::new();
    register_builtin_handlers(&registry);
    let handler_config = Arc::new(HandlerConfig::new().with_parameter(NAMEID_FORMAT, "email"));
    registry.build_chain(names, &handler_config, &chain_config())
}

fn logged_in_session() -> HttpSession {
    let session = HttpSession::new();
    session.set_attribute(PRINCIPAL_ATTRIBUTE, "alice@example.org");
    session.set_attribute(SESSION_INDEX_ATTRIBUTE, "_idx7");
    session
}

/// Tests that two no-op handlers leave the configured response untouched.
#[test]
fn noop_chain_round_trip() -> anyhow::Result<()> {
    init_tracing();
    let journal = Journal::default();
    let chain = chain_of(vec![
        ScriptedHandler::new("one", Script::Noop, &journal),
        ScriptedHandler::new("two", Script::Noop, &journal),
    ]);

    let processor = ServiceProviderProcessor::new(true, SP_URL)
        .with_configuration(ProviderConfig::from(sp_config().with_binding(Binding::Redirect)));
    let response = processor.process(&SimpleHttpContext::new("/app"), &chain)?;

    assert_eq!(response.destination(), IDP_URL);
    assert!(!response.is_post_binding());
    assert!(!response.is_in_error());
    assert!(response.resulting_document().is_none());
    Ok(())
}

/// Tests the authentication flow with the built-in handlers.
#[test]
fn authentication_flow_produces_authn_request() -> anyhow::Result<()> {
    init_tracing();
    let chain = builtin_chain(&[LOGOUT_REQUEST_HANDLER, AUTHN_REQUEST_HANDLER])?;
    let audit = Arc::new(RecordingAudit::default());
    let context = SimpleHttpContext::new("/app").with_session(HttpSession::new());

    let response = processor(sp_config())
        .with_audit_helper(Arc::clone(&audit) as Arc<dyn AuditHelper>)
        .process(&context, &chain)?;

    assert!(response.send_request());
    let document = response
        .resulting_document()
        .ok_or_else(|| anyhow::anyhow!("no AuthnRequest generated"))?;
    assert!(document.as_str().starts_with("<samlp:AuthnRequest"));
    assert!(document.as_str().contains(&format!(r#"Destination="{IDP_URL}""#)));
    assert!(document.as_str().contains("HTTP-POST"));

    let session = context.session().ok_or_else(|| anyhow::anyhow!("session lost"))?;
    let request_id = session
        .get_attribute(REQUEST_ID_ATTRIBUTE)
        .ok_or_else(|| anyhow::anyhow!("request ID not stored"))?;
    assert!(document.as_str().contains(&request_id));

    let events = audit.events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, AuditEventType::RequestToIdp);
    Ok(())
}

/// Tests the global logout flow to the SP logout URL.
#[test]
fn global_logout_flow_produces_logout_request() -> anyhow::Result<()> {
    init_tracing();
    let chain = builtin_chain(&[AUTHN_REQUEST_HANDLER, LOGOUT_REQUEST_HANDLER])?;
    let context = SimpleHttpContext::new("/app")
        .with_parameter(GLOBAL_LOGOUT, "TRUE")
        .with_session(logged_in_session());

    let response = processor(sp_config().with_logout_url(LOGOUT_URL)).process(&context, &chain)?;

    assert_eq!(response.destination(), LOGOUT_URL);
    let xml = response
        .resulting_document()
        .ok_or_else(|| anyhow::anyhow!("no LogoutRequest generated"))?
        .as_str();
    assert!(xml.starts_with("<samlp:LogoutRequest"));
    assert!(xml.contains(&format!(r#"Destination="{LOGOUT_URL}""#)));
    assert!(xml.contains(">alice@example.org</saml:NameID>"));
    assert!(xml.contains("<samlp:SessionIndex>_idx7</samlp:SessionIndex>"));
    assert!(context.sent_errors().is_empty());
    Ok(())
}

/// Tests that logout without a principal is answered with one 403.
#[test]
fn logout_without_principal_sends_forbidden_once() -> anyhow::Result<()> {
    init_tracing();
    let journal = Journal::default();
    let chain = builtin_chain(&[LOGOUT_REQUEST_HANDLER])?;
    chain.add(Box::new(ScriptedHandler::new("after", Script::Noop, &journal)))?;

    let context = SimpleHttpContext::new("/app")
        .with_parameter(GLOBAL_LOGOUT, "true")
        .with_session(HttpSession::new());

    let response = processor(sp_config()).process(&context, &chain)?;

    assert_eq!(response.error_code(), Some(403));
    assert_eq!(context.sent_errors(), vec![403]);
    assert!(journal.entries().is_empty(), "no handler runs after the error");
    Ok(())
}

/// Tests that a failed error delivery surfaces as a transport error.
#[test]
fn failed_error_delivery_is_a_transport_error() {
    init_tracing();
    let journal = Journal::default();
    let chain = chain_of(vec![ScriptedHandler::new("rejecting", Script::SetError(400), &journal)]);
    let transport = BrokenTransport::default();

    let result = processor(sp_config()).process(&transport, &chain);

    assert!(matches!(result, Err(ProcessError::Transport(_))));
    assert_eq!(transport.attempts(), 1);
    assert!(chain.try_lock().is_some());
}

/// Tests that handlers can verify IDP-signed material with the resolved key.
#[test]
fn handlers_receive_idp_validating_key() -> anyhow::Result<()> {
    #[derive(Debug)]
    struct SignatureCheck {
        base: HandlerBase,
        message: Vec<u8>,
        signature: Vec<u8>,
        verified: Arc<Mutex<Option<bool>>>,
    }

    impl SamlHandler for SignatureCheck {
        fn base(&self) -> &HandlerBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut HandlerBase {
            &mut self.base
        }

        fn generate_request(
            &mut self,
            request: &mut HandlerRequest<'_>,
            _response: &mut HandlerResponse,
        ) -> HandlerResult<()> {
            let options = request.options();
            let verified = options.decrypting_key().is_some()
                && options
                    .sender_public_key()
                    .is_some_and(|key| key.verify(&self.message, &self.signature).is_ok());
            *self.verified.lock() = Some(verified);
            Ok(())
        }
    }

    init_tracing();
    let idp_signing = SigningKey::generate(KeyAlgorithm::Es384)?;
    let key_manager: Arc<dyn TrustKeyManager> = Arc::new(
        InMemoryTrustKeyManager::new()
            .with_signing_key(SigningKey::generate(KeyAlgorithm::Es384)?)
            .with_validating_key("idp.example.org", idp_signing.public_key()),
    );

    let message = b"<samlp:Response ID=\"_r9\"/>".to_vec();
    let check = SignatureCheck {
        base: HandlerBase::new(),
        signature: idp_signing.sign(&message)?,
        message,
        verified: Arc::default(),
    };
    let verified = Arc::clone(&check.verified);
    let chain = HandlerChain::new().with_handler(check)?;

    processor(sp_config())
        .with_trust_key_manager(key_manager)
        .process(&SimpleHttpContext::new("/app"), &chain)?;

    assert_eq!(*verified.lock(), Some(true));
    Ok(())
}

/// Tests that a successful LogoutResponse from the IDP ends the local session.
#[test]
fn logout_response_ends_session() -> anyhow::Result<()> {
    init_tracing();
    let chain = builtin_chain(&[AUTHN_REQUEST_HANDLER, LOGOUT_REQUEST_HANDLER])?;
    let context = SimpleHttpContext::new("/app").with_session(logged_in_session());
    let document = SamlDocument::new(format!(
        r#"<samlp:LogoutResponse xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" ID="_lr1"><samlp:Status><samlp:StatusCode Value="{STATUS_SUCCESS}"/></samlp:Status></samlp:LogoutResponse>"#
    ));

    let response = processor(sp_config()).handle_status_response(&context, &chain, document)?;

    assert_eq!(response.destination(), SP_URL);
    let session = context.session().ok_or_else(|| anyhow::anyhow!("session lost"))?;
    assert!(session.is_invalidated());
    Ok(())
}

/// Tests that a failed LogoutResponse keeps the local session.
#[test]
fn failed_logout_response_keeps_session() -> anyhow::Result<()> {
    init_tracing();
    let chain = builtin_chain(&[LOGOUT_REQUEST_HANDLER])?;
    let context = SimpleHttpContext::new("/app").with_session(logged_in_session());
    let document = SamlDocument::new(
        r#"<samlp:LogoutResponse ID="_lr2"><samlp:Status><samlp:StatusCode Value="urn:oasis:names:tc:SAML:2.0:status:Responder"/></samlp:Status></samlp:LogoutResponse>"#,
    );

    processor(sp_config()).handle_status_response(&context, &chain, document)?;

    let session = context.session().ok_or_else(|| anyhow::anyhow!("session lost"))?;
    assert!(!session.is_invalidated());
    Ok(())
}

/// Tests that the IDP response is correlated with the AuthnRequest sent.
#[test]
fn authn_response_correlates_with_pending_request() -> anyhow::Result<()> {
    init_tracing();
    let chain = builtin_chain(&[AUTHN_REQUEST_HANDLER])?;
    let context = SimpleHttpContext::new("/app").with_session(HttpSession::new());
    let processor = processor(sp_config());

    processor.process(&context, &chain)?;
    let session = context.session().ok_or_else(|| anyhow::anyhow!("session lost"))?;
    let request_id = session
        .get_attribute(REQUEST_ID_ATTRIBUTE)
        .ok_or_else(|| anyhow::anyhow!("request ID not stored"))?;

    let forged = SamlDocument::new(r#"<samlp:Response ID="_r1" InResponseTo="_forged"/>"#);
    let response = processor.handle_status_response(&context, &chain, forged)?;
    assert_eq!(response.error_code(), Some(400));
    assert_eq!(context.sent_errors(), vec![400]);

    let answer = SamlDocument::new(format!(
        r#"<samlp:Response ID="_r2" InResponseTo="{request_id}"/>"#
    ));
    let response = processor.handle_status_response(&context, &chain, answer)?;
    assert!(!response.is_in_error());
    assert!(session.get_attribute(REQUEST_ID_ATTRIBUTE).is_none());
    assert_eq!(context.sent_errors(), vec![400]);
    Ok(())
}

/// Tests that unknown handler names fail chain assembly.
#[test]
fn unknown_handler_name_fails_assembly() {
    let result = builtin_chain(&[AUTHN_REQUEST_HANDLER, "artifact-resolution"]);
    assert!(matches!(result, Err(SpiError::HandlerNotFound(name)) if name == "artifact-resolution"));
}
