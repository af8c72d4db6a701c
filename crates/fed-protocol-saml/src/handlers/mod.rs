//! Handlers shipped with the engine.
//!
//! Both run on the Service Provider side only and are registered under
//! [`AUTHN_REQUEST_HANDLER`] and [`LOGOUT_REQUEST_HANDLER`] by
//! [`register_builtin_handlers`].

mod authn;
mod logout;

pub use authn::{AuthnRequestHandler, REQUEST_ID_ATTRIBUTE};
pub use logout::{LogoutRequestHandler, PRINCIPAL_ATTRIBUTE, SESSION_INDEX_ATTRIBUTE};

use fed_core::{AuditEvent, ProviderType};
use fed_spi::{HandlerError, HandlerRegistry, HandlerRequest, HandlerResult};

/// Registry name of [`AuthnRequestHandler`].
pub const AUTHN_REQUEST_HANDLER: &str = "authn-request";

/// Registry name of [`LogoutRequestHandler`].
pub const LOGOUT_REQUEST_HANDLER: &str = "logout-request";

/// Handler configuration key selecting the requested name ID format.
pub const NAMEID_FORMAT: &str = "NAMEID_FORMAT";

/// Registers the built-in handlers.
pub fn register_builtin_handlers(registry: &HandlerRegistry) {
    registry.register(AUTHN_REQUEST_HANDLER, || {
        Box::new(AuthnRequestHandler::default())
    });
    registry.register(LOGOUT_REQUEST_HANDLER, || {
        Box::new(LogoutRequestHandler::default())
    });
}

fn require_service_provider(handler_type: ProviderType) -> HandlerResult<()> {
    match handler_type {
        ProviderType::Sp => Ok(()),
        ProviderType::Idp => Err(HandlerError::UnsupportedHandlerType(handler_type)),
    }
}

fn audit(request: &HandlerRequest<'_>, event: AuditEvent) {
    if let Some(helper) = request.options().audit_helper() {
        helper.audit(event);
    }
}
