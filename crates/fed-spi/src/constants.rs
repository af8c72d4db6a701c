//! Well-known parameter, option and query names.

/// Chain parameter and request option holding the provider configuration.
pub const CONFIGURATION: &str = "CONFIGURATION";

/// Request option holding the audit helper.
pub const AUDIT_HELPER: &str = "AUDIT_HELPER";

/// Request option holding the IDP's validating key.
pub const SENDER_PUBLIC_KEY: &str = "SENDER_PUBLIC_KEY";

/// Request option holding the local decryption key.
pub const DECRYPTING_KEY: &str = "DECRYPTING_KEY";

/// Request option holding the signature-support flag.
pub const SUPPORTS_SIGNATURES: &str = "SUPPORTS_SIGNATURES";

/// Request option holding the web application context path.
pub const CONTEXT_PATH: &str = "CONTEXT_PATH";

/// Query parameter that marks a global logout request.
pub const GLOBAL_LOGOUT: &str = "GLO";
