//! # fed-crypto
//!
//! Key material for the SAML2 Service Provider engine using aws-lc-rs.
//!
//! - [`keys`] - ECDSA signing keys and the public keys that verify them
//! - [`trust`] - the [`TrustKeyManager`] seam and an in-memory implementation
//!
//! Only P-384 and P-521 curves are offered.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod keys;
pub mod trust;

pub use keys::{KeyAlgorithm, KeyError, PublicKey, SigningKey};
pub use trust::{InMemoryTrustKeyManager, TrustKeyError, TrustKeyManager, TrustKeyResult};
