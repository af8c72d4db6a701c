//! ECDSA key material.
//!
//! [`SigningKey`] is the SP's own key: it signs outbound requests and
//! decrypts inbound content. [`PublicKey`] is a peer's validating key, used to
//! verify signatures on material issued by the identity provider.
//!
//! ## Supported Algorithms
//!
//! - ES384 (ECDSA with P-384 and SHA-384)
//! - ES512 (ECDSA with P-521 and SHA-512)

use std::fmt;

use aws_lc_rs::{
    digest,
    rand::SystemRandom,
    signature::{
        EcdsaKeyPair, EcdsaSigningAlgorithm, EcdsaVerificationAlgorithm, KeyPair,
        UnparsedPublicKey, ECDSA_P384_SHA384_ASN1, ECDSA_P384_SHA384_ASN1_SIGNING,
        ECDSA_P521_SHA512_ASN1, ECDSA_P521_SHA512_ASN1_SIGNING,
    },
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for key operations.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Key generation failed.
    #[error("key generation failed: {0}")]
    Generation(String),

    /// Invalid key format.
    #[error("invalid key format: {0}")]
    InvalidKey(String),

    /// Signing failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Verification failed.
    #[error("signature verification failed")]
    Verification,
}

/// Key algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    /// ECDSA using P-384 curve and SHA-384 hash.
    #[default]
    #[serde(rename = "ES384")]
    Es384,

    /// ECDSA using P-521 curve and SHA-512 hash.
    #[serde(rename = "ES512")]
    Es512,
}

impl KeyAlgorithm {
    /// Returns the JWA name.
    #[must_use]
    pub const fn jwa_name(self) -> &'static str {
        match self {
            Self::Es384 => "ES384",
            Self::Es512 => "ES512",
        }
    }

    fn signing(self) -> &'static EcdsaSigningAlgorithm {
        match self {
            Self::Es384 => &ECDSA_P384_SHA384_ASN1_SIGNING,
            Self::Es512 => &ECDSA_P521_SHA512_ASN1_SIGNING,
        }
    }

    fn verification(self) -> &'static EcdsaVerificationAlgorithm {
        match self {
            Self::Es384 => &ECDSA_P384_SHA384_ASN1,
            Self::Es512 => &ECDSA_P521_SHA512_ASN1,
        }
    }
}

/// A validating (public) key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    algorithm: KeyAlgorithm,
    key_id: String,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Wraps an uncompressed EC point.
    #[must_use]
    pub fn from_bytes(algorithm: KeyAlgorithm, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            algorithm,
            key_id: generate_key_id(&bytes),
            bytes,
        }
    }

    /// Returns the key ID.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Returns the algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// Returns the raw public key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Verifies an ASN.1 DER signature over `data`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Verification`] if the signature does not match.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<(), KeyError> {
        UnparsedPublicKey::new(self.algorithm.verification(), &self.bytes)
            .verify(data, signature)
            .map_err(|_| KeyError::Verification)
    }
}

/// The local signing/decryption key.
pub struct SigningKey {
    key_pair: EcdsaKeyPair,
    key_id: String,
    algorithm: KeyAlgorithm,
}

impl SigningKey {
    /// Creates a signing key from a PKCS#8 DER-encoded private key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not match the algorithm.
    pub fn from_pkcs8(pkcs8_der: &[u8], algorithm: KeyAlgorithm) -> Result<Self, KeyError> {
        let key_pair = EcdsaKeyPair::from_pkcs8(algorithm.signing(), pkcs8_der)
            .map_err(|e| KeyError::InvalidKey(format!("Invalid ECDSA PKCS#8 key: {e}")))?;

        let key_id = generate_key_id(key_pair.public_key().as_ref());

        Ok(Self {
            key_pair,
            key_id,
            algorithm,
        })
    }

    /// Generates a fresh key pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the random source fails.
    pub fn generate(algorithm: KeyAlgorithm) -> Result<Self, KeyError> {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(algorithm.signing(), &rng)
            .map_err(|e| KeyError::Generation(e.to_string()))?;
        Self::from_pkcs8(pkcs8.as_ref(), algorithm)
    }

    /// Returns the key ID.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Returns the algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// Returns the matching public key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_bytes(self.algorithm, self.key_pair.public_key().as_ref())
    }

    /// Signs the given data.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, KeyError> {
        let rng = SystemRandom::new();
        let signature = self
            .key_pair
            .sign(&rng, data)
            .map_err(|e| KeyError::Signing(format!("ECDSA signing failed: {e}")))?;
        Ok(signature.as_ref().to_vec())
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("key_id", &self.key_id)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Generates a key ID from the public key bytes.
fn generate_key_id(public_key: &[u8]) -> String {
    let hash = digest::digest(&digest::SHA384, public_key);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&hash.as_ref()[..8])
}
