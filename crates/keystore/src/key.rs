//! Signing key material and generation.
//!
//! A [`Key`] is an immutable Ed25519 keypair plus lifecycle metadata. The
//! private half is held as a [`jsonwebtoken::EncodingKey`] and never leaves
//! the key; verifiers only ever see the public projection via
//! [`Key::decoding_key`]. Intermediate private-key buffers are wrapped in
//! [`Zeroizing`] so raw seed bytes are scrubbed from memory once the
//! encoding key has been built.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use ed25519_dalek::SigningKey;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rand_core::{OsRng, RngCore};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::error::{KeystoreError, KeystoreResult};

/// Length of the raw Ed25519 seed in bytes.
const SEED_LENGTH: usize = 32;

/// An immutable signing key with lifecycle metadata.
///
/// Keys are created only by the keystore (at construction and on each
/// rotation round) and are never mutated afterwards; lifecycle changes
/// are expressed solely by the key's presence in or absence from the
/// store.
///
/// # Expiry
///
/// `expire_at` bounds the key's validity for *verification*: a key past
/// this instant must not verify tokens even if the rotation sweep has not
/// removed it yet. Key expiry is independent of the expiry of any claims
/// signed with the key.
pub struct Key {
    kid: String,
    expire_at: DateTime<Utc>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    public_key_b64: String,
}

impl Key {
    /// Generates a fresh Ed25519 key with a new UUID identifier.
    ///
    /// # Errors
    ///
    /// Returns [`KeystoreError::KeyGeneration`] if the OS secure random
    /// source fails or the public key material cannot be assembled.
    pub(crate) fn generate(expire_at: DateTime<Utc>) -> KeystoreResult<Self> {
        let mut seed = Zeroizing::new([0u8; SEED_LENGTH]);
        OsRng.try_fill_bytes(seed.as_mut()).map_err(|e| {
            KeystoreError::key_generation_with_source("secure random source unavailable", e)
        })?;

        let signing_key = SigningKey::from_bytes(&seed);
        let kid = Uuid::new_v4().to_string();

        let public_key_b64 = URL_SAFE_NO_PAD.encode(signing_key.verifying_key().to_bytes());
        let decoding_key = DecodingKey::from_ed_components(&public_key_b64).map_err(|e| {
            KeystoreError::key_generation_with_source("assemble verification key", e)
        })?;

        let pkcs8_der = ed25519_pkcs8_der(&seed);
        let encoding_key = EncodingKey::from_ed_der(&pkcs8_der);

        Ok(Self { kid, expire_at, encoding_key, decoding_key, public_key_b64 })
    }

    /// The key identifier embedded as `kid` in every token signed with this key.
    #[must_use]
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// Absolute instant after which this key is no longer valid for verification.
    #[must_use]
    pub fn expire_at(&self) -> DateTime<Utc> {
        self.expire_at
    }

    /// Whether the key is past its expiry at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_at < now
    }

    /// Private signing capability.
    ///
    /// Borrow only for the duration of a signing call; the key material
    /// itself stays owned by this `Key`.
    #[must_use]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Public verification capability matching [`encoding_key`](Self::encoding_key).
    #[must_use]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Raw Ed25519 public key, base64url-encoded without padding (RFC 7515).
    #[must_use]
    pub fn public_key_b64(&self) -> &str {
        &self.public_key_b64
    }
}

impl std::fmt::Debug for Key {
    /// Key material is intentionally excluded from debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key")
            .field("kid", &self.kid)
            .field("expire_at", &self.expire_at)
            .finish_non_exhaustive()
    }
}

/// Wraps a raw Ed25519 seed in a minimal PKCS#8 v1 DER document.
///
/// The fixed prefix encodes: SEQUENCE(46), INTEGER version 0,
/// SEQUENCE(5) with OID 1.3.101.112 (Ed25519), OCTET STRING(34)
/// containing OCTET STRING(32) with the seed itself.
fn ed25519_pkcs8_der(seed: &[u8; SEED_LENGTH]) -> Zeroizing<Vec<u8>> {
    let mut der = Zeroizing::new(vec![
        0x30, 0x2e, // SEQUENCE, 46 bytes
        0x02, 0x01, 0x00, // INTEGER version 0
        0x30, 0x05, // SEQUENCE, 5 bytes (algorithm identifier)
        0x06, 0x03, 0x2b, 0x65, 0x70, // OID 1.3.101.112 (Ed25519)
        0x04, 0x22, // OCTET STRING, 34 bytes
        0x04, 0x20, // OCTET STRING, 32 bytes (the actual key)
    ]);
    der.extend_from_slice(seed);
    der
}
