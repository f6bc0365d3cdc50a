//! Test-support helpers for crafting adversarial JWTs.
//!
//! Enabled with the `testutil` cargo feature. Everything here exists to
//! build tokens a legitimate issuer would never produce: foreign
//! signatures under a known `kid`, downgraded algorithms, and raw
//! segment splices.

#![allow(clippy::expect_used)]

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use rand_core::{OsRng, RngCore};
use serde::Serialize;
use zeroize::Zeroizing;

/// Builds a compact JWS from raw segments without any signing.
///
/// `signature` may be empty (the `alg: none` shape) or arbitrary bytes.
#[must_use]
pub fn craft_raw_jwt(header_json: &str, payload_json: &str, signature: &[u8]) -> String {
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(payload_json),
        URL_SAFE_NO_PAD.encode(signature),
    )
}

/// An `alg: none` token carrying the given `kid` and claims, unsigned.
#[must_use]
pub fn unsigned_token<C: Serialize>(kid: &str, claims: &C) -> String {
    let header = format!(r#"{{"alg":"none","typ":"JWT","kid":"{kid}"}}"#);
    let payload = serde_json::to_string(claims).expect("serialize claims");
    format!("{}.{}.", URL_SAFE_NO_PAD.encode(header), URL_SAFE_NO_PAD.encode(payload))
}

/// An HS256 token under the given `kid`, MACed with `secret`.
///
/// Models the key-confusion downgrade where an attacker MACs with the
/// verifier's public key bytes as the shared secret.
#[must_use]
pub fn hs256_token<C: Serialize>(kid: &str, secret: &[u8], claims: &C) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(kid.to_owned());
    jsonwebtoken::encode(&header, claims, &EncodingKey::from_secret(secret))
        .expect("encode hs256 token")
}

/// An EdDSA token under the given `kid`, signed with a freshly generated
/// key the verifier has never seen.
#[must_use]
pub fn forged_token<C: Serialize>(kid: &str, claims: &C) -> String {
    let mut header = Header::new(Algorithm::EdDSA);
    header.kid = Some(kid.to_owned());
    jsonwebtoken::encode(&header, claims, &attacker_encoding_key()).expect("encode forged token")
}

/// Replaces a token's payload segment, leaving header and signature as-is.
#[must_use]
pub fn swap_payload(token: &str, payload_json: &str) -> String {
    let mut parts = token.split('.');
    let header = parts.next().expect("header segment");
    let signature = parts.nth(1).expect("signature segment");
    format!("{header}.{}.{signature}", URL_SAFE_NO_PAD.encode(payload_json))
}

fn attacker_encoding_key() -> EncodingKey {
    let mut seed = Zeroizing::new([0u8; 32]);
    OsRng.fill_bytes(seed.as_mut());

    // Minimal PKCS#8 v1 wrapper around the raw seed.
    let mut der = Zeroizing::new(vec![
        0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22,
        0x04, 0x20,
    ]);
    der.extend_from_slice(seed.as_ref());
    EncodingKey::from_ed_der(&der)
}
