//! Adversarial verification tests.
//!
//! Every token here is one a legitimate issuer would never produce:
//! downgraded algorithms, foreign signatures under known key ids,
//! spliced payloads, and raw garbage. All of them must be rejected with
//! the cause-blind `InvalidToken`, and none may panic.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use keyward_authn::testutil::{
    craft_raw_jwt, forged_token, hs256_token, swap_payload, unsigned_token,
};
use keyward_authn::{Auth, SessionClaims, assert_auth_error};
use keyward_keystore::KeyStore;
use rstest::rstest;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn fixture() -> (Auth, Arc<KeyStore>) {
    let (tx, _rx) = mpsc::unbounded_channel();
    let store = KeyStore::new(
        Duration::from_secs(3600),
        Duration::from_secs(7200),
        CancellationToken::new(),
        tx,
    )
    .expect("keystore");
    (Auth::new(Arc::clone(&store)), store)
}

fn claims() -> SessionClaims {
    SessionClaims::new(42, Duration::from_secs(900))
}

#[tokio::test]
async fn rejects_alg_none_under_active_kid() {
    let (auth, store) = fixture();
    let (kid, _) = store.active().expect("active key");

    let token = unsigned_token(&kid, &claims());
    assert_auth_error!(auth.parse::<SessionClaims>(&token), InvalidToken);
    store.shutdown().await;
}

#[tokio::test]
async fn rejects_hs256_keyed_with_public_key() {
    let (auth, store) = fixture();
    let (kid, key) = store.active().expect("active key");

    // Key-confusion downgrade: MAC with the verifier's own public key bytes.
    let token = hs256_token(&kid, key.public_key_b64().as_bytes(), &claims());
    assert_auth_error!(auth.parse::<SessionClaims>(&token), InvalidToken);
    store.shutdown().await;
}

#[tokio::test]
async fn rejects_foreign_signature_under_active_kid() {
    let (auth, store) = fixture();
    let (kid, _) = store.active().expect("active key");

    let token = forged_token(&kid, &claims());
    assert_auth_error!(auth.parse::<SessionClaims>(&token), InvalidToken);
    store.shutdown().await;
}

#[tokio::test]
async fn rejects_unknown_kid() {
    let (auth, store) = fixture();

    let token = forged_token("3f2b8c1e-9d4a-4f6b-8e2a-1c5d7e9f0a3b", &claims());
    assert_auth_error!(auth.parse::<SessionClaims>(&token), InvalidToken);
    store.shutdown().await;
}

#[tokio::test]
async fn rejects_missing_kid() {
    let (auth, store) = fixture();

    let payload = serde_json::to_string(&claims()).expect("serialize");
    let token = craft_raw_jwt(r#"{"alg":"EdDSA","typ":"JWT"}"#, &payload, b"sig");
    assert_auth_error!(auth.parse::<SessionClaims>(&token), InvalidToken);
    store.shutdown().await;
}

#[tokio::test]
async fn rejects_tampered_payload() {
    let (auth, store) = fixture();

    let token = auth.token(&claims()).expect("token");
    let mut inflated = claims();
    inflated.id = 1;
    let tampered = swap_payload(&token, &serde_json::to_string(&inflated).expect("serialize"));

    assert_ne!(token, tampered);
    assert_auth_error!(auth.parse::<SessionClaims>(&tampered), InvalidToken);
    store.shutdown().await;
}

#[tokio::test]
async fn rejects_expired_claims_without_leeway() {
    let (auth, store) = fixture();

    let mut expired = claims();
    expired.exp = expired.iat - 10;
    let token = auth.token(&expired).expect("token");

    // A properly signed token with a past exp fails immediately; there is
    // no grace window.
    assert_auth_error!(auth.parse::<SessionClaims>(&token), InvalidToken);
    store.shutdown().await;
}

#[tokio::test]
async fn rejects_not_yet_valid_claims() {
    let (auth, store) = fixture();

    let mut premature = claims();
    premature.nbf = premature.iat + 3600;
    premature.exp = premature.iat + 7200;
    let token = auth.token(&premature).expect("token");

    assert_auth_error!(auth.parse::<SessionClaims>(&token), InvalidToken);
    store.shutdown().await;
}

#[rstest]
#[case::empty("")]
#[case::lone_dot(".")]
#[case::two_dots("..")]
#[case::two_segments("a.b")]
#[case::garbage_segments("!!!.@@@.###")]
#[case::garbage_base64("a.b.c")]
#[tokio::test]
async fn malformed_raw_tokens_fail_without_panicking(#[case] raw: &str) {
    let (auth, store) = fixture();
    assert_auth_error!(auth.parse::<SessionClaims>(raw), InvalidToken);
    store.shutdown().await;
}

#[tokio::test]
async fn non_json_payload_fails_without_panicking() {
    let (auth, store) = fixture();
    let (kid, _) = store.active().expect("active key");

    let header = format!(r#"{{"alg":"EdDSA","typ":"JWT","kid":"{kid}"}}"#);
    let token = craft_raw_jwt(&header, "this is not json", b"sig");
    assert_auth_error!(auth.parse::<SessionClaims>(&token), InvalidToken);
    store.shutdown().await;
}
