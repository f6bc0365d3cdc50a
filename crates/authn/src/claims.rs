//! Claim payloads carried inside issued tokens.
//!
//! Constructors stamp the temporal fields from the current wall clock:
//! `iat` and `nbf` are set to now, `exp` to now plus the caller's TTL.
//! The types place no validity judgement of their own; expiry and
//! not-before are enforced during verification, not here.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Issuer stamped into every set of claims this crate constructs.
pub const ISSUER: &str = "keyward";

/// Seconds since the Unix epoch, clamped at zero.
fn now_ts() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Claims for an authenticated user session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Numeric identifier of the authenticated user.
    pub id: i64,
    /// Token issuer.
    pub iss: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: u64,
    /// Not valid before, seconds since the Unix epoch.
    pub nbf: u64,
    /// Issued at, seconds since the Unix epoch.
    pub iat: u64,
}

impl SessionClaims {
    /// Builds session claims for `id` valid from now for `ttl`.
    #[must_use]
    pub fn new(id: i64, ttl: Duration) -> Self {
        let now = now_ts();
        Self { id, iss: ISSUER.to_owned(), exp: now + ttl.as_secs(), nbf: now, iat: now }
    }
}

/// Claims attesting that an email address has been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailVerifiedClaims {
    /// The verified email address.
    pub email: String,
    /// Token issuer.
    pub iss: String,
    /// Subject, set to the verified email address.
    pub sub: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: u64,
    /// Not valid before, seconds since the Unix epoch.
    pub nbf: u64,
    /// Issued at, seconds since the Unix epoch.
    pub iat: u64,
}

impl EmailVerifiedClaims {
    /// Builds email-verification claims for `email` valid from now for `ttl`.
    #[must_use]
    pub fn new(email: impl Into<String>, ttl: Duration) -> Self {
        let email = email.into();
        let now = now_ts();
        Self {
            sub: email.clone(),
            email,
            iss: ISSUER.to_owned(),
            exp: now + ttl.as_secs(),
            nbf: now,
            iat: now,
        }
    }
}
