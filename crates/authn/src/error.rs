//! Authentication error types and result alias.
//!
//! Verification failures are deliberately cause-blind: every way a token
//! can fail to verify (bad signature, unknown key, unsupported
//! algorithm, expired claims) collapses into [`AuthError::InvalidToken`]
//! so a caller probing the API learns nothing about which check tripped.
//! The one structural distinction kept is [`AuthError::MalformedToken`],
//! which reports a bearer header that is not shaped like
//! `Bearer <token>` at all.

use keyward_keystore::KeystoreError;
use thiserror::Error;

/// Result type alias for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors that can occur during token issuance and verification.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]`; new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The token failed verification.
    ///
    /// Covers every rejection cause: signature mismatch, unknown or
    /// revoked signing key, unsupported algorithm, malformed JWT
    /// segments, and expired or not-yet-valid claims. The causes are
    /// logged at `debug` level but never surfaced to the caller.
    #[error("invalid token")]
    InvalidToken,

    /// The authorization header value was not `Bearer <token>`.
    ///
    /// A shape failure of the header, before any token inspection.
    #[error("expected authorization header format: Bearer <token>")]
    MalformedToken,

    /// No active signing key was available for issuance.
    #[error("no active signing key")]
    NoActiveKey {
        /// The keystore failure that left issuance without a key.
        #[source]
        source: KeystoreError,
    },

    /// Signing the token failed.
    #[error("failed to sign token")]
    Signing {
        /// The underlying JWT library error.
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

impl AuthError {
    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token() -> Self {
        Self::InvalidToken
    }

    /// Creates a new `MalformedToken` error.
    #[must_use]
    pub fn malformed_token() -> Self {
        Self::MalformedToken
    }

    /// Creates a new `NoActiveKey` error wrapping the keystore failure.
    #[must_use]
    pub fn no_active_key(source: KeystoreError) -> Self {
        Self::NoActiveKey { source }
    }

    /// Creates a new `Signing` error wrapping the JWT library failure.
    #[must_use]
    pub fn signing(source: jsonwebtoken::errors::Error) -> Self {
        Self::Signing { source }
    }
}

/// Asserts that an [`AuthResult`] is an `Err` matching the given [`AuthError`] variant.
#[macro_export]
macro_rules! assert_auth_error {
    ($result:expr, $variant:ident) => {
        assert!(
            matches!($result, Err($crate::AuthError::$variant { .. })),
            "expected AuthError::{}, got: {:?}",
            stringify!($variant),
            $result,
        );
    };
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(AuthError::invalid_token().to_string(), "invalid token");
        assert_eq!(
            AuthError::malformed_token().to_string(),
            "expected authorization header format: Bearer <token>",
        );
        assert_eq!(
            AuthError::no_active_key(KeystoreError::invalid_key()).to_string(),
            "no active signing key",
        );
    }

    #[test]
    fn test_no_active_key_preserves_source() {
        use std::error::Error;

        let err = AuthError::no_active_key(KeystoreError::invalid_key());
        let source = err.source().expect("source chain must be preserved");
        assert_eq!(source.to_string(), "requested key is not a valid keystore key");
    }

    #[test]
    fn test_assert_auth_error_macro() {
        let result: AuthResult<()> = Err(AuthError::invalid_token());
        assert_auth_error!(result, InvalidToken);

        let result: AuthResult<()> = Err(AuthError::no_active_key(KeystoreError::invalid_key()));
        assert_auth_error!(result, NoActiveKey);
    }
}
