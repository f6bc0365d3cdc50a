//! Token header hardening checks.
//!
//! Applied before any cryptographic work: the algorithm must be exactly
//! EdDSA (RFC 8725: never trust the header's choice of algorithm) and
//! the key identifier must look like a key identifier before it is used
//! to index the keystore.

use jsonwebtoken::Algorithm;
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// The only signature algorithm this crate accepts.
pub(crate) const ACCEPTED_ALGORITHMS: [Algorithm; 1] = [Algorithm::EdDSA];

/// Algorithm names rejected outright regardless of header content.
///
/// `none` disables verification entirely; the HMAC family enables
/// key-confusion attacks against a public verification key. None of
/// these parse into an acceptable [`Algorithm`], but the list documents
/// the threat model and anchors the rejection tests.
#[allow(dead_code)]
pub(crate) const FORBIDDEN_ALGORITHMS: [&str; 4] = ["none", "HS256", "HS384", "HS512"];

/// Upper bound on `kid` length; UUIDs are 36 characters.
const MAX_KID_LENGTH: usize = 128;

/// Rejects any algorithm outside [`ACCEPTED_ALGORITHMS`].
pub(crate) fn validate_algorithm(alg: Algorithm) -> AuthResult<()> {
    if ACCEPTED_ALGORITHMS.contains(&alg) {
        Ok(())
    } else {
        debug!(?alg, "rejected token with unsupported algorithm");
        Err(AuthError::invalid_token())
    }
}

/// Checks that an untrusted `kid` is plausible before a keystore lookup.
///
/// Non-empty, bounded length, printable ASCII only. Keeps header-supplied
/// garbage out of log lines and map lookups.
pub(crate) fn validate_kid(kid: &str) -> AuthResult<()> {
    if kid.is_empty() || kid.len() > MAX_KID_LENGTH {
        debug!(kid_len = kid.len(), "rejected token with out-of-bounds kid length");
        return Err(AuthError::invalid_token());
    }
    if !kid.bytes().all(|b| b.is_ascii_graphic()) {
        debug!("rejected token with non-printable kid");
        return Err(AuthError::invalid_token());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::assert_auth_error;

    #[test]
    fn test_eddsa_accepted() {
        assert!(validate_algorithm(Algorithm::EdDSA).is_ok());
    }

    #[rstest]
    #[case(Algorithm::HS256)]
    #[case(Algorithm::HS384)]
    #[case(Algorithm::HS512)]
    #[case(Algorithm::RS256)]
    #[case(Algorithm::ES256)]
    fn test_other_algorithms_rejected(#[case] alg: Algorithm) {
        assert_auth_error!(validate_algorithm(alg), InvalidToken);
    }

    #[test]
    fn test_uuid_kid_accepted() {
        assert!(validate_kid("3f2b8c1e-9d4a-4f6b-8e2a-1c5d7e9f0a3b").is_ok());
    }

    #[rstest]
    #[case::empty("")]
    #[case::embedded_space("abc def")]
    #[case::newline("abc\ndef")]
    #[case::control("abc\u{0}def")]
    #[case::non_ascii("kid-\u{1F511}")]
    fn test_bad_kids_rejected(#[case] kid: &str) {
        assert_auth_error!(validate_kid(kid), InvalidToken);
    }

    #[test]
    fn test_overlong_kid_rejected() {
        let kid = "a".repeat(129);
        assert_auth_error!(validate_kid(&kid), InvalidToken);
    }
}
