//! Keystore error types and result alias.
//!
//! # Error Types
//!
//! - [`KeystoreError::InvalidKey`] - The requested key identifier does not resolve to a
//!   usable key (absent, revoked, or past its expiry)
//! - [`KeystoreError::KeyGeneration`] - Secure randomness or identifier generation failed
//!
//! # Example
//!
//! ```
//! use keyward_keystore::{KeystoreError, KeystoreResult};
//!
//! fn lookup(kid: &str) -> KeystoreResult<()> {
//!     Err(KeystoreError::invalid_key())
//! }
//! ```

use std::sync::Arc;

use thiserror::Error;

/// A boxed error type for source chain tracking.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Result type alias for keystore operations.
pub type KeystoreResult<T> = Result<T, KeystoreError>;

/// Errors that can occur during keystore operations.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]`; new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KeystoreError {
    /// The requested key identifier does not resolve to a usable key.
    ///
    /// Returned identically whether the identifier never existed, was
    /// revoked, or belongs to a key past its expiry. Callers must not be
    /// able to distinguish those causes from the error alone.
    #[error("requested key is not a valid keystore key")]
    InvalidKey,

    /// Key material could not be generated.
    ///
    /// Covers both secure-randomness failures and identifier generation.
    /// Fatal during keystore construction; during rotation the round is
    /// skipped and the error is reported on the supervisory channel.
    #[error("key generation failed: {message}")]
    KeyGeneration {
        /// Description of the generation failure.
        message: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<BoxError>,
    },
}

impl KeystoreError {
    /// Creates a new `InvalidKey` error.
    #[must_use]
    pub fn invalid_key() -> Self {
        Self::InvalidKey
    }

    /// Creates a new `KeyGeneration` error with the given message.
    #[must_use]
    pub fn key_generation(message: impl Into<String>) -> Self {
        Self::KeyGeneration { message: message.into(), source: None }
    }

    /// Creates a new `KeyGeneration` error with a message and source error.
    #[must_use]
    pub fn key_generation_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::KeyGeneration { message: message.into(), source: Some(Arc::new(source)) }
    }
}

/// Asserts that a [`KeystoreResult`] is an `Err` matching the given [`KeystoreError`] variant.
#[macro_export]
macro_rules! assert_keystore_error {
    ($result:expr, $variant:ident) => {
        assert!(
            matches!($result, Err($crate::KeystoreError::$variant { .. })),
            "expected KeystoreError::{}, got: {:?}",
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
        let err = KeystoreError::invalid_key();
        assert_eq!(err.to_string(), "requested key is not a valid keystore key");

        let err = KeystoreError::key_generation("rng exhausted");
        assert_eq!(err.to_string(), "key generation failed: rng exhausted");
    }

    #[test]
    fn test_key_generation_preserves_source_chain() {
        use std::error::Error;

        let io_err = std::io::Error::other("entropy pool unavailable");
        let err = KeystoreError::key_generation_with_source("secure randomness", io_err);

        let source = err.source().expect("source chain must be preserved");
        assert_eq!(source.to_string(), "entropy pool unavailable");
    }

    #[test]
    fn test_assert_keystore_error_macro() {
        let result: KeystoreResult<()> = Err(KeystoreError::invalid_key());
        assert_keystore_error!(result, InvalidKey);
    }
}
