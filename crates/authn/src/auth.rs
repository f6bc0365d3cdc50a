//! Token issuance and verification against a live keystore.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, Header, Validation};
use keyward_keystore::KeyStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::{AuthError, AuthResult};
use crate::validation::{validate_algorithm, validate_kid};

/// Issues and verifies JWTs signed with the keystore's rotating keys.
///
/// `Auth` holds no key material of its own. Issuance reads the currently
/// active key at call time; verification resolves the token's `kid`
/// header against the same store. Cloning is cheap and every clone
/// observes the same rotating key set.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use keyward_authn::{Auth, SessionClaims};
/// use keyward_keystore::KeyStore;
/// use tokio::sync::mpsc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let (errors_tx, _errors_rx) = mpsc::unbounded_channel();
/// let store = KeyStore::new(
///     Duration::from_secs(3600),
///     Duration::from_secs(7200),
///     CancellationToken::new(),
///     errors_tx,
/// )?;
/// let auth = Auth::new(store);
///
/// let token = auth.token(&SessionClaims::new(42, Duration::from_secs(900)))?;
/// let claims: SessionClaims = auth.parse_from_bearer(&format!("Bearer {token}"))?;
/// assert_eq!(claims.id, 42);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Auth {
    keystore: Arc<KeyStore>,
}

impl Auth {
    /// Creates an `Auth` bound to the given keystore.
    #[must_use]
    pub fn new(keystore: Arc<KeyStore>) -> Self {
        Self { keystore }
    }

    /// Signs `claims` with the active key, embedding its `kid` in the
    /// token header.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NoActiveKey`] if the keystore has no usable
    /// active key, or [`AuthError::Signing`] if encoding fails.
    #[instrument(skip(self, claims))]
    pub fn token<C: Serialize>(&self, claims: &C) -> AuthResult<String> {
        let (kid, key) = self.keystore.active().map_err(AuthError::no_active_key)?;

        let mut header = Header::new(Algorithm::EdDSA);
        header.kid = Some(kid);

        jsonwebtoken::encode(&header, claims, key.encoding_key()).map_err(AuthError::signing)
    }

    /// Verifies a raw token and deserializes its claims.
    ///
    /// The token's `kid` header is untrusted input: it is format-checked,
    /// then resolved through the keystore, and only the resolved key's
    /// public half verifies the signature. `exp` is required and `nbf`
    /// enforced, both with zero leeway.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for every rejection cause:
    /// unparseable header, unsupported algorithm, missing or unresolvable
    /// `kid`, bad signature, expired or not-yet-valid claims. The
    /// specific cause is logged at `debug` level only.
    pub fn parse<C: DeserializeOwned>(&self, token: &str) -> AuthResult<C> {
        let header = jsonwebtoken::decode_header(token).map_err(|error| {
            debug!(%error, "rejected token with unparseable header");
            AuthError::invalid_token()
        })?;
        validate_algorithm(header.alg)?;

        let kid = header.kid.as_deref().ok_or_else(|| {
            debug!("rejected token without kid header");
            AuthError::invalid_token()
        })?;
        validate_kid(kid)?;

        let key = self.keystore.signer(kid).map_err(|error| {
            debug!(%error, "rejected token whose kid did not resolve");
            AuthError::invalid_token()
        })?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.validate_aud = false;
        validation.validate_nbf = true;
        validation.leeway = 0;

        let data =
            jsonwebtoken::decode::<C>(token, key.decoding_key(), &validation).map_err(|error| {
                debug!(%error, "token verification failed");
                AuthError::invalid_token()
            })?;
        Ok(data.claims)
    }

    /// Extracts the token from an `Authorization` header value and
    /// verifies it.
    ///
    /// The value must be exactly two parts separated by a single ASCII
    /// space, the first part literally `Bearer` and the second non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedToken`] when the value is not shaped
    /// like `Bearer <token>`; otherwise whatever [`parse`](Self::parse)
    /// returns for the extracted token.
    pub fn parse_from_bearer<C: DeserializeOwned>(&self, header_value: &str) -> AuthResult<C> {
        let mut parts = header_value.split(' ');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("Bearer"), Some(token), None) if !token.is_empty() => self.parse(token),
            _ => {
                debug!("rejected malformed authorization header");
                Err(AuthError::malformed_token())
            }
        }
    }
}
