//! JWT issuance and verification bound to live signing-key rotation.
//!
//! [`Auth`] signs claims with whatever key a
//! [`KeyStore`](keyward_keystore::KeyStore) currently marks active,
//! embedding the key identifier in the token header, and verifies
//! incoming tokens by resolving that identifier back through the store.
//! Because superseded keys stay resolvable until they expire, rotation
//! never invalidates outstanding tokens early; revocation and key expiry
//! do.
//!
//! Verification is deliberately strict and quiet: only EdDSA signatures
//! are accepted, `exp` and `nbf` are enforced with zero leeway, and every
//! rejection cause collapses into [`AuthError::InvalidToken`].
//!
//! # Quick start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use keyward_authn::{Auth, SessionClaims};
//! use keyward_keystore::KeyStore;
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let (errors_tx, _errors_rx) = mpsc::unbounded_channel();
//! let store = KeyStore::new(
//!     Duration::from_secs(3600),
//!     Duration::from_secs(7200),
//!     CancellationToken::new(),
//!     errors_tx,
//! )?;
//!
//! let auth = Auth::new(store);
//! let token = auth.token(&SessionClaims::new(42, Duration::from_secs(900)))?;
//! let claims: SessionClaims = auth.parse_from_bearer(&format!("Bearer {token}"))?;
//! assert_eq!(claims.id, 42);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod claims;
pub mod error;
#[cfg(feature = "testutil")]
pub mod testutil;
mod validation;

pub use auth::Auth;
pub use claims::{EmailVerifiedClaims, ISSUER, SessionClaims};
pub use error::{AuthError, AuthResult};
