//! Concurrent Ed25519 signing-key lifecycle management.
//!
//! This crate provides [`KeyStore`], an in-process store of Ed25519
//! signing keys with scheduled live rotation:
//!
//! - **Generation**: keys are created from OS randomness with UUIDv4
//!   identifiers and a fixed expiry horizon.
//! - **Rotation**: a background task periodically generates a fresh key,
//!   promotes it to active, and sweeps keys past their expiry. Old keys
//!   stay resolvable until they expire, so tokens issued before a
//!   rotation keep verifying.
//! - **Revocation**: any key can be removed immediately, invalidating
//!   every token signed with it.
//!
//! Keys never persist: a restart starts from a fresh key and every
//! previously issued token becomes invalid. Multi-process deployments
//! each run their own store.
//!
//! # Quick start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use keyward_keystore::KeyStore;
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), keyward_keystore::KeystoreError> {
//! let shutdown = CancellationToken::new();
//! let (errors_tx, _errors_rx) = mpsc::unbounded_channel();
//!
//! // Rotate hourly; each key verifies for two hours.
//! let store = KeyStore::new(
//!     Duration::from_secs(3600),
//!     Duration::from_secs(7200),
//!     shutdown.clone(),
//!     errors_tx,
//! )?;
//!
//! let (kid, key) = store.active()?;
//! let resolved = store.signer(&kid)?;
//! assert_eq!(resolved.kid(), key.kid());
//!
//! store.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod key;
pub mod store;

pub use error::{BoxError, KeystoreError, KeystoreResult};
pub use key::Key;
pub use store::KeyStore;
