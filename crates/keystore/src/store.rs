//! Concurrent signing-key store with scheduled rotation.
//!
//! [`KeyStore`] owns every live [`Key`], tracks which one is active for
//! issuance, and runs a background task that periodically generates a
//! fresh key, promotes it, and sweeps keys past their expiry. Lookups are
//! read-dominant: verification paths take a shared lock on the key map
//! and the active key identifier is read through an atomic swap, so
//! neither contends with the other outside a rotation round.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::{KeystoreError, KeystoreResult};
use crate::key::Key;

/// Concurrent Ed25519 signing-key lifecycle manager.
///
/// The store always holds at least one key: construction generates and
/// activates an initial key before returning, and every rotation round
/// activates its fresh key before sweeping. Old keys stay resolvable by
/// their `kid` until they expire, so tokens signed before a rotation
/// keep verifying for the remainder of the signing key's lifetime.
///
/// Rotation failures never tear the store down. A round that cannot
/// generate a key is skipped, the current keys stay in place, and the
/// error is reported on the supervisory channel handed to [`KeyStore::new`].
///
/// # Deployment invariant
///
/// `expiration_period` must exceed `rotation_period` by at least one
/// rotation period, otherwise a key can expire before its successor is
/// activated and issuance goes dark between rounds. The store does not
/// enforce this; it is an operator contract.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use keyward_keystore::KeyStore;
/// use tokio::sync::mpsc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> Result<(), keyward_keystore::KeystoreError> {
/// let shutdown = CancellationToken::new();
/// let (errors_tx, _errors_rx) = mpsc::unbounded_channel();
///
/// let store = KeyStore::new(
///     Duration::from_secs(3600),
///     Duration::from_secs(2 * 3600),
///     shutdown.clone(),
///     errors_tx,
/// )?;
///
/// let (kid, _key) = store.active()?;
/// println!("signing with {kid}");
///
/// store.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct KeyStore {
    /// Live keys by `kid`. The only shared mutable state in the store.
    keys: RwLock<HashMap<String, Arc<Key>>>,
    /// Identifier of the key currently used for issuance.
    active: ArcSwap<String>,
    rotation_period: Duration,
    expiration_period: chrono::Duration,
    shutdown: CancellationToken,
    rotation_errors: mpsc::UnboundedSender<KeystoreError>,
    rotation_task: Mutex<Option<JoinHandle<()>>>,
    rotation_rounds: AtomicU64,
    keys_swept_total: AtomicU64,
}

impl KeyStore {
    /// Creates a keystore with an initial active key and starts the
    /// rotation loop.
    ///
    /// Must be called from within a Tokio runtime; the rotation loop is
    /// spawned onto it. The `shutdown` token stops the loop when
    /// cancelled; fatal rotation-round errors are delivered on
    /// `rotation_errors`.
    ///
    /// # Errors
    ///
    /// Returns [`KeystoreError::KeyGeneration`] if the initial key cannot
    /// be generated or `expiration_period` is not representable. Unlike
    /// rotation rounds, a generation failure here is fatal.
    pub fn new(
        rotation_period: Duration,
        expiration_period: Duration,
        shutdown: CancellationToken,
        rotation_errors: mpsc::UnboundedSender<KeystoreError>,
    ) -> KeystoreResult<Arc<Self>> {
        let expiration = chrono::Duration::from_std(expiration_period).map_err(|e| {
            KeystoreError::key_generation_with_source("expiration period out of range", e)
        })?;

        let initial = Arc::new(Key::generate(Utc::now() + expiration)?);
        let kid = initial.kid().to_owned();
        let mut keys = HashMap::new();
        keys.insert(kid.clone(), initial);

        let store = Arc::new(Self {
            keys: RwLock::new(keys),
            active: ArcSwap::from_pointee(kid.clone()),
            rotation_period,
            expiration_period: expiration,
            shutdown,
            rotation_errors,
            rotation_task: Mutex::new(None),
            rotation_rounds: AtomicU64::new(0),
            keys_swept_total: AtomicU64::new(0),
        });

        let task = tokio::spawn(Arc::clone(&store).rotation_loop());
        *store.rotation_task.lock() = Some(task);

        info!(active_kid = %kid, "keystore started");
        Ok(store)
    }

    /// Returns the active key identifier and the key itself.
    ///
    /// # Errors
    ///
    /// Returns [`KeystoreError::InvalidKey`] if the active key has been
    /// revoked or is past its expiry. With a sane rotation configuration
    /// this does not happen; it is a defined contract case, not an
    /// expected state.
    pub fn active(&self) -> KeystoreResult<(String, Arc<Key>)> {
        let kid = self.active.load();
        let key = self.signer(&kid)?;
        Ok((String::clone(&kid), key))
    }

    /// Resolves a key identifier to its verification key.
    ///
    /// The `kid` is untrusted input (it comes from a token header).
    ///
    /// # Errors
    ///
    /// Returns [`KeystoreError::InvalidKey`] if the identifier is
    /// unknown, revoked, or the key is past its expiry. The error is
    /// identical in every case so callers cannot distinguish a revoked
    /// key from one that never existed.
    pub fn signer(&self, kid: &str) -> KeystoreResult<Arc<Key>> {
        let key = self.keys.read().get(kid).cloned().ok_or_else(KeystoreError::invalid_key)?;
        if key.is_expired(Utc::now()) {
            return Err(KeystoreError::invalid_key());
        }
        Ok(key)
    }

    /// Removes a key immediately, invalidating every token signed with it.
    ///
    /// Idempotent: revoking an unknown or already-revoked identifier is a
    /// no-op. Revoking the active key leaves the store unable to issue
    /// until the next rotation round activates a successor.
    #[instrument(skip(self))]
    pub fn revoke(&self, kid: &str) {
        let removed = self.keys.write().remove(kid).is_some();
        if removed {
            info!(
                audit.action = "key_revoke",
                audit.resource = %kid,
                "signing key revoked"
            );
        } else {
            debug!(%kid, "revoke of unknown key ignored");
        }
    }

    /// Stops the rotation loop and waits for it to finish.
    ///
    /// Cancels the shutdown token (a no-op if the caller already did) and
    /// awaits the rotation task. Lookups keep working afterwards; only
    /// rotation stops. Idempotent.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let task = self.rotation_task.lock().take();
        if let Some(task) = task {
            if let Err(error) = task.await {
                warn!(%error, "rotation task did not shut down cleanly");
            }
        }
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    /// Whether the store holds no keys (only reachable through revocation).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    /// Completed rotation rounds since construction.
    #[must_use]
    pub fn rotation_rounds(&self) -> u64 {
        self.rotation_rounds.load(Ordering::Relaxed)
    }

    /// Total expired keys removed by rotation sweeps since construction.
    #[must_use]
    pub fn keys_swept_total(&self) -> u64 {
        self.keys_swept_total.load(Ordering::Relaxed)
    }

    async fn rotation_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.rotation_period);
        // The first tick completes immediately; consume it so the first
        // rotation happens one full period after startup.
        interval.tick().await;

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    info!("key rotation loop stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(error) = self.rotate() {
                        warn!(%error, "key rotation round failed; keeping current keys");
                        // The receiver owner decides what a rotation failure
                        // means for the process; the store just keeps going.
                        let _ = self.rotation_errors.send(error);
                    }
                }
            }
        }
    }

    /// One rotation round: generate, insert, activate, sweep.
    ///
    /// The fresh key is activated before the sweep runs, so the store
    /// never points `active` at a key the same round removed. Insert,
    /// swap, and sweep happen under one write lock; lookups observe the
    /// round as a single transition.
    fn rotate(&self) -> KeystoreResult<()> {
        let now = Utc::now();
        let fresh = Arc::new(Key::generate(now + self.expiration_period)?);
        let kid = fresh.kid().to_owned();

        let swept = {
            let mut keys = self.keys.write();
            keys.insert(kid.clone(), fresh);
            self.active.store(Arc::new(kid.clone()));
            let before = keys.len();
            keys.retain(|_, key| !key.is_expired(now));
            before - keys.len()
        };

        let round = self.rotation_rounds.fetch_add(1, Ordering::Relaxed) + 1;
        self.keys_swept_total.fetch_add(swept as u64, Ordering::Relaxed);
        info!(round, active_kid = %kid, swept, "rotated signing key");
        Ok(())
    }
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore")
            .field("len", &self.len())
            .field("active", &**self.active.load())
            .field("rotation_period", &self.rotation_period)
            .finish_non_exhaustive()
    }
}
