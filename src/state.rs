// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Application state handle.
//!
//! Created once at startup and passed explicitly to every page. It owns the
//! wallet store, the currently loaded wallet and session, and a lifetime
//! [`CancellationToken`] from which components derive their own tokens.
//! [`AppState::teardown`] (logout / delete) clears the identity and cancels
//! every task mounted under it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::models::{Session, WalletData};
use crate::storage::{LocalStore, StorageResult, WalletStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn WalletStore>,
    wallet: Arc<RwLock<Option<WalletData>>>,
    session: Arc<RwLock<Option<Session>>>,
    publishes: Arc<AtomicU64>,
    lifetime: Arc<Mutex<CancellationToken>>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn WalletStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            wallet: Arc::new(RwLock::new(None)),
            session: Arc::new(RwLock::new(None)),
            publishes: Arc::new(AtomicU64::new(0)),
            lifetime: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    /// Open the local store under `config.data_dir` and build the state.
    pub fn initialize(config: Config) -> StorageResult<Self> {
        let store = LocalStore::open(&config.data_dir)?;
        tracing::info!(
            data_dir = %config.data_dir.display(),
            build_mode = ?config.build_mode,
            "Application state initialized"
        );
        Ok(Self::new(config, Arc::new(store)))
    }

    /// Make a restored wallet and its session the current identity.
    pub async fn publish_wallet(&self, wallet: WalletData, session: Session) {
        tracing::info!(
            address = %wallet.address(),
            custom_id = %wallet.custom_id(),
            "Wallet published to application state"
        );
        *self.wallet.write().await = Some(wallet);
        *self.session.write().await = Some(session);
        self.publishes.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of wallets published since startup. Not reset by teardown.
    pub fn publish_count(&self) -> u64 {
        self.publishes.load(Ordering::SeqCst)
    }

    pub async fn wallet(&self) -> Option<WalletData> {
        self.wallet.read().await.clone()
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// A token cancelled on the next [`teardown`](Self::teardown).
    pub fn child_token(&self) -> CancellationToken {
        match self.lifetime.lock() {
            Ok(token) => token.child_token(),
            Err(poisoned) => poisoned.into_inner().child_token(),
        }
    }

    /// Clear the current identity and cancel everything mounted under it.
    ///
    /// Stored records are left in place; see [`delete_wallet`](Self::delete_wallet).
    pub async fn teardown(&self) {
        *self.wallet.write().await = None;
        *self.session.write().await = None;

        let previous = match self.lifetime.lock() {
            Ok(mut token) => std::mem::take(&mut *token),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        previous.cancel();
        tracing::info!("Application state torn down");
    }

    /// Remove the current wallet's stored records, then tear down.
    ///
    /// Returns the deleted address, or `None` if no wallet was loaded.
    pub async fn delete_wallet(&self) -> StorageResult<Option<String>> {
        let Some(wallet) = self.wallet().await else {
            return Ok(None);
        };

        self.store.remove_wallet(wallet.address())?;
        tracing::info!(address = %wallet.address(), "Wallet deleted from local storage");

        self.teardown().await;
        Ok(Some(wallet.address().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EncryptedWallet, KdfParams, KeyMaterial};
    use crate::storage::{MemoryStore, StorageError};

    fn state_with(store: Arc<MemoryStore>) -> AppState {
        AppState::new(Config::from_lookup(|_| None).unwrap(), store)
    }

    fn wallet() -> WalletData {
        WalletData::new("0xAbC", "signer_1", KeyMaterial::new([3u8; 32]))
    }

    #[tokio::test]
    async fn publish_then_read() {
        let state = state_with(Arc::new(MemoryStore::new()));
        assert!(state.wallet().await.is_none());

        let wallet = wallet();
        let session = Session::for_wallet(&wallet);
        state.publish_wallet(wallet.clone(), session.clone()).await;

        assert_eq!(state.wallet().await, Some(wallet));
        assert_eq!(state.session().await, Some(session));
        assert_eq!(state.publish_count(), 1);

        // clones share the counter
        let other = state.clone();
        other.teardown().await;
        assert_eq!(state.publish_count(), 1);
    }

    #[tokio::test]
    async fn teardown_clears_identity_and_cancels_children() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let wallet = wallet();
        state
            .publish_wallet(wallet.clone(), Session::for_wallet(&wallet))
            .await;

        let before = state.child_token();
        state.teardown().await;

        assert!(before.is_cancelled());
        assert!(state.wallet().await.is_none());
        assert!(state.session().await.is_none());

        // tokens handed out after teardown belong to the new lifetime
        assert!(!state.child_token().is_cancelled());
    }

    #[tokio::test]
    async fn delete_wallet_removes_records() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(store.clone());
        let wallet = wallet();
        let session = Session::for_wallet(&wallet);

        store
            .save_encrypted_wallet(&EncryptedWallet {
                version: 1,
                address: wallet.address().into(),
                custom_id: wallet.custom_id().into(),
                kdf: KdfParams {
                    algorithm: "pbkdf2-hmac-sha256".into(),
                    iterations: 1,
                    salt: String::new(),
                },
                cipher: "aes-256-gcm".into(),
                nonce: String::new(),
                ciphertext: String::new(),
            })
            .unwrap();
        store.save_session(&session).unwrap();
        state.publish_wallet(wallet, session).await;

        let deleted = state.delete_wallet().await.unwrap();
        assert_eq!(deleted.as_deref(), Some("0xAbC"));
        assert!(matches!(store.load_session("0xabc"), Err(StorageError::NotFound(_))));
        assert!(state.wallet().await.is_none());
    }

    #[tokio::test]
    async fn delete_without_wallet_is_noop() {
        let state = state_with(Arc::new(MemoryStore::new()));
        assert_eq!(state.delete_wallet().await.unwrap(), None);
    }

    #[test]
    fn initialize_opens_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let config = Config::from_lookup(move |key| {
            (key == crate::config::DATA_DIR_ENV).then(|| root.display().to_string())
        })
        .unwrap();

        AppState::initialize(config).unwrap();
        assert!(dir.path().join("wallets").is_dir());
        assert!(dir.path().join("sessions").is_dir());
    }
}
