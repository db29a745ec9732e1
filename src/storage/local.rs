// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File-backed wallet store: one pretty-printed JSON file per record.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use super::{StoragePaths, StorageError, StorageResult, WalletStore};
use crate::models::{EncryptedWallet, Session};

/// JSON file store under a data directory.
///
/// Call [`LocalStore::initialize`] before use.
#[derive(Debug, Clone)]
pub struct LocalStore {
    paths: StoragePaths,
    initialized: bool,
}

impl LocalStore {
    /// Does NOT create the directory structure. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    /// Create and initialize a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> StorageResult<Self> {
        let mut store = Self::new(StoragePaths::new(root));
        store.initialize()?;
        Ok(store)
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Create the directory structure. Idempotent.
    pub fn initialize(&mut self) -> StorageResult<()> {
        for dir in [self.paths.wallets_dir(), self.paths.sessions_dir()] {
            fs::create_dir_all(&dir)?;
        }
        self.initialized = true;
        tracing::debug!(root = %self.paths.root().display(), "Local wallet store initialized");
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> StorageResult<T> {
        self.ensure_initialized()?;
        let file = File::open(path).map_err(|e| not_found_or_io(e, path))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Write to a temp file, then rename over the target.
    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> StorageResult<()> {
        self.ensure_initialized()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    fn remove_if_exists(&self, path: &Path) -> StorageResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn ensure_initialized(&self) -> StorageResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(StorageError::NotInitialized)
        }
    }
}

impl WalletStore for LocalStore {
    fn save_encrypted_wallet(&self, record: &EncryptedWallet) -> StorageResult<()> {
        self.write_json(&self.paths.wallet(&record.address), record)
    }

    fn save_session(&self, session: &Session) -> StorageResult<()> {
        self.write_json(&self.paths.session(&session.address), session)
    }

    fn load_encrypted_wallet(&self, address: &str) -> StorageResult<EncryptedWallet> {
        self.read_json(&self.paths.wallet(address))
    }

    fn load_session(&self, address: &str) -> StorageResult<Session> {
        self.read_json(&self.paths.session(address))
    }

    fn remove_wallet(&self, address: &str) -> StorageResult<()> {
        self.ensure_initialized()?;
        self.remove_if_exists(&self.paths.wallet(address))?;
        self.remove_if_exists(&self.paths.session(address))
    }
}

fn not_found_or_io(e: io::Error, path: &Path) -> StorageError {
    if e.kind() == io::ErrorKind::NotFound {
        StorageError::NotFound(path.display().to_string())
    } else {
        StorageError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KdfParams;
    use chrono::Utc;

    fn record(address: &str) -> EncryptedWallet {
        EncryptedWallet {
            version: 1,
            address: address.to_string(),
            custom_id: "signer_00".to_string(),
            kdf: KdfParams {
                algorithm: "pbkdf2-hmac-sha256".to_string(),
                iterations: 1,
                salt: "c2FsdA==".to_string(),
            },
            cipher: "aes-256-gcm".to_string(),
            nonce: "bm9uY2U=".to_string(),
            ciphertext: "Y2lwaGVy".to_string(),
        }
    }

    fn session(address: &str) -> Session {
        Session {
            session_id: "sess-1".to_string(),
            address: address.to_string(),
            custom_id: "signer_00".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn open_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        assert!(store.paths().wallets_dir().is_dir());
        assert!(store.paths().sessions_dir().is_dir());
    }

    #[test]
    fn wallet_record_is_written_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        store.save_encrypted_wallet(&record("0xAbC")).unwrap();

        assert!(store.paths().wallet("0xabc").is_file());
        assert_eq!(store.load_encrypted_wallet("0xABC").unwrap(), record("0xAbC"));
    }

    #[test]
    fn reimport_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        store.save_encrypted_wallet(&record("0xabc")).unwrap();
        let mut updated = record("0xabc");
        updated.ciphertext = "bmV3".to_string();
        store.save_encrypted_wallet(&updated).unwrap();

        assert_eq!(store.load_encrypted_wallet("0xabc").unwrap().ciphertext, "bmV3");
        let files = fs::read_dir(store.paths().wallets_dir()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn session_round_trip_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        let saved = session("0xabc");
        store.save_session(&saved).unwrap();
        store.save_encrypted_wallet(&record("0xabc")).unwrap();
        assert_eq!(store.load_session("0xabc").unwrap(), saved);

        store.remove_wallet("0xabc").unwrap();
        assert!(matches!(store.load_session("0xabc"), Err(StorageError::NotFound(_))));
        assert!(matches!(
            store.load_encrypted_wallet("0xabc"),
            Err(StorageError::NotFound(_))
        ));

        // second removal is a no-op
        store.remove_wallet("0xabc").unwrap();
    }

    #[test]
    fn uninitialized_store_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(StoragePaths::new(dir.path()));
        let result = store.save_session(&session("0xabc"));
        assert!(matches!(result, Err(StorageError::NotInitialized)));
    }
}
