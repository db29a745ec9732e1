// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory wallet store for ephemeral sessions and tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{StorageError, StorageResult, WalletStore};
use crate::models::{EncryptedWallet, Session};

#[derive(Default)]
struct Records {
    wallets: HashMap<String, EncryptedWallet>,
    sessions: HashMap<String, Session>,
    wallet_writes: usize,
    session_writes: usize,
}

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total encrypted-wallet writes since creation.
    pub fn wallet_writes(&self) -> usize {
        self.lock().map(|r| r.wallet_writes).unwrap_or(0)
    }

    /// Total session writes since creation.
    pub fn session_writes(&self) -> usize {
        self.lock().map(|r| r.session_writes).unwrap_or(0)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Records>> {
        self.records
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))
    }
}

fn key(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

impl WalletStore for MemoryStore {
    fn save_encrypted_wallet(&self, record: &EncryptedWallet) -> StorageResult<()> {
        let mut records = self.lock()?;
        records.wallets.insert(key(&record.address), record.clone());
        records.wallet_writes += 1;
        Ok(())
    }

    fn save_session(&self, session: &Session) -> StorageResult<()> {
        let mut records = self.lock()?;
        records.sessions.insert(key(&session.address), session.clone());
        records.session_writes += 1;
        Ok(())
    }

    fn load_encrypted_wallet(&self, address: &str) -> StorageResult<EncryptedWallet> {
        self.lock()?
            .wallets
            .get(&key(address))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("Wallet {address}")))
    }

    fn load_session(&self, address: &str) -> StorageResult<Session> {
        self.lock()?
            .sessions
            .get(&key(address))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("Session {address}")))
    }

    fn remove_wallet(&self, address: &str) -> StorageResult<()> {
        let mut records = self.lock()?;
        records.wallets.remove(&key(address));
        records.sessions.remove(&key(address));
        Ok(())
    }
}
