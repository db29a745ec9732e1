// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Local Wallet Storage
//!
//! Persists the two records written by a successful import: the encrypted
//! wallet and the device session, both keyed by wallet address.
//!
//! ## Storage Layout
//!
//! ```text
//! {data_dir}/
//!   wallets/{address}.json    # EncryptedWallet (never plaintext keys)
//!   sessions/{address}.json   # Session marker
//! ```
//!
//! The import workflow only writes. Reading back is provided for unlock and
//! tests; it is not part of the import contract.

pub mod local;
pub mod memory;
pub mod paths;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use paths::StoragePaths;

use std::io;

use crate::models::{EncryptedWallet, Session};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Stored record is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage not initialized")]
    NotInitialized,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Address-keyed persistence for wallet and session records.
pub trait WalletStore: Send + Sync {
    /// Write (or overwrite) the encrypted wallet for `record.address`.
    fn save_encrypted_wallet(&self, record: &EncryptedWallet) -> StorageResult<()>;

    /// Write (or overwrite) the session for `session.address`.
    fn save_session(&self, session: &Session) -> StorageResult<()>;

    fn load_encrypted_wallet(&self, address: &str) -> StorageResult<EncryptedWallet>;

    fn load_session(&self, address: &str) -> StorageResult<Session>;

    /// Remove both records for an address. Missing records are not an error.
    fn remove_wallet(&self, address: &str) -> StorageResult<()>;
}
