// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path utilities for the local wallet store layout.

use std::path::{Path, PathBuf};

/// Storage path utilities rooted at the configured data directory.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all records.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== Wallet Paths ==========

    /// Directory containing all encrypted wallet records.
    pub fn wallets_dir(&self) -> PathBuf {
        self.root.join("wallets")
    }

    /// Path to the encrypted wallet record for an address.
    pub fn wallet(&self, address: &str) -> PathBuf {
        self.wallets_dir().join(format!("{}.json", file_key(address)))
    }

    // ========== Session Paths ==========

    /// Directory containing all session records.
    pub fn sessions_dir(&self) -> PathBuf {
        self.root.join("sessions")
    }

    /// Path to the session record for an address.
    pub fn session(&self, address: &str) -> PathBuf {
        self.sessions_dir().join(format!("{}.json", file_key(address)))
    }
}

/// Addresses are case-insensitive; records are keyed by the lowercase form.
/// Anything outside `[0-9a-z_-]` is replaced so a key can never escape its
/// directory.
fn file_key(address: &str) -> String {
    address
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}
