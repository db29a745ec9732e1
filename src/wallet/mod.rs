// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Collaborators
//!
//! The import workflow treats restoration and encryption as opaque
//! collaborators behind [`WalletRestorer`] and [`WalletEncryptor`]. This
//! module also ships the default implementations:
//!
//! - [`Bip44Restorer`] - BIP-39 seed, BIP-44 path `m/44'/60'/0'/0/{index}`,
//!   secp256k1 signer with a checksummed EVM address
//! - [`PasswordEncryptor`] - PBKDF2-HMAC-SHA256 key stretching and
//!   AES-256-GCM sealing of the private key

pub mod encryption;
pub mod restore;

pub use encryption::PasswordEncryptor;
pub use restore::Bip44Restorer;

use crate::models::{EncryptedWallet, WalletData};

/// Errors raised by wallet collaborators.
///
/// Variants carrying a message are shown to the user verbatim.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("{0}")]
    Restore(String),

    #[error("{0}")]
    Encrypt(String),

    #[error("{0}")]
    Decrypt(String),

    /// Failure without a human-readable description.
    #[error("wallet operation failed")]
    Unspecified,
}

impl WalletError {
    /// The message to surface in the UI, if the collaborator provided one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            WalletError::Restore(msg) | WalletError::Encrypt(msg) | WalletError::Decrypt(msg)
                if !msg.trim().is_empty() =>
            {
                Some(msg.as_str())
            }
            _ => None,
        }
    }
}

/// Restores a signing identity from a normalized recovery phrase.
pub trait WalletRestorer: Send + Sync {
    fn restore(&self, mnemonic: &str) -> Result<WalletData, WalletError>;
}

/// Seals a restored wallet under a user password.
pub trait WalletEncryptor: Send + Sync {
    fn encrypt(&self, wallet: &WalletData, password: &str) -> Result<EncryptedWallet, WalletError>;
}
