// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Import workflow errors and the user-facing messages they render as.

use crate::storage::StorageError;
use crate::validation::MIN_PASSWORD_LEN;
use crate::wallet::WalletError;

/// Shown when a collaborator fails without a readable message.
pub const GENERIC_IMPORT_FAILURE: &str = "Failed to import wallet. Please try again.";

/// Shown when the clipboard cannot be read.
pub const CLIPBOARD_READ_FAILURE: &str = "Failed to read from clipboard";

/// Why a submission did not succeed.
///
/// Input variants are caught before any collaborator is called and their
/// `Display` output is the inline form message.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Please enter your recovery phrase")]
    EmptyMnemonic,

    #[error(
        "Password must be at least {min} characters and contain an uppercase letter, a lowercase letter, and a number",
        min = MIN_PASSWORD_LEN
    )]
    WeakPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Recovery phrase must contain 12, 15, 18, 21, or 24 words (found {found})")]
    MnemonicFormat { found: usize },

    #[error("Invalid recovery phrase. Please check your words and try again.")]
    InvalidMnemonic,

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ImportError {
    /// Form-field errors leave the form editable; phrase and collaborator
    /// errors fail the submission.
    pub fn stays_editing(&self) -> bool {
        matches!(
            self,
            ImportError::EmptyMnemonic | ImportError::WeakPassword | ImportError::PasswordMismatch
        )
    }

    /// Message to show inline in the form.
    pub fn user_message(&self) -> String {
        match self {
            ImportError::Wallet(e) => e
                .user_message()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_IMPORT_FAILURE.to_string()),
            other => other.to_string(),
        }
    }
}
