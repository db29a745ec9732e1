// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Input validation for the wallet import form.
//!
//! Everything here is pure except the [`MnemonicChecker`] oracle, which
//! delegates cryptographic validity (wordlist membership and checksum) to
//! the `bip39` crate in the default implementation.

use bip39::{Language, Mnemonic};

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Recovery phrase lengths accepted by the import form.
pub const ALLOWED_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Returns `true` iff the password has at least [`MIN_PASSWORD_LEN`]
/// characters and contains an ASCII lowercase letter, an ASCII uppercase
/// letter and an ASCII digit. Other characters count toward the length only.
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Canonical form of a recovery phrase: trimmed, lowercased, single spaces.
pub fn normalize_mnemonic(input: &str) -> String {
    input
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Checks the word count of a normalized phrase.
///
/// Returns the word count on success and the offending count on failure.
pub fn check_mnemonic_format(normalized: &str) -> Result<usize, usize> {
    let count = normalized.split_whitespace().count();
    if ALLOWED_WORD_COUNTS.contains(&count) {
        Ok(count)
    } else {
        Err(count)
    }
}

/// Boolean oracle over a normalized recovery phrase.
pub trait MnemonicChecker: Send + Sync {
    fn is_valid(&self, normalized: &str) -> bool;
}

/// BIP-39 English wordlist + checksum validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bip39Checker;

impl MnemonicChecker for Bip39Checker {
    fn is_valid(&self, normalized: &str) -> bool {
        Mnemonic::parse_in_normalized(Language::English, normalized).is_ok()
    }
}
