// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared data model: restored wallets, encrypted wallet records, sessions
//! and the signed-in user as reported by the session-check endpoint.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw secp256k1 private key bytes.
///
/// Opaque to everything except the encryptor. `Debug` never prints the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial([u8; 32]);

impl KeyMaterial {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(<redacted>)")
    }
}

/// A signing identity restored from a recovery phrase.
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletData {
    address: String,
    custom_id: String,
    key: KeyMaterial,
}

impl WalletData {
    pub fn new(address: impl Into<String>, custom_id: impl Into<String>, key: KeyMaterial) -> Self {
        Self {
            address: address.into(),
            custom_id: custom_id.into(),
            key,
        }
    }

    /// Checksummed `0x` address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Signer ID: the public identifier of this signing identity.
    pub fn custom_id(&self) -> &str {
        &self.custom_id
    }

    pub fn key(&self) -> &KeyMaterial {
        &self.key
    }
}

/// Key derivation parameters stored alongside the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Always `pbkdf2-hmac-sha256` for records written by this crate.
    pub algorithm: String,
    pub iterations: u32,
    /// Base64 salt.
    pub salt: String,
}

/// Password-protected wallet record, as persisted.
///
/// Re-importing the same address overwrites the previous record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedWallet {
    pub version: u32,
    pub address: String,
    pub custom_id: String,
    pub kdf: KdfParams,
    /// Always `aes-256-gcm` for records written by this crate.
    pub cipher: String,
    /// Base64 AEAD nonce.
    pub nonce: String,
    /// Base64 ciphertext with the authentication tag appended.
    pub ciphertext: String,
}

/// Device session marker, keyed by wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub address: String,
    pub custom_id: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session for a restored wallet.
    pub fn for_wallet(wallet: &WalletData) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            address: wallet.address().to_string(),
            custom_id: wallet.custom_id().to_string(),
            created_at: Utc::now(),
        }
    }
}

/// The signed-in user as returned by `GET /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_material_debug_is_redacted() {
        let wallet = WalletData::new("0xabc", "signer_1", KeyMaterial::new([7u8; 32]));
        let rendered = format!("{wallet:?}");
        assert!(rendered.contains("0xabc"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("7, 7"));
    }

    #[test]
    fn session_copies_wallet_identity() {
        let wallet = WalletData::new("0xabc", "signer_1", KeyMaterial::new([1u8; 32]));
        let a = Session::for_wallet(&wallet);
        let b = Session::for_wallet(&wallet);
        assert_eq!(a.address, "0xabc");
        assert_eq!(a.custom_id, "signer_1");
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn current_user_uses_camel_case() {
        let user: CurrentUser = serde_json::from_str(
            r#"{"userId":"user_1","address":"0xabc","customId":"signer_1"}"#,
        )
        .unwrap();
        assert_eq!(user.user_id, "user_1");
        assert_eq!(user.custom_id.as_deref(), Some("signer_1"));

        let bare: CurrentUser = serde_json::from_str(r#"{"userId":"user_2"}"#).unwrap();
        assert!(bare.address.is_none());
    }
}
