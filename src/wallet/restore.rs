// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Recovery phrase → secp256k1 signing identity.

use alloy::primitives::B256;
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use k256::ecdsa::VerifyingKey;
use sha2::{Digest, Sha256};

use super::{WalletError, WalletRestorer};
use crate::models::{KeyMaterial, WalletData};

/// Prefix of every signer ID.
pub const SIGNER_ID_PREFIX: &str = "signer_";

/// Number of digest bytes kept in a signer ID.
const SIGNER_ID_BYTES: usize = 10;

/// Restores the account at `m/44'/60'/0'/0/{index}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bip44Restorer {
    index: u32,
}

impl Bip44Restorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a different account index on the default path.
    pub fn with_index(index: u32) -> Self {
        Self { index }
    }
}

impl WalletRestorer for Bip44Restorer {
    fn restore(&self, mnemonic: &str) -> Result<WalletData, WalletError> {
        let signer = MnemonicBuilder::<English>::default()
            .phrase(mnemonic)
            .index(self.index)
            .map_err(|e| WalletError::Restore(format!("Invalid account index: {e}")))?
            .build()
            .map_err(|e| {
                WalletError::Restore(format!("Could not restore wallet from recovery phrase: {e}"))
            })?;

        Ok(wallet_from_signer(&signer))
    }
}

/// Rebuild a wallet from raw private key bytes (used when unlocking).
pub fn wallet_from_key(key: &KeyMaterial) -> Result<WalletData, WalletError> {
    let signer = PrivateKeySigner::from_bytes(&B256::from(*key.as_bytes()))
        .map_err(|e| WalletError::Decrypt(format!("Stored key is not a valid secp256k1 key: {e}")))?;
    Ok(wallet_from_signer(&signer))
}

/// Derive the public signer ID from a verifying key.
///
/// `signer_` followed by the first ten bytes of SHA-256 over the compressed
/// SEC1 point, hex encoded.
pub fn signer_id(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(true);
    let digest = Sha256::digest(point.as_bytes());
    format!(
        "{SIGNER_ID_PREFIX}{}",
        alloy::hex::encode(&digest[..SIGNER_ID_BYTES])
    )
}

fn wallet_from_signer(signer: &PrivateKeySigner) -> WalletData {
    let address = signer.address().to_checksum(None);
    let custom_id = signer_id(signer.credential().verifying_key());
    let key = KeyMaterial::new(signer.to_bytes().0);
    WalletData::new(address, custom_id, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

    #[test]
    fn restores_well_known_account() {
        let wallet = Bip44Restorer::new().restore(TEST_MNEMONIC).unwrap();

        assert_eq!(wallet.address(), "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(
            alloy::hex::encode(wallet.key().as_bytes()),
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
        );
        assert!(wallet.custom_id().starts_with(SIGNER_ID_PREFIX));
        assert_eq!(
            wallet.custom_id().len(),
            SIGNER_ID_PREFIX.len() + SIGNER_ID_BYTES * 2
        );
    }

    #[test]
    fn restoration_is_deterministic_and_index_sensitive() {
        let first = Bip44Restorer::new().restore(TEST_MNEMONIC).unwrap();
        let again = Bip44Restorer::new().restore(TEST_MNEMONIC).unwrap();
        let second = Bip44Restorer::with_index(1).restore(TEST_MNEMONIC).unwrap();

        assert_eq!(first, again);
        assert_eq!(second.address(), "0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        assert_ne!(first.custom_id(), second.custom_id());
    }

    #[test]
    fn bad_checksum_is_a_restore_error() {
        let phrase = ["abandon"; 12].join(" ");
        let err = Bip44Restorer::new().restore(&phrase).unwrap_err();
        assert!(matches!(err, WalletError::Restore(_)));
        assert!(err.user_message().is_some());
    }

    #[test]
    fn key_round_trips_to_same_identity() {
        let wallet = Bip44Restorer::new().restore(TEST_MNEMONIC).unwrap();
        let rebuilt = wallet_from_key(wallet.key()).unwrap();
        assert_eq!(rebuilt, wallet);
    }

    #[test]
    fn zero_key_is_rejected() {
        let err = wallet_from_key(&KeyMaterial::new([0u8; 32])).unwrap_err();
        assert!(matches!(err, WalletError::Decrypt(_)));
    }
}
