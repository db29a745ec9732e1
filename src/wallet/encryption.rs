// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password-based encryption of wallet key material.
//!
//! ## Record Format (version 1)
//!
//! ```text
//! key        = PBKDF2-HMAC-SHA256(password, salt[16], iterations) -> 32 bytes
//! ciphertext = AES-256-GCM(key, nonce[12], aad = address, plaintext = private key)
//! ```
//!
//! The address is bound as associated data, so a record copied under a
//! different address fails to open.

use std::num::NonZeroU32;

use base64ct::{Base64, Encoding};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use super::restore::wallet_from_key;
use super::{WalletEncryptor, WalletError};
use crate::config::DEFAULT_KDF_ITERATIONS;
use crate::models::{EncryptedWallet, KdfParams, KeyMaterial, WalletData};

/// Current record format version.
pub const RECORD_VERSION: u32 = 1;

/// KDF identifier written to records.
pub const KDF_ALGORITHM: &str = "pbkdf2-hmac-sha256";

/// Cipher identifier written to records.
pub const CIPHER: &str = "aes-256-gcm";

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// PBKDF2 + AES-256-GCM wallet encryptor.
#[derive(Debug, Clone)]
pub struct PasswordEncryptor {
    iterations: NonZeroU32,
    rng: SystemRandom,
}

impl Default for PasswordEncryptor {
    fn default() -> Self {
        Self::new(DEFAULT_KDF_ITERATIONS)
    }
}

impl PasswordEncryptor {
    /// Create an encryptor with the given PBKDF2 work factor (clamped to 1).
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: NonZeroU32::new(iterations).unwrap_or(NonZeroU32::MIN),
            rng: SystemRandom::new(),
        }
    }

    /// Open a record with the user's password.
    ///
    /// Fails on a wrong password, a tampered record, or an address that does
    /// not match the decrypted key.
    pub fn decrypt(&self, record: &EncryptedWallet, password: &str) -> Result<WalletData, WalletError> {
        if record.version != RECORD_VERSION {
            return Err(WalletError::Decrypt(format!(
                "Unsupported wallet record version {} (expected {RECORD_VERSION})",
                record.version
            )));
        }
        if record.kdf.algorithm != KDF_ALGORITHM || record.cipher != CIPHER {
            return Err(WalletError::Decrypt(format!(
                "Unsupported wallet encryption ({} / {})",
                record.kdf.algorithm, record.cipher
            )));
        }

        let iterations = NonZeroU32::new(record.kdf.iterations)
            .ok_or_else(|| WalletError::Decrypt("Wallet record has zero KDF iterations".into()))?;
        let salt = decode_field(&record.kdf.salt, "salt")?;
        let nonce_bytes = decode_field(&record.nonce, "nonce")?;
        let mut buffer = decode_field(&record.ciphertext, "ciphertext")?;

        let key = derive_key(password, &salt, iterations).map_err(WalletError::Decrypt)?;
        let nonce = Nonce::try_assume_unique_for_key(&nonce_bytes)
            .map_err(|_| WalletError::Decrypt("Wallet record has a malformed nonce".into()))?;

        let plaintext = key
            .open_in_place(nonce, Aad::from(record.address.as_bytes()), &mut buffer)
            .map_err(|_| WalletError::Decrypt("Incorrect password or corrupted wallet".into()))?;

        let key_bytes: [u8; KEY_LEN] = (&*plaintext)
            .try_into()
            .map_err(|_| WalletError::Decrypt("Wallet record has an unexpected key length".into()))?;

        let wallet = wallet_from_key(&KeyMaterial::new(key_bytes))?;
        if !wallet.address().eq_ignore_ascii_case(&record.address) {
            return Err(WalletError::Decrypt(
                "Wallet record address does not match its key".into(),
            ));
        }
        Ok(wallet)
    }

    fn random_bytes<const N: usize>(&self) -> Result<[u8; N], WalletError> {
        let mut out = [0u8; N];
        self.rng
            .fill(&mut out)
            .map_err(|_| WalletError::Encrypt("Secure random number generator unavailable".into()))?;
        Ok(out)
    }
}

impl WalletEncryptor for PasswordEncryptor {
    fn encrypt(&self, wallet: &WalletData, password: &str) -> Result<EncryptedWallet, WalletError> {
        let salt: [u8; SALT_LEN] = self.random_bytes()?;
        let nonce_bytes: [u8; NONCE_LEN] = self.random_bytes()?;

        let key = derive_key(password, &salt, self.iterations).map_err(WalletError::Encrypt)?;

        let mut buffer = wallet.key().as_bytes().to_vec();
        key.seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::from(wallet.address().as_bytes()),
            &mut buffer,
        )
        .map_err(|_| WalletError::Encrypt("Failed to encrypt wallet".into()))?;

        Ok(EncryptedWallet {
            version: RECORD_VERSION,
            address: wallet.address().to_string(),
            custom_id: wallet.custom_id().to_string(),
            kdf: KdfParams {
                algorithm: KDF_ALGORITHM.to_string(),
                iterations: self.iterations.get(),
                salt: Base64::encode_string(&salt),
            },
            cipher: CIPHER.to_string(),
            nonce: Base64::encode_string(&nonce_bytes),
            ciphertext: Base64::encode_string(&buffer),
        })
    }
}

fn derive_key(password: &str, salt: &[u8], iterations: NonZeroU32) -> Result<LessSafeKey, String> {
    let mut key_bytes = [0u8; KEY_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password.as_bytes(),
        &mut key_bytes,
    );
    let unbound = UnboundKey::new(&AES_256_GCM, &key_bytes)
        .map_err(|_| "Failed to initialise wallet cipher".to_string())?;
    Ok(LessSafeKey::new(unbound))
}

fn decode_field(value: &str, field: &str) -> Result<Vec<u8>, WalletError> {
    Base64::decode_vec(value)
        .map_err(|e| WalletError::Decrypt(format!("Wallet record has invalid {field}: {e}")))
}
