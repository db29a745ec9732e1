// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Import Workflow
//!
//! Form state machine for importing a signing identity from a recovery
//! phrase.
//!
//! ```text
//!            submit            gates pass           all collaborators ok
//! Editing ──────────▶ Validating ──────────▶ Importing ──────────▶ Success
//!    ▲                    │ empty / weak / mismatch  │
//!    │◀───────────────────┘                          │ collaborator error
//!    │   edit mnemonic        ┌──────────────────────┘
//!    └──────────────────── Failed ◀── bad word count / invalid phrase
//! ```
//!
//! ## Side Effects
//!
//! A successful submission performs, in order and exactly once each:
//! restore → encrypt → save encrypted wallet → save session → publish to
//! [`AppState`]. A rejected or failed submission writes nothing beyond what
//! had already succeeded before the failing step; earlier writes are not
//! rolled back.

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::Config;
use crate::error::{ImportError, CLIPBOARD_READ_FAILURE};
use crate::models::{Session, WalletData};
use crate::navigation::{Navigator, Route};
use crate::state::AppState;
use crate::validation::{
    check_mnemonic_format, normalize_mnemonic, validate_password, Bip39Checker, MnemonicChecker,
};
use crate::wallet::{Bip44Restorer, PasswordEncryptor, WalletEncryptor, WalletRestorer};

/// Clipboard read failure.
#[derive(Debug, thiserror::Error)]
#[error("clipboard read failed: {0}")]
pub struct ClipboardError(pub String);

/// Host clipboard access.
pub trait Clipboard: Send + Sync {
    fn read_text(&self) -> Result<String, ClipboardError>;
}

/// Workflow phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPhase {
    Editing,
    Validating,
    Importing,
    Success,
    Failed,
}

/// Form fields plus the outcome of the last submission.
///
/// `is_loading` and `success` are derived from a single phase, so they can
/// never both be true, and success always carries a wallet and no error.
#[derive(Debug, Clone)]
pub struct FormState {
    mnemonic: String,
    password: String,
    confirm_password: String,
    error: Option<String>,
    imported_wallet: Option<WalletData>,
    phase: ImportPhase,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            mnemonic: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            error: None,
            imported_wallet: None,
            phase: ImportPhase::Editing,
        }
    }
}

impl FormState {
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn confirm_password(&self) -> &str {
        &self.confirm_password
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn imported_wallet(&self) -> Option<&WalletData> {
        self.imported_wallet.as_ref()
    }

    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ImportPhase::Validating | ImportPhase::Importing)
    }

    pub fn success(&self) -> bool {
        self.phase == ImportPhase::Success
    }

    fn clear_secrets(&mut self) {
        self.mnemonic.clear();
        self.password.clear();
        self.confirm_password.clear();
    }
}

/// The collaborators the workflow calls out to.
#[derive(Clone)]
pub struct ImportServices {
    pub checker: Arc<dyn MnemonicChecker>,
    pub restorer: Arc<dyn WalletRestorer>,
    pub encryptor: Arc<dyn WalletEncryptor>,
}

impl ImportServices {
    /// BIP-39 checker, BIP-44 restorer, PBKDF2/AES-GCM encryptor.
    pub fn standard(config: &Config) -> Self {
        Self {
            checker: Arc::new(Bip39Checker),
            restorer: Arc::new(Bip44Restorer::new()),
            encryptor: Arc::new(PasswordEncryptor::new(config.kdf_iterations)),
        }
    }
}

/// Wallet import page.
///
/// Every form change is also sent to [`subscribe`](Self::subscribe)
/// receivers, so a renderer can show the loading state while `submit` is running.
pub struct ImportWorkflow {
    state: AppState,
    services: ImportServices,
    form: FormState,
    updates: watch::Sender<FormState>,
    clipboard_error: Option<String>,
}

impl ImportWorkflow {
    pub fn new(state: AppState, services: ImportServices) -> Self {
        let (updates, _) = watch::channel(FormState::default());
        Self {
            state,
            services,
            form: FormState::default(),
            updates,
            clipboard_error: None,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Receiver that sees every form change, including the in-flight phases.
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.updates.subscribe()
    }

    fn publish(&self) {
        self.updates.send_replace(self.form.clone());
    }

    /// Non-blocking clipboard error, kept apart from the form error.
    pub fn clipboard_error(&self) -> Option<&str> {
        self.clipboard_error.as_deref()
    }

    /// Edit the recovery phrase. Clears the form error and leaves `Failed`.
    pub fn set_mnemonic(&mut self, value: impl Into<String>) {
        if self.form.success() {
            return;
        }
        self.form.mnemonic = value.into();
        self.form.error = None;
        self.form.phase = ImportPhase::Editing;
        self.publish();
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        if !self.form.success() {
            self.form.password = value.into();
            self.publish();
        }
    }

    pub fn set_confirm_password(&mut self, value: impl Into<String>) {
        if !self.form.success() {
            self.form.confirm_password = value.into();
            self.publish();
        }
    }

    /// Replace the recovery phrase with the clipboard contents, verbatim.
    pub fn paste_from_clipboard(&mut self, clipboard: &dyn Clipboard) {
        match clipboard.read_text() {
            Ok(text) => {
                self.clipboard_error = None;
                self.set_mnemonic(text);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Clipboard read failed");
                self.clipboard_error = Some(CLIPBOARD_READ_FAILURE.to_string());
            }
        }
    }

    /// Validate the form and import the wallet.
    ///
    /// Submitting again after success returns the imported wallet without
    /// repeating any side effect.
    pub async fn submit(&mut self) -> Result<WalletData, ImportError> {
        if let Some(wallet) = self.form.imported_wallet.as_ref().filter(|_| self.form.success()) {
            return Ok(wallet.clone());
        }

        self.form.phase = ImportPhase::Validating;
        self.form.error = None;
        self.publish();

        let normalized = match self.validate() {
            Ok(normalized) => normalized,
            Err(e) => return Err(self.reject(e)),
        };

        self.form.phase = ImportPhase::Importing;
        self.publish();
        match self.import(&normalized).await {
            Ok(wallet) => {
                self.form.clear_secrets();
                self.form.imported_wallet = Some(wallet.clone());
                self.form.error = None;
                self.form.phase = ImportPhase::Success;
                self.publish();
                Ok(wallet)
            }
            Err(e) => {
                // Wallet collaborator messages may echo phrase words; keep them out of logs.
                match &e {
                    ImportError::Storage(err) => {
                        tracing::warn!(error = %err, "Wallet import failed while persisting")
                    }
                    _ => tracing::warn!("Wallet import failed in restoration or encryption"),
                }
                Err(self.reject(e))
            }
        }
    }

    /// Navigate to the dashboard. Only available after success.
    pub fn continue_to_dashboard(&self, navigator: &dyn Navigator) -> bool {
        if self.form.success() {
            navigator.navigate(Route::Dashboard);
            true
        } else {
            false
        }
    }

    fn validate(&self) -> Result<String, ImportError> {
        if self.form.mnemonic.trim().is_empty() {
            return Err(ImportError::EmptyMnemonic);
        }
        if !validate_password(&self.form.password) {
            return Err(ImportError::WeakPassword);
        }
        if self.form.password != self.form.confirm_password {
            return Err(ImportError::PasswordMismatch);
        }

        let normalized = normalize_mnemonic(&self.form.mnemonic);
        check_mnemonic_format(&normalized).map_err(|found| ImportError::MnemonicFormat { found })?;
        if !self.services.checker.is_valid(&normalized) {
            return Err(ImportError::InvalidMnemonic);
        }
        Ok(normalized)
    }

    async fn import(&self, normalized: &str) -> Result<WalletData, ImportError> {
        let wallet = self.services.restorer.restore(normalized)?;
        let record = self.services.encryptor.encrypt(&wallet, &self.form.password)?;

        self.state.store.save_encrypted_wallet(&record)?;

        let session = Session::for_wallet(&wallet);
        self.state.store.save_session(&session)?;

        self.state.publish_wallet(wallet.clone(), session).await;
        Ok(wallet)
    }

    fn reject(&mut self, err: ImportError) -> ImportError {
        self.form.phase = if err.stays_editing() {
            ImportPhase::Editing
        } else {
            ImportPhase::Failed
        };
        self.form.error = Some(err.user_message());
        self.publish();
        err
    }
}
