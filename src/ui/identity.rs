// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity consistency check and the dismissible mismatch warning.

use crate::models::{CurrentUser, WalletData};
use crate::navigation::Navigator;

/// Headline shown when the signed-in identity and the loaded wallet disagree.
pub const IDENTITY_MISMATCH_MESSAGE: &str =
    "Your signed-in account does not match the wallet loaded on this device.";

/// Result of comparing the signed-in user against the loaded wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityConsistency {
    Consistent,
    Inconsistent { issues: Vec<String>, message: String },
}

impl IdentityConsistency {
    pub fn is_consistent(&self) -> bool {
        matches!(self, IdentityConsistency::Consistent)
    }
}

/// Compare the session's identity with the wallet's.
///
/// Addresses compare case-insensitively (checksum casing is not identity).
pub fn check_identity_consistency(user: &CurrentUser, wallet: &WalletData) -> IdentityConsistency {
    let mut issues = Vec::new();

    match user.address.as_deref() {
        None => issues.push("Signed-in session has no wallet address".to_string()),
        Some(address) if !address.eq_ignore_ascii_case(wallet.address()) => issues.push(format!(
            "Session address {address} does not match wallet address {}",
            wallet.address()
        )),
        Some(_) => {}
    }

    if let Some(custom_id) = user.custom_id.as_deref() {
        if custom_id != wallet.custom_id() {
            issues.push(format!(
                "Session signer ID {custom_id} does not match wallet signer ID {}",
                wallet.custom_id()
            ));
        }
    }

    if issues.is_empty() {
        IdentityConsistency::Consistent
    } else {
        tracing::warn!(issue_count = issues.len(), "Identity inconsistency detected");
        IdentityConsistency::Inconsistent {
            issues,
            message: IDENTITY_MISMATCH_MESSAGE.to_string(),
        }
    }
}

/// What the warning banner renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityWarningView<'a> {
    pub message: &'a str,
    pub issues: &'a [String],
}

/// Dismissible identity-mismatch banner.
///
/// Dismissal lives only as long as this value; nothing is persisted.
#[derive(Debug, Clone)]
pub struct IdentityWarning {
    consistency: IdentityConsistency,
    has_user: bool,
    has_wallet: bool,
    dismissed: bool,
}

impl IdentityWarning {
    /// Build the banner from the current identity inputs.
    pub fn new(user: Option<&CurrentUser>, wallet: Option<&WalletData>) -> Self {
        let consistency = match (user, wallet) {
            (Some(user), Some(wallet)) => check_identity_consistency(user, wallet),
            _ => IdentityConsistency::Consistent,
        };
        Self::from_check(consistency, user.is_some(), wallet.is_some())
    }

    /// Build the banner from an already computed result. Does not log, so
    /// hosts can rebuild it on every render.
    pub fn from_check(consistency: IdentityConsistency, has_user: bool, has_wallet: bool) -> Self {
        Self {
            consistency,
            has_user,
            has_wallet,
            dismissed: false,
        }
    }

    pub fn consistency(&self) -> &IdentityConsistency {
        &self.consistency
    }

    /// `None` when the banner is hidden.
    pub fn view(&self) -> Option<IdentityWarningView<'_>> {
        if self.dismissed || !self.has_user || !self.has_wallet {
            return None;
        }
        match &self.consistency {
            IdentityConsistency::Consistent => None,
            IdentityConsistency::Inconsistent { issues, message } => Some(IdentityWarningView {
                message,
                issues,
            }),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.view().is_some()
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    /// Full page reload.
    pub fn reload(&self, navigator: &dyn Navigator) {
        navigator.reload();
    }
}
