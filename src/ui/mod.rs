// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Page view-models. Each page owns its state and talks to the host only
//! through traits ([`Navigator`](crate::navigation::Navigator),
//! [`Clipboard`], [`SessionProbe`]).

pub mod debug_overlay;
pub mod delete_confirmation;
pub mod identity;
pub mod import;

pub use debug_overlay::{AuthDebugOverlay, HttpSessionProbe, SessionProbe};
pub use delete_confirmation::{CountdownState, DeleteConfirmation};
pub use identity::{check_identity_consistency, IdentityConsistency, IdentityWarning};
pub use import::{Clipboard, FormState, ImportPhase, ImportServices, ImportWorkflow};
