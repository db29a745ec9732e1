// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing Wallet UI - headless core of a document-signing wallet
//!
//! This crate provides the page logic of a wallet front end: importing a
//! signing identity from a recovery phrase, warning when the signed-in
//! account and the loaded wallet disagree, a development auth overlay, and
//! the post-deletion redirect page. Rendering is left to the host.
//!
//! ## Modules
//!
//! - `config` - Environment configuration
//! - `telemetry` - Tracing subscriber setup
//! - `validation` - Password and recovery phrase checks
//! - `wallet` - Wallet restoration and encryption at rest
//! - `storage` - Local encrypted wallet and session records
//! - `state` - Shared application state
//! - `ui` - Page view-models

pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod ui;
pub mod validation;
pub mod wallet;
