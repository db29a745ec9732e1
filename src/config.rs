// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the [`Config`] loaded from the
//! environment once at startup and handed to [`crate::state::AppState`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `WALLET_DATA_DIR` | Root directory for wallet and session records | `./data` |
//! | `API_BASE_URL` | Origin serving `/api/auth/me` | `http://localhost:3000` |
//! | `APP_ENV` | Build mode (`development` or `production`) | `development` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |
//! | `WALLET_KDF_ITERATIONS` | PBKDF2 rounds for wallet encryption | `210000` |

use std::env;
use std::path::PathBuf;

use url::Url;

/// Environment variable name for the local data directory.
pub const DATA_DIR_ENV: &str = "WALLET_DATA_DIR";

/// Environment variable name for the API origin.
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Environment variable name for the build mode.
///
/// Anything other than `production` (case-insensitive) is a development build.
pub const APP_ENV_ENV: &str = "APP_ENV";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Environment variable name for the wallet encryption work factor.
pub const KDF_ITERATIONS_ENV: &str = "WALLET_KDF_ITERATIONS";

/// Default data directory (relative to the working directory).
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default API origin for local development.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Default PBKDF2-HMAC-SHA256 iteration count.
pub const DEFAULT_KDF_ITERATIONS: u32 = 210_000;

/// Build mode flag. Gates development-only widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    /// Parse from an `APP_ENV` value.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Log output format for [`crate::telemetry::init_tracing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API_BASE_URL is not a valid URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("WALLET_KDF_ITERATIONS must be a positive integer, got '{0}'")]
    InvalidIterations(String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub api_base_url: Url,
    pub build_mode: BuildMode,
    pub log_format: LogFormat,
    pub kdf_iterations: u32,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let api_base_url = Url::parse(
            &lookup(API_BASE_URL_ENV).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        )?;

        let build_mode = lookup(APP_ENV_ENV)
            .map(|v| BuildMode::parse(&v))
            .unwrap_or_default();

        let log_format = lookup(LOG_FORMAT_ENV)
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default();

        let kdf_iterations = match lookup(KDF_ITERATIONS_ENV) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidIterations(raw)),
            },
            None => DEFAULT_KDF_ITERATIONS,
        };

        Ok(Self {
            data_dir,
            api_base_url,
            build_mode,
            log_format,
            kdf_iterations,
        })
    }
}
