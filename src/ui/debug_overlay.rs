// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Auth Debug Overlay
//!
//! Development-only diagnostics: on mount, reads the cookie string once and
//! issues a single credential-bearing `GET /api/auth/me`, then shows the raw
//! result. No retries, no polling, no timeout.
//!
//! In a production build the overlay neither renders nor sends anything.
//! The request task is tied to a [`CancellationToken`] and is cancelled when
//! the overlay is unmounted (dropped) or the application state is torn down.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::COOKIE;
use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{BuildMode, Config};
use crate::state::AppState;

/// Session-check endpoint path.
pub const AUTH_ME_PATH: &str = "/api/auth/me";

/// Raw response of the session-check endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResponse {
    pub status: u16,
    /// Parsed JSON, or the raw text as a JSON string if it was not JSON.
    pub body: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid session-check URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

/// Issues the session-check request.
pub trait SessionProbe: Send + Sync + 'static {
    /// `cookies` is the cookie string captured at mount; empty means none.
    fn check(&self, cookies: &str) -> impl Future<Output = Result<ProbeResponse, ProbeError>> + Send;
}

/// `reqwest`-backed probe against `{API_BASE_URL}/api/auth/me`.
#[derive(Debug, Clone)]
pub struct HttpSessionProbe {
    client: reqwest::Client,
    url: Url,
}

impl HttpSessionProbe {
    pub fn new(base: &Url) -> Result<Self, ProbeError> {
        Ok(Self {
            client: reqwest::Client::new(),
            url: base.join(AUTH_ME_PATH)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ProbeError> {
        Self::new(&config.api_base_url)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl SessionProbe for HttpSessionProbe {
    fn check(&self, cookies: &str) -> impl Future<Output = Result<ProbeResponse, ProbeError>> + Send {
        let mut request = self.client.get(self.url.clone());
        if !cookies.is_empty() {
            request = request.header(COOKIE, cookies.to_string());
        }

        async move {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let text = response.text().await?;
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            Ok(ProbeResponse { status, body })
        }
    }
}

/// Source of the browser cookie string.
pub trait CookieSource {
    fn cookie_string(&self) -> String;
}

impl CookieSource for str {
    fn cookie_string(&self) -> String {
        self.to_string()
    }
}

impl CookieSource for String {
    fn cookie_string(&self) -> String {
        self.clone()
    }
}

/// Outcome of the single probe.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeState {
    Loading,
    Loaded(ProbeResponse),
    Failed(String),
}

/// What the overlay renders in a development build.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugPanel {
    pub endpoint: &'static str,
    pub cookies: String,
    pub probe: ProbeState,
}

/// Mounted debug overlay. Dropping it cancels the in-flight request.
pub struct AuthDebugOverlay {
    mode: BuildMode,
    cookies: String,
    probe: watch::Receiver<ProbeState>,
    cancel: CancellationToken,
}

impl AuthDebugOverlay {
    /// Mount the overlay: capture cookies and spawn the single request.
    ///
    /// Must be called inside a tokio runtime.
    pub fn mount<P: SessionProbe>(
        state: &AppState,
        probe: Arc<P>,
        cookies: &(impl CookieSource + ?Sized),
    ) -> Self {
        let mode = state.config.build_mode;
        let cancel = state.child_token();

        if mode.is_production() {
            let (_, rx) = watch::channel(ProbeState::Loading);
            return Self {
                mode,
                cookies: String::new(),
                probe: rx,
                cancel,
            };
        }

        let cookies = cookies.cookie_string();
        let (tx, rx) = watch::channel(ProbeState::Loading);
        let task_cancel = cancel.clone();
        let task_cookies = cookies.clone();

        tokio::spawn(async move {
            tokio::select! {
                result = probe.check(&task_cookies) => {
                    let next = match result {
                        Ok(response) => {
                            tracing::debug!(status = response.status, "Session check completed");
                            ProbeState::Loaded(response)
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "Session check failed");
                            ProbeState::Failed(e.to_string())
                        }
                    };
                    let _ = tx.send(next);
                }
                _ = task_cancel.cancelled() => {
                    tracing::debug!("Session check cancelled on unmount");
                }
            }
        });

        Self {
            mode,
            cookies,
            probe: rx,
            cancel,
        }
    }

    /// `None` in production builds, regardless of authentication state.
    pub fn view(&self) -> Option<DebugPanel> {
        if self.mode.is_production() {
            return None;
        }
        Some(DebugPanel {
            endpoint: AUTH_ME_PATH,
            cookies: self.cookies.clone(),
            probe: self.probe.borrow().clone(),
        })
    }

    /// Wait until the probe leaves `Loading`.
    ///
    /// Returns `None` in production or if the request was cancelled.
    pub async fn settled(&mut self) -> Option<ProbeState> {
        if self.mode.is_production() {
            return None;
        }
        let state = self
            .probe
            .wait_for(|state| !matches!(state, ProbeState::Loading))
            .await
            .ok()?;
        Some(state.clone())
    }

    pub fn unmount(self) {}
}

impl Drop for AuthDebugOverlay {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::config::APP_ENV_ENV;
    use crate::storage::MemoryStore;

    #[derive(Default)]
    struct FakeProbe {
        calls: AtomicUsize,
        seen_cookies: Mutex<Vec<String>>,
        fail: bool,
    }

    impl SessionProbe for FakeProbe {
        fn check(&self, cookies: &str) -> impl Future<Output = Result<ProbeResponse, ProbeError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_cookies.lock().unwrap().push(cookies.to_string());
            let fail = self.fail;
            async move {
                if fail {
                    Err(ProbeError::Url(url::ParseError::EmptyHost))
                } else {
                    Ok(ProbeResponse {
                        status: 401,
                        body: serde_json::json!({ "error": "not signed in" }),
                    })
                }
            }
        }
    }

    /// Never completes.
    struct HangingProbe;

    impl SessionProbe for HangingProbe {
        fn check(&self, _: &str) -> impl Future<Output = Result<ProbeResponse, ProbeError>> + Send {
            std::future::pending()
        }
    }

    fn state(mode: &'static str) -> AppState {
        let config = Config::from_lookup(|key| (key == APP_ENV_ENV).then(|| mode.to_string())).unwrap();
        AppState::new(config, Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn development_build_fetches_once_and_shows_result() {
        let probe = Arc::new(FakeProbe::default());
        let mut overlay = AuthDebugOverlay::mount(&state("development"), probe.clone(), "sid=abc");

        let settled = overlay.settled().await.unwrap();

        let expected = ProbeResponse {
            status: 401,
            body: serde_json::json!({ "error": "not signed in" }),
        };
        assert_eq!(settled, ProbeState::Loaded(expected.clone()));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*probe.seen_cookies.lock().unwrap(), vec!["sid=abc".to_string()]);

        let panel = overlay.view().unwrap();
        assert_eq!(panel.endpoint, "/api/auth/me");
        assert_eq!(panel.cookies, "sid=abc");
        assert_eq!(panel.probe, ProbeState::Loaded(expected));
    }

    #[tokio::test]
    async fn request_failure_is_shown_as_text() {
        let probe = Arc::new(FakeProbe {
            fail: true,
            ..FakeProbe::default()
        });
        let mut overlay = AuthDebugOverlay::mount(&state("development"), probe, "");

        let settled = overlay.settled().await.unwrap();
        assert!(matches!(settled, ProbeState::Failed(msg) if msg.contains("invalid session-check URL")));
    }

    #[tokio::test]
    async fn production_build_renders_and_sends_nothing() {
        let probe = Arc::new(FakeProbe::default());
        let app = state("production");
        let wallet = crate::models::WalletData::new(
            "0xabc",
            "signer_1",
            crate::models::KeyMaterial::new([1u8; 32]),
        );
        app.publish_wallet(wallet.clone(), crate::models::Session::for_wallet(&wallet))
            .await;

        let mut overlay = AuthDebugOverlay::mount(&app, probe.clone(), "sid=abc");

        assert!(overlay.view().is_none());
        assert!(overlay.settled().await.is_none());
        tokio::task::yield_now().await;
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn pending_request_stays_loading() {
        let overlay = AuthDebugOverlay::mount(&state("development"), Arc::new(HangingProbe), "");
        tokio::task::yield_now().await;
        assert_eq!(overlay.view().unwrap().probe, ProbeState::Loading);
    }

    #[tokio::test]
    async fn unmount_cancels_in_flight_request() {
        let overlay = AuthDebugOverlay::mount(&state("development"), Arc::new(HangingProbe), "");
        let token = overlay.cancel.clone();

        overlay.unmount();

        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn teardown_cancels_mounted_overlay() {
        let app = state("development");
        let mut overlay = AuthDebugOverlay::mount(&app, Arc::new(HangingProbe), "");

        app.teardown().await;

        assert!(overlay.settled().await.is_none());
    }

    #[test]
    fn http_probe_targets_auth_me() {
        let base = Url::parse("https://sign.example.com/app/").unwrap();
        let probe = HttpSessionProbe::new(&base).unwrap();
        assert_eq!(probe.url().as_str(), "https://sign.example.com/api/auth/me");
    }
}
