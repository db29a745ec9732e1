// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client-side navigation targets and the host-facing [`Navigator`] seam.

use std::fmt;

use tokio::sync::mpsc;

/// Routes the UI core navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Dashboard => "/dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A navigation request emitted by a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    Navigate(Route),
    /// Full page reload.
    Reload,
}

/// Performs navigation on behalf of pages.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
    fn reload(&self);
}

/// Forwards navigation requests to the host's event loop.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<NavigationEvent>,
}

impl ChannelNavigator {
    /// Create a navigator and the receiver the host drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NavigationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: NavigationEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!(?event, "Navigation dropped: host receiver closed");
        }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "Navigating");
        self.send(NavigationEvent::Navigate(route));
    }

    fn reload(&self) {
        tracing::debug!("Reloading page");
        self.send(NavigationEvent::Reload);
    }
}
