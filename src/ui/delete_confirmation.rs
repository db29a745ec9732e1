// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Post-deletion page that counts down and redirects home.
//!
//! A background task ticks once per second (`3 → 2 → 1 → Redirecting`) and
//! navigates to [`Route::Home`] when it reaches `Redirecting`. "Go home"
//! navigates immediately. Either way navigation happens exactly once, and
//! the task is cancelled when the page is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::navigation::{Navigator, Route};
use crate::state::AppState;

/// Seconds shown before the automatic redirect.
pub const COUNTDOWN_SECONDS: u8 = 3;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Counting(u8),
    Redirecting,
}

impl CountdownState {
    pub fn start() -> Self {
        CountdownState::Counting(COUNTDOWN_SECONDS)
    }

    /// State after one more second has elapsed.
    pub fn tick(self) -> Self {
        match self {
            CountdownState::Counting(n) if n > 1 => CountdownState::Counting(n - 1),
            _ => CountdownState::Redirecting,
        }
    }

    pub fn seconds_remaining(self) -> Option<u8> {
        match self {
            CountdownState::Counting(n) => Some(n),
            CountdownState::Redirecting => None,
        }
    }
}

/// Navigates home at most once, whoever asks first.
struct HomeRedirect {
    navigator: Arc<dyn Navigator>,
    fired: AtomicBool,
}

impl HomeRedirect {
    fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.navigator.navigate(Route::Home);
        true
    }
}

/// Mounted delete-confirmation page.
pub struct DeleteConfirmation {
    countdown: watch::Receiver<CountdownState>,
    redirect: Arc<HomeRedirect>,
    cancel: CancellationToken,
}

impl DeleteConfirmation {
    /// Mount the page and start the countdown. Requires a tokio runtime.
    pub fn mount(state: &AppState, navigator: Arc<dyn Navigator>) -> Self {
        let (tx, rx) = watch::channel(CountdownState::start());
        let redirect = Arc::new(HomeRedirect {
            navigator,
            fired: AtomicBool::new(false),
        });
        let cancel = state.child_token();

        let task_redirect = redirect.clone();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + TICK, TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut current = CountdownState::start();

            loop {
                tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => {
                        tracing::debug!("Delete confirmation countdown cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        current = current.tick();
                        tx.send_replace(current);
                        if current == CountdownState::Redirecting {
                            task_redirect.fire();
                            break;
                        }
                    }
                }
            }
        });

        tracing::info!(seconds = COUNTDOWN_SECONDS, "Delete confirmation mounted");
        Self {
            countdown: rx,
            redirect,
            cancel,
        }
    }

    pub fn state(&self) -> CountdownState {
        *self.countdown.borrow()
    }

    /// Wait for the next countdown step. `None` once the countdown has stopped.
    pub async fn changed(&mut self) -> Option<CountdownState> {
        self.countdown.changed().await.ok()?;
        Some(*self.countdown.borrow_and_update())
    }

    /// Stop the countdown and navigate home now.
    ///
    /// Returns `false` if the redirect had already happened.
    pub fn go_home(&self) -> bool {
        self.cancel.cancel();
        self.redirect.fire()
    }

    pub fn unmount(self) {}
}

impl Drop for DeleteConfirmation {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::navigation::{ChannelNavigator, NavigationEvent};
    use crate::storage::MemoryStore;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn mount() -> (DeleteConfirmation, UnboundedReceiver<NavigationEvent>, AppState) {
        let state = AppState::new(
            Config::from_lookup(|_| None).unwrap(),
            Arc::new(MemoryStore::new()),
        );
        let (navigator, rx) = ChannelNavigator::channel();
        let page = DeleteConfirmation::mount(&state, Arc::new(navigator));
        (page, rx, state)
    }

    fn drain(rx: &mut UnboundedReceiver<NavigationEvent>) -> Vec<NavigationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn tick_sequence() {
        let mut state = CountdownState::start();
        let mut seen = vec![state];
        while state != CountdownState::Redirecting {
            state = state.tick();
            seen.push(state);
        }
        assert_eq!(
            seen,
            vec![
                CountdownState::Counting(3),
                CountdownState::Counting(2),
                CountdownState::Counting(1),
                CountdownState::Redirecting,
            ]
        );
        assert_eq!(CountdownState::Redirecting.tick(), CountdownState::Redirecting);
        assert_eq!(CountdownState::Counting(2).seconds_remaining(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn counts_down_one_step_per_second_then_redirects_once() {
        let (mut page, mut rx, _state) = mount();
        let started = Instant::now();
        assert_eq!(page.state(), CountdownState::Counting(3));

        assert_eq!(page.changed().await, Some(CountdownState::Counting(2)));
        assert_eq!(started.elapsed(), Duration::from_secs(1));
        assert!(drain(&mut rx).is_empty());

        assert_eq!(page.changed().await, Some(CountdownState::Counting(1)));
        assert_eq!(started.elapsed(), Duration::from_secs(2));

        assert_eq!(page.changed().await, Some(CountdownState::Redirecting));
        assert_eq!(started.elapsed(), Duration::from_secs(3));

        assert_eq!(page.changed().await, None);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(drain(&mut rx), vec![NavigationEvent::Navigate(Route::Home)]);

        // already redirected
        assert!(!page.go_home());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn go_home_navigates_immediately_and_stops_countdown() {
        let (mut page, mut rx, _state) = mount();

        assert!(page.go_home());
        assert_eq!(drain(&mut rx), vec![NavigationEvent::Navigate(Route::Home)]);

        assert_eq!(page.changed().await, None);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(drain(&mut rx).is_empty());
        assert_eq!(page.state(), CountdownState::Counting(3));
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_cancels_the_timer() {
        let (mut page, mut rx, _state) = mount();
        assert_eq!(page.changed().await, Some(CountdownState::Counting(2)));

        page.unmount();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_the_timer() {
        let (mut page, mut rx, state) = mount();

        state.teardown().await;

        assert_eq!(page.changed().await, None);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(drain(&mut rx).is_empty());
    }
}
