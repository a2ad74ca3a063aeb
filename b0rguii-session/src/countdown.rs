//! Challenge countdown.
//!
//! A countdown does not accumulate ticks toward a deadline; it
//! recomputes the remaining time from the wall clock on every tick, so
//! a suspended or slow process still fires at the right instant rather
//! than drifting late by however long it was stalled.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::debug;

/// How often the countdown re-checks the wall clock.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a running countdown task.
///
/// The task fires `on_expiry` exactly once, at the first tick at or
/// past the deadline. Dropping the handle aborts the task, so the
/// countdown of a challenge that was settled early can never fire.
pub struct Countdown {
    task: JoinHandle<()>,
}

impl Countdown {
    /// Spawn a countdown for `expires_at`.
    pub fn spawn<F, Fut>(expires_at: DateTime<Utc>, on_expiry: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let task = tokio::spawn(async move {
            loop {
                let now = Utc::now();
                if now >= expires_at {
                    break;
                }
                // Sleep the shorter of one tick and what is actually
                // left, so the final tick lands on the deadline instead
                // of overshooting it.
                let remaining = (expires_at - now).to_std().unwrap_or_default();
                tokio::time::sleep(remaining.min(TICK_INTERVAL)).await;
            }

            debug!(expires_at = %expires_at, "Countdown reached its deadline");
            on_expiry().await;
        });

        Self { task }
    }

    /// Stop the countdown without firing.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the task has finished, either by firing or by abort.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.task.abort();
        debug!("Countdown dropped, task aborted");
    }
}
