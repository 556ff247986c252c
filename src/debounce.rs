//! Debounced actions on the tokio timer
//!
//! A [`Debouncer`] holds at most one pending action. Scheduling again before
//! the timer fires aborts the pending task, so a burst of calls collapses into
//! a single action run `delay` after the last call. Dropping the debouncer
//! aborts whatever is still pending.

use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Delay used for live-typing refetches
pub const DEFAULT_DELAY: Duration = Duration::from_millis(250);

/// Coalesces bursts of triggers into one delayed action
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Create a debouncer with a fixed delay
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Configured delay
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `action` after the configured delay, replacing any pending action
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule_after(self.delay, action);
    }

    /// Run `action` after `delay`, replacing any pending action
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn schedule_after<F>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel() {
            trace!("Rescheduled pending action");
        }
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Drop the pending action, if any; returns whether one was still waiting
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some_and(|handle| {
            let waiting = !handle.is_finished();
            handle.abort();
            waiting
        })
    }

    /// Whether an action is armed and has not fired yet
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
