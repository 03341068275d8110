//! A cancellable one-shot timer.
//!
//! [`Debouncer::schedule`] runs an action after a fixed quiet interval.
//! Scheduling again before the interval elapses cancels the previous action,
//! so at most one action per quiet period ever runs.

use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel whatever is pending and run `action` once `delay` has elapsed.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let deadline = Instant::now() + self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            action.await;
        }));
    }

    /// Drop the pending action, whether it is still waiting or already running.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                debug!("Cancelling pending debounced action");
            }
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Wait for the pending action (if any) to run to completion.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!("Debounced action failed: {}", e);
                }
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
