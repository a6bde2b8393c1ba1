/*!
 * Debouncing of rapid input edits.
 *
 * Each call to `schedule` cancels the previously scheduled action and arms a
 * new timer. Only the timer is cancellable: once the quiet period elapses the
 * action runs on its own task, so a later `schedule` never aborts work that
 * has already started.
 */

use log::trace;
use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Coalesces bursts of triggers into one delayed action
#[derive(Debug)]
pub struct Debouncer {
    /// Quiet period before the last scheduled action fires
    delay: Duration,
    /// Timer of the most recently scheduled action
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `action` after the quiet period, replacing any pending one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action());
        });

        if let Some(previous) = self.pending.lock().replace(timer) {
            if !previous.is_finished() {
                trace!("Debounce timer superseded");
            }
            previous.abort();
        }
    }

    /// Cancel the pending action, returning whether one was still waiting
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(timer) => {
                let waiting = !timer.is_finished();
                timer.abort();
                waiting
            }
            None => false,
        }
    }

    /// Whether an action is still waiting for its quiet period
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.get_mut().take() {
            timer.abort();
        }
    }
}
