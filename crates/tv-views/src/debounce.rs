//! Search input debouncing

use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// Delays committing raw search input until typing pauses.
///
/// Every new input cancels the pending commit and restarts the timer, so
/// only the last value of a burst is committed. Must be used from within a
/// tokio runtime.
pub struct SearchDebouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `commit(value)` after the delay, replacing any pending commit
    pub fn input<F>(&self, value: impl Into<String>, commit: F)
    where
        F: FnOnce(String) + Send + 'static,
    {
        let value = value.into();
        let delay = self.delay;
        let mut pending = self.pending.lock();

        if let Some(handle) = pending.take() {
            handle.abort();
        }

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Committing search '{}'", value);
            commit(value);
        }));
    }

    /// Drop the pending commit, if any
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.lock().as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
