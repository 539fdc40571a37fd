use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::trace;

use crate::config::WaitConfig;
use crate::utils::error::{AppError, Result};

/// Bounded fixed-interval polling around UI actions.
///
/// An attempt that fails with a retryable error (stale handle, element
/// covered) is repeated every `poll_interval` until it succeeds or `timeout`
/// elapses; any other failure propagates immediately. Suspends between
/// attempts instead of busy-waiting, and reads the tokio clock so callers can
/// drive it deterministically under paused time.
#[derive(Debug, Clone, Copy)]
pub struct Waiter {
    timeout: Duration,
    poll_interval: Duration,
}

impl Waiter {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    pub fn from_config(config: &WaitConfig) -> Self {
        Self::new(config.timeout(), config.poll_interval())
    }

    /// Repeat `attempt` until it succeeds. Retryable failures keep the loop
    /// going; the first non-retryable failure ends it.
    pub async fn until<T, F>(&self, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        self.until_ready(move || attempt().map(Some)).await
    }

    /// Like [`until`](Self::until), but `Ok(None)` means "condition not yet
    /// true, keep polling". Covers presence and element-count waits, where the
    /// page simply has not caught up yet.
    pub async fn until_ready<T, F>(&self, mut poll: F) -> Result<T>
    where
        F: FnMut() -> Result<Option<T>>,
    {
        let start = Instant::now();
        loop {
            match poll() {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(e) if e.is_retryable() => {
                    trace!("retryable failure while waiting: {e}");
                }
                Err(e) => return Err(e),
            }

            if start.elapsed() >= self.timeout {
                return Err(AppError::Timeout {
                    timeout: self.timeout,
                });
            }
            sleep(self.poll_interval).await;
        }
    }
}
