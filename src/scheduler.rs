use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

/// A cancellable fixed-period task. Arming replaces whatever was armed
/// before, so at most one schedule is ever live per timer.
#[derive(Debug, Default)]
pub struct RefreshTimer {
    handle: Option<JoinHandle<()>>,
}

impl RefreshTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` now and then every `period`. Each run completes before the
    /// next tick is awaited, so runs never overlap. Must be called inside a
    /// tokio runtime.
    pub fn arm<F, Fut>(&mut self, period: Duration, mut task: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.cancel() {
            debug!("cancelled previous refresh schedule");
        }
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                task().await;
            }
        });
        debug!(period_secs = period.as_secs(), "armed refresh schedule");
        self.handle = Some(handle);
    }

    /// Stops the schedule. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
