//! The polling driver.
//!
//! A single repeating timer at a fixed ~1-second cadence: each tick takes the current local
//! wall-clock time and synchronously runs one [`TaskFlow::check_alarms`] pass. There is no
//! missed-alarm catch-up: if no tick happens during a task's due minute, that occurrence is
//! simply lost.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::alarm::AlarmDispatcher;
use crate::app::TaskFlow;
use crate::notify::Notifier;

/// Seconds between two evaluation passes
const TICK_INTERVAL_SECS: u64 = 1;

/// A cancellation handle over the spawned polling loop.
///
/// Dropping the handle does *not* stop the loop, call [`AlarmPoller::stop`] on teardown
pub struct AlarmPoller {
    handle: JoinHandle<()>,
}

impl AlarmPoller {
    /// Spawn the polling loop over this shared application state.
    ///
    /// The state is only ever locked tick-by-tick, so the rest of the app is free to mutate it
    /// between two passes
    pub fn spawn<D, N>(app: Arc<Mutex<TaskFlow<D, N>>>) -> Self
    where
        D: AlarmDispatcher + Send + 'static,
        N: Notifier + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(Duration::from_secs(TICK_INTERVAL_SECS));
            loop {
                ticks.tick().await;
                let now = Local::now().naive_local();
                app.lock().await.check_alarms(now).await;
            }
        });
        Self { handle }
    }

    /// Stop the polling loop. This is the only cancellation in the system
    pub fn stop(self) {
        self.handle.abort();
    }
}
