use std::time::Duration;

use common::types::SessionId;
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    handlers::{DeskContext, load_messages},
    types::{SharedStore, Visibility},
};

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// ### Periodic message refresh for one open session.
///
/// At most one polling task is alive per controller: starting a new poll
/// aborts the previous task first. Ticks never overlap; a tick that comes
/// due while a fetch is still outstanding is skipped rather than queued.
///
/// Each tick checks the [`Visibility`] of the view that owns the task and
/// ends the task instead of fetching once the view is gone.
#[derive(Debug)]
pub struct PollingController {
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl PollingController {
    pub fn new(interval: Duration) -> Self {
        PollingController {
            interval: interval.max(MIN_POLL_INTERVAL),
            task: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts fetching `session_id`'s messages into `store`, immediately and
    /// then every interval. Cancels any poll already running.
    pub fn start_polling(
        &mut self,
        ctx: DeskContext,
        store: SharedStore,
        session_id: SessionId,
        visibility: Visibility,
    ) {
        self.stop_polling();

        let period = self.interval;
        info!(session_id = %session_id, ?period, "polling started");

        self.task = Some(tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                if !visibility.is_visible() {
                    debug!(session_id = %session_id, "view closed, polling ends");
                    break;
                }

                load_messages(&ctx, &store, &session_id).await;
            }
        }));
    }

    /// Cancels the running poll, if any.
    pub fn stop_polling(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("polling stopped");
        }
    }

    /// Whether a polling task is currently alive.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.stop_polling();
    }
}
