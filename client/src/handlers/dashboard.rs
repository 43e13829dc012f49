use std::time::Duration;

use common::types::SessionStatus;
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{handlers::DeskContext, types::SharedState, utils::play_notification};

const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// "1 new pending session" / "N new pending sessions".
pub fn new_pending_notice(count: usize) -> String {
    if count == 1 {
        "1 new pending session".to_string()
    } else {
        format!("{count} new pending sessions")
    }
}

/// Fetches the pending and active lists and merges unseen sessions into the
/// dashboard. Returns how many new pending sessions were announced; the very
/// first pending fetch fills the list without an announcement.
///
/// The two lists are fetched independently; one failing does not stop the
/// other from being merged.
pub async fn refresh_dashboard(ctx: &DeskContext, state: &SharedState) -> usize {
    let (pending, active) = tokio::join!(
        ctx.backend.get_all_sessions(&SessionStatus::Pending),
        ctx.backend.get_all_sessions(&SessionStatus::Active),
    );

    let new_pending = {
        let mut app = state.lock().await;

        let new_pending = match pending {
            Ok(sessions) => app.dashboard.merge_pending(sessions),
            Err(err) => {
                warn!(%err, "failed to load pending sessions");
                ctx.notifier
                    .error(err.user_message("Failed to load pending sessions"));
                0
            }
        };

        match active {
            Ok(sessions) => {
                let added = app.dashboard.active.merge(sessions);
                debug!(added, "active sessions merged");
            }
            Err(err) => {
                warn!(%err, "failed to load active sessions");
                ctx.notifier
                    .error(err.user_message("Failed to load active sessions"));
            }
        }

        new_pending
    };

    if new_pending > 0 {
        info!(new_pending, "new pending sessions");
        ctx.notifier.info(new_pending_notice(new_pending));
        play_notification(ctx.sound.as_ref());
    }

    ctx.redraw.request();
    new_pending
}

/// ### Spawns the background task that keeps the dashboard fresh.
///
/// Refreshes right away, then every `ctx.dashboard_interval`. The returned
/// handle is aborted on shutdown.
pub fn start_dashboard_task(ctx: DeskContext, state: SharedState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(ctx.dashboard_interval.max(MIN_REFRESH_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            refresh_dashboard(&ctx, &state).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_is_singular_for_one_session() {
        assert_eq!(new_pending_notice(1), "1 new pending session");
        assert_eq!(new_pending_notice(3), "3 new pending sessions");
    }
}
