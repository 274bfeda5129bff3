//! Idle focus session sweeper background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::AppState;

/// Background task that closes focus sessions nobody has requested for `max_idle`
pub async fn session_sweeper_task(state: Arc<AppState>, every: Duration, max_idle: Duration) {
    info!(?every, ?max_idle, "Starting focus session sweeper task");

    let mut interval = interval_at(Instant::now() + every, every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let closed = state.focus.sweep_idle(max_idle);
        if closed > 0 {
            info!(closed, remaining = state.focus.len(), "Closed idle focus sessions");
        } else {
            debug!("No idle focus sessions to close");
        }
    }
}
