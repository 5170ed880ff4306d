use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::app::AsyncResult;

/// Default time between two polls of the feed.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Deliver a `PollTick` now and then every `period`.
///
/// The timer is never cancelled; it ends only when the receiving side (the
/// view) is gone.
pub fn spawn_timer(period: Duration, tx: mpsc::Sender<AsyncResult>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if tx.send(AsyncResult::PollTick).await.is_err() {
                tracing::debug!("poll timer stopped: receiver dropped");
                break;
            }
        }
    })
}
