use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::center::{NotificationCenter, PollOutcome};
use crate::api::ApiError;

/// Owns the background reminder task.
///
/// The task fetches once immediately and then on every interval tick. A slow
/// fetch delays the next tick instead of stacking ticks up behind it.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn spawn(center: Arc<NotificationCenter>, interval: Duration) -> Self {
        let (shutdown, mut stop) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!(interval_secs = interval.as_secs_f64(), "Reminder poller started");
            loop {
                tokio::select! {
                    biased;
                    _ = stop.changed() => break,
                    _ = ticker.tick() => {}
                }
                // shutdown also abandons a fetch that is still in flight
                tokio::select! {
                    biased;
                    _ = stop.changed() => break,
                    result = center.poll_once() => report(result),
                }
            }
            tracing::debug!("Reminder poller stopped");
        });
        Self { shutdown, task }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops the task and waits for it to finish.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = (&mut self.task).await {
            if !err.is_cancelled() {
                tracing::error!(error = %err, "Reminder poller panicked");
            }
        }
    }
}

fn report(result: Result<PollOutcome, ApiError>) {
    match result {
        Ok(outcome) if !outcome.fresh.is_empty() => tracing::debug!(
            fresh = outcome.fresh.len(),
            unread = outcome.unread_count,
            "Reminder poll"
        ),
        Ok(_) => {}
        Err(ApiError::NotAuthenticated) => tracing::debug!("Reminder poll skipped, no session"),
        Err(err) => tracing::warn!(error = %err, "Reminder poll failed"),
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            self.task.abort();
        }
    }
}
