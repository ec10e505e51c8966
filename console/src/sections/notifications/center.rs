use hrdesk_core::{reminders::SeenTracker, LeaveNotification, NotificationId};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{alerts::AlertSink, source::NotificationSource};
use crate::api::ApiError;
use crate::state::store::AppStore;

/// Result of one poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOutcome {
    pub unread_count: u32,
    /// Reminders alerted on this poll.
    pub fresh: Vec<LeaveNotification>,
}

/// Fetches reminder snapshots, alerts once per new id, and publishes the
/// latest feed to the store.
///
/// Polls are serialized: a refetch after marking reminders read waits for a
/// timer poll already in flight.
pub struct NotificationCenter {
    source: Arc<dyn NotificationSource>,
    sink: Arc<dyn AlertSink>,
    store: Arc<AppStore>,
    tracker: Mutex<SeenTracker>,
}

impl NotificationCenter {
    pub fn new(
        source: Arc<dyn NotificationSource>,
        sink: Arc<dyn AlertSink>,
        store: Arc<AppStore>,
    ) -> Self {
        Self {
            source,
            sink,
            store,
            tracker: Mutex::new(SeenTracker::new()),
        }
    }

    pub async fn poll_once(&self) -> Result<PollOutcome, ApiError> {
        let mut tracker = self.tracker.lock().await;
        let feed = self.source.fetch().await?;
        let first = !tracker.is_seeded();
        let fresh: Vec<LeaveNotification> = tracker
            .observe(&feed.notifications)
            .into_iter()
            .cloned()
            .collect();
        if first {
            tracing::debug!(count = feed.notifications.len(), "Seeded reminder ids");
        }
        for reminder in &fresh {
            self.sink.alert(reminder).await;
        }
        self.sink.badge(feed.unread_count).await;
        let unread_count = feed.unread_count;
        self.store.publish_reminders(feed).await;
        Ok(PollOutcome {
            unread_count,
            fresh,
        })
    }

    pub async fn mark_read(&self, id: NotificationId) -> Result<PollOutcome, ApiError> {
        self.source.mark_read(id).await?;
        self.poll_once().await
    }

    pub async fn mark_all_read(&self) -> Result<PollOutcome, ApiError> {
        self.source.mark_all_read().await?;
        self.poll_once().await
    }
}
