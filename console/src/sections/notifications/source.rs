use async_trait::async_trait;
use hrdesk_core::{NotificationFeed, NotificationId};

use crate::api::{ApiClient, ApiError};

/// Where reminder snapshots come from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn fetch(&self) -> Result<NotificationFeed, ApiError>;
    async fn mark_read(&self, id: NotificationId) -> Result<(), ApiError>;
    async fn mark_all_read(&self) -> Result<(), ApiError>;
}

#[async_trait]
impl NotificationSource for ApiClient {
    async fn fetch(&self) -> Result<NotificationFeed, ApiError> {
        self.fetch_notifications().await
    }

    async fn mark_read(&self, id: NotificationId) -> Result<(), ApiError> {
        self.mark_notification_read(id).await
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.mark_all_notifications_read().await
    }
}
