use hrdesk_core::{NotificationFeed, NotificationId};

use super::{client::ApiClient, types::ApiError};

impl ApiClient {
    pub async fn fetch_notifications(&self) -> Result<NotificationFeed, ApiError> {
        let url = self.endpoint("notifications/")?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().get(url.clone())))
            .await?;
        self.map_json_response(response).await
    }

    pub async fn mark_notification_read(&self, id: NotificationId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("notifications/{}/mark_read/", id))?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().post(url.clone())))
            .await?;
        self.map_empty_response(response).await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        let url = self.endpoint("notifications/mark_all_read/")?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().post(url.clone())))
            .await?;
        self.map_empty_response(response).await
    }
}
