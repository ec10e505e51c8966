use hrdesk_core::{models::ListEnvelope, AttendanceForm, AttendanceRecord};

use super::{client::ApiClient, types::ApiError};

impl ApiClient {
    pub async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>, ApiError> {
        let url = self.endpoint("attendances/")?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().get(url.clone())))
            .await?;
        let envelope: ListEnvelope<AttendanceRecord> = self.map_json_response(response).await?;
        Ok(envelope.into_vec())
    }

    pub async fn mark_attendance(&self, form: &AttendanceForm) -> Result<(), ApiError> {
        let url = self.endpoint("attendances/")?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().post(url.clone()).json(form)))
            .await?;
        self.map_empty_response(response).await
    }
}
