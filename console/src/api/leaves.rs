use hrdesk_core::{
    models::{leave::LeaveRecord, ListEnvelope},
    CreateLeaveRequest, LeaveAction, LeaveId, LeaveRequest,
};

use super::{client::ApiClient, types::ApiError};

impl ApiClient {
    pub async fn list_leaves(&self) -> Result<Vec<LeaveRequest>, ApiError> {
        self.fetch_leaves("leaves/").await
    }

    /// Requests awaiting a decision, as computed by the backend.
    pub async fn list_pending_leaves(&self) -> Result<Vec<LeaveRequest>, ApiError> {
        self.fetch_leaves("leaves/pending/").await
    }

    async fn fetch_leaves(&self, path: &str) -> Result<Vec<LeaveRequest>, ApiError> {
        let url = self.endpoint(path)?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().get(url.clone())))
            .await?;
        let envelope: ListEnvelope<LeaveRecord> = self.map_json_response(response).await?;
        Ok(envelope
            .into_vec()
            .into_iter()
            .map(LeaveRequest::from)
            .collect())
    }

    pub async fn create_leave(&self, payload: &CreateLeaveRequest) -> Result<(), ApiError> {
        let url = self.endpoint("leaves/")?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().post(url.clone()).json(payload)))
            .await?;
        self.map_empty_response(response).await
    }

    /// `POST /leaves/{id}/approve/` or `/reject/` with an empty body.
    pub async fn decide_leave(&self, id: LeaveId, action: LeaveAction) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("leaves/{}/{}/", id, action.as_str()))?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().post(url.clone())))
            .await?;
        self.map_empty_response(response).await
    }

    pub async fn delete_leave(&self, id: LeaveId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("leaves/{}/", id))?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().delete(url.clone())))
            .await?;
        self.map_empty_response(response).await
    }
}
