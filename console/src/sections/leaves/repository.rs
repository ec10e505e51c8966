use hrdesk_core::{CreateLeaveRequest, LeaveAction, LeaveId, LeaveRequest};
use std::sync::Arc;

use crate::api::{ApiClient, ApiError};

#[derive(Clone)]
pub struct LeavesRepository {
    client: Arc<ApiClient>,
}

impl LeavesRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn submit(&self, payload: &CreateLeaveRequest) -> Result<(), ApiError> {
        self.client.create_leave(payload).await
    }

    pub async fn approve(&self, id: LeaveId) -> Result<(), ApiError> {
        self.client.decide_leave(id, LeaveAction::Approve).await
    }

    pub async fn reject(&self, id: LeaveId) -> Result<(), ApiError> {
        self.client.decide_leave(id, LeaveAction::Reject).await
    }

    pub async fn delete(&self, id: LeaveId) -> Result<(), ApiError> {
        self.client.delete_leave(id).await
    }

    pub async fn pending(&self) -> Result<Vec<LeaveRequest>, ApiError> {
        self.client.list_pending_leaves().await
    }
}
