use hrdesk_core::{
    dashboard::{filter_leaves, own_profile, pending_queue, LeaveFilter, LeaveSummary},
    gate, Employee, LeaveAction, LeaveId, LeaveStatus, Role,
};
use std::sync::Arc;

use super::{
    repository::LeavesRepository,
    types::{LeaveForm, LeaveRow},
};
use crate::api::{ApiClient, ApiError};
use crate::state::store::AppStore;

/// An employee's own requests next to their balance.
#[derive(Debug, Clone)]
pub struct OwnLeaves {
    pub employee: Employee,
    pub rows: Vec<LeaveRow>,
    pub summary: LeaveSummary,
}

/// Leave list and approval actions for the signed-in viewer.
///
/// Every mutation is followed by a full reload. When the backend refuses an
/// action the store is resynchronized and the refusal is returned as is.
#[derive(Clone)]
pub struct LeavesViewModel {
    api: Arc<ApiClient>,
    repo: LeavesRepository,
    store: Arc<AppStore>,
}

impl LeavesViewModel {
    pub fn new(api: Arc<ApiClient>, store: Arc<AppStore>) -> Self {
        Self {
            repo: LeavesRepository::new(api.clone()),
            api,
            store,
        }
    }

    async fn viewer(&self) -> Result<Role, ApiError> {
        self.api
            .current_user()
            .await
            .map(|user| user.role)
            .ok_or(ApiError::NotAuthenticated)
    }

    pub async fn rows(&self, filter: LeaveFilter) -> Result<Vec<LeaveRow>, ApiError> {
        let viewer = self.viewer().await?;
        let leaves = self.store.leaves().await;
        Ok(filter_leaves(&leaves, filter)
            .into_iter()
            .map(|leave| LeaveRow::new(leave.clone(), viewer))
            .collect())
    }

    /// Requests filed for the viewer's own employee record.
    pub async fn own(&self, filter: LeaveFilter) -> Result<OwnLeaves, ApiError> {
        let user = self
            .api
            .current_user()
            .await
            .ok_or(ApiError::NotAuthenticated)?;
        let employees = self.store.employees().await;
        let employee = own_profile(&user, &employees)
            .cloned()
            .ok_or_else(|| ApiError::Rejected {
                status: 404,
                message: "No employee profile is linked to this account".into(),
            })?;
        let leaves = self.store.leaves().await;
        let rows = filter_leaves(&leaves, filter)
            .into_iter()
            .filter(|leave| leave.employee_id == employee.id)
            .map(|leave| LeaveRow::new(leave.clone(), user.role))
            .collect();
        Ok(OwnLeaves {
            summary: LeaveSummary::compute(&employee, &leaves),
            employee,
            rows,
        })
    }

    /// `pending` and `manager_approved` requests from the cache.
    pub async fn queue(&self) -> Result<Vec<LeaveRow>, ApiError> {
        let viewer = self.viewer().await?;
        let leaves = self.store.leaves().await;
        Ok(pending_queue(&leaves)
            .into_iter()
            .map(|leave| LeaveRow::new(leave.clone(), viewer))
            .collect())
    }

    /// Pending requests as the backend computes them for this viewer.
    pub async fn backend_queue(&self) -> Result<Vec<LeaveRow>, ApiError> {
        let viewer = self.viewer().await?;
        Ok(self
            .repo
            .pending()
            .await?
            .into_iter()
            .map(|leave| LeaveRow::new(leave, viewer))
            .collect())
    }

    pub async fn submit(&self, form: LeaveForm) -> Result<(), ApiError> {
        let employee = self
            .store
            .employees()
            .await
            .into_iter()
            .find(|e| e.id == form.employee);
        let payload = form.to_payload(employee.as_ref())?;
        self.repo.submit(&payload).await?;
        tracing::info!(
            employee = %payload.employee,
            leave_type = %payload.leave_type,
            days = payload.days(),
            "Leave request submitted"
        );
        self.store.reload().await
    }

    pub async fn approve(&self, id: LeaveId) -> Result<LeaveStatus, ApiError> {
        self.decide(id, LeaveAction::Approve).await
    }

    pub async fn reject(&self, id: LeaveId) -> Result<LeaveStatus, ApiError> {
        self.decide(id, LeaveAction::Reject).await
    }

    /// Applies `action` when the gate allows it for the cached status.
    ///
    /// Returns the status the request is expected to move to.
    pub async fn decide(&self, id: LeaveId, action: LeaveAction) -> Result<LeaveStatus, ApiError> {
        let viewer = self.viewer().await?;
        let leave = match self.store.leave(id).await {
            Some(leave) => leave,
            None => {
                self.store.reload().await?;
                self.store.leave(id).await.ok_or(ApiError::Rejected {
                    status: 404,
                    message: format!("Leave request {} not found", id),
                })?
            }
        };
        let next = gate::check(viewer, leave.status, action)?;

        let result = match action {
            LeaveAction::Approve => self.repo.approve(id).await,
            LeaveAction::Reject => self.repo.reject(id).await,
        };
        self.finish(result).await?;
        tracing::info!(leave = %id, %action, from = %leave.status, to = %next, "Leave request decided");
        Ok(next)
    }

    /// Offered on every row; the backend refuses approved requests.
    pub async fn delete(&self, id: LeaveId) -> Result<(), ApiError> {
        let result = self.repo.delete(id).await;
        self.finish(result).await?;
        tracing::info!(leave = %id, "Leave request deleted");
        Ok(())
    }

    async fn finish(&self, result: Result<(), ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(()) => self.store.reload().await,
            Err(err) => {
                if !err.is_session_expired() {
                    if let Err(reload_err) = self.store.reload().await {
                        tracing::warn!(error = %reload_err, "Resync after refused action failed");
                    }
                }
                Err(err)
            }
        }
    }
}
