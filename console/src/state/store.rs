//! Page-level cache of the four record collections.
//!
//! The cache is only ever replaced wholesale by [`AppStore::reload`]; there
//! is no incremental update.

use chrono::{DateTime, Utc};
use hrdesk_core::{
    dashboard::scope_employees, AttendanceRecord, Department, Employee, LeaveId, LeaveRequest,
    NotificationFeed,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub departments: Vec<Department>,
    pub employees: Vec<Employee>,
    pub leaves: Vec<LeaveRequest>,
    pub attendance: Vec<AttendanceRecord>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn leave(&self, id: LeaveId) -> Option<&LeaveRequest> {
        self.leaves.iter().find(|l| l.id == id)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }
}

pub struct AppStore {
    api: Arc<ApiClient>,
    records: RwLock<Snapshot>,
    reminders: RwLock<NotificationFeed>,
}

impl AppStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            records: RwLock::new(Snapshot::default()),
            reminders: RwLock::new(NotificationFeed::default()),
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Refetches departments, employees, leaves, and attendance in that order
    /// and swaps them in together.
    ///
    /// Any failure empties every collection and is returned to the caller.
    pub async fn reload(&self) -> Result<(), ApiError> {
        match self.fetch_all().await {
            Ok(snapshot) => {
                tracing::debug!(
                    departments = snapshot.departments.len(),
                    employees = snapshot.employees.len(),
                    leaves = snapshot.leaves.len(),
                    attendance = snapshot.attendance.len(),
                    "Reloaded records"
                );
                *self.records.write().await = snapshot;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Reload failed, clearing cached records");
                *self.records.write().await = Snapshot::default();
                Err(err)
            }
        }
    }

    async fn fetch_all(&self) -> Result<Snapshot, ApiError> {
        let departments = self.api.list_departments().await?;
        let employees = self.api.list_employees().await?;
        let employees = match self.api.current_user().await {
            Some(user) => scope_employees(&user, employees),
            None => employees,
        };
        let leaves = self.api.list_leaves().await?;
        let attendance = self.api.list_attendance().await?;
        Ok(Snapshot {
            departments,
            employees,
            leaves,
            attendance,
            loaded_at: Some(Utc::now()),
        })
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.records.read().await.clone()
    }

    pub async fn leaves(&self) -> Vec<LeaveRequest> {
        self.records.read().await.leaves.clone()
    }

    pub async fn leave(&self, id: LeaveId) -> Option<LeaveRequest> {
        self.records.read().await.leave(id).cloned()
    }

    pub async fn employees(&self) -> Vec<Employee> {
        self.records.read().await.employees.clone()
    }

    pub async fn departments(&self) -> Vec<Department> {
        self.records.read().await.departments.clone()
    }

    pub async fn attendance(&self) -> Vec<AttendanceRecord> {
        self.records.read().await.attendance.clone()
    }

    /// Latest reminder feed published by the notification center.
    pub async fn reminders(&self) -> NotificationFeed {
        self.reminders.read().await.clone()
    }

    pub async fn publish_reminders(&self, feed: NotificationFeed) {
        *self.reminders.write().await = feed;
    }

    pub async fn clear(&self) {
        *self.records.write().await = Snapshot::default();
        *self.reminders.write().await = NotificationFeed::default();
    }
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore").finish_non_exhaustive()
    }
}
