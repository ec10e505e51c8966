use chrono::NaiveDate;
use hrdesk_core::{AttendanceForm, AttendanceRecord, EmployeeId};
use std::sync::Arc;

use super::ensure_admin;
use crate::api::{ApiClient, ApiError};
use crate::state::store::AppStore;

#[derive(Clone)]
pub struct AttendanceSection {
    api: Arc<ApiClient>,
    store: Arc<AppStore>,
}

impl AttendanceSection {
    pub fn new(api: Arc<ApiClient>, store: Arc<AppStore>) -> Self {
        Self { api, store }
    }

    /// Cached rows, optionally narrowed to one day and/or one employee.
    pub async fn list(
        &self,
        date: Option<NaiveDate>,
        employee: Option<EmployeeId>,
    ) -> Vec<AttendanceRecord> {
        self.store
            .attendance()
            .await
            .into_iter()
            .filter(|row| date.map_or(true, |d| row.date == d))
            .filter(|row| employee.map_or(true, |e| row.employee_id == e))
            .collect()
    }

    pub async fn mark(&self, form: &AttendanceForm) -> Result<(), ApiError> {
        ensure_admin(&self.api, "attendance").await?;
        self.api.mark_attendance(form).await?;
        tracing::info!(employee = %form.employee, date = %form.date, status = %form.status, "Attendance marked");
        self.store.reload().await
    }
}
