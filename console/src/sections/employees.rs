use chrono_tz::Tz;
use hrdesk_core::{
    dashboard::search_employees, DepartmentId, Employee, EmployeeForm, EmployeeId,
};
use std::sync::Arc;

use super::ensure_admin;
use crate::api::{ApiClient, ApiError};
use crate::state::store::AppStore;
use crate::utils::time::today_local;

/// Employee directory with administrator-only mutations.
#[derive(Clone)]
pub struct EmployeesSection {
    api: Arc<ApiClient>,
    store: Arc<AppStore>,
    time_zone: Tz,
}

impl EmployeesSection {
    pub fn new(api: Arc<ApiClient>, store: Arc<AppStore>, time_zone: Tz) -> Self {
        Self {
            api,
            store,
            time_zone,
        }
    }

    pub async fn search(&self, query: &str, department: Option<DepartmentId>) -> Vec<Employee> {
        let employees = self.store.employees().await;
        search_employees(&employees, query, department)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn create(&self, form: &EmployeeForm) -> Result<(), ApiError> {
        ensure_admin(&self.api, "employees").await?;
        form.check(today_local(&self.time_zone))?;
        self.api.create_employee(form).await?;
        tracing::info!(email = %form.email, "Employee created");
        self.store.reload().await
    }

    pub async fn update(&self, id: EmployeeId, form: &EmployeeForm) -> Result<(), ApiError> {
        ensure_admin(&self.api, "employees").await?;
        form.check(today_local(&self.time_zone))?;
        self.api.update_employee(id, form).await?;
        tracing::info!(employee = %id, "Employee updated");
        self.store.reload().await
    }

    pub async fn delete(&self, id: EmployeeId) -> Result<(), ApiError> {
        ensure_admin(&self.api, "employees").await?;
        self.api.delete_employee(id).await?;
        tracing::info!(employee = %id, "Employee deleted");
        self.store.reload().await
    }
}
