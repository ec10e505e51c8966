use hrdesk_core::{validation::Validate, Department, DepartmentForm, DepartmentId, ValidationError};
use std::sync::Arc;

use super::ensure_admin;
use crate::api::{ApiClient, ApiError};
use crate::state::store::AppStore;

/// Contracting companies, each followed by a full reload when changed.
#[derive(Clone)]
pub struct DepartmentsSection {
    api: Arc<ApiClient>,
    store: Arc<AppStore>,
}

impl DepartmentsSection {
    pub fn new(api: Arc<ApiClient>, store: Arc<AppStore>) -> Self {
        Self { api, store }
    }

    pub async fn list(&self) -> Vec<Department> {
        self.store.departments().await
    }

    pub async fn create(&self, form: &DepartmentForm) -> Result<(), ApiError> {
        ensure_admin(&self.api, "departments").await?;
        form.validate().map_err(ValidationError::from)?;
        self.api.create_department(form).await?;
        tracing::info!(name = %form.name, "Department created");
        self.store.reload().await
    }

    pub async fn update(&self, id: DepartmentId, form: &DepartmentForm) -> Result<(), ApiError> {
        ensure_admin(&self.api, "departments").await?;
        form.validate().map_err(ValidationError::from)?;
        self.api.update_department(id, form).await?;
        tracing::info!(department = %id, "Department updated");
        self.store.reload().await
    }

    pub async fn delete(&self, id: DepartmentId) -> Result<(), ApiError> {
        ensure_admin(&self.api, "departments").await?;
        self.api.delete_department(id).await?;
        tracing::info!(department = %id, "Department deleted");
        self.store.reload().await
    }
}
