pub mod attendance;
pub mod dashboard;
pub mod departments;
pub mod employees;
pub mod leaves;
pub mod notifications;

use crate::api::{ApiClient, ApiError};

/// Record edits (employees, departments, attendance) are for administrators.
pub(crate) async fn ensure_admin(api: &ApiClient, records: &str) -> Result<(), ApiError> {
    let user = api.current_user().await.ok_or(ApiError::NotAuthenticated)?;
    if user.role.can_manage_records() {
        Ok(())
    } else {
        Err(ApiError::Rejected {
            status: 403,
            message: format!("{} accounts cannot edit {}", user.role.label(), records),
        })
    }
}
