use hrdesk_core::{
    models::{employee::EmployeeRecord, ListEnvelope},
    Employee, EmployeeForm, EmployeeId,
};

use super::{client::ApiClient, types::ApiError};

impl ApiClient {
    pub async fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        let url = self.endpoint("employees/")?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().get(url.clone())))
            .await?;
        let envelope: ListEnvelope<EmployeeRecord> = self.map_json_response(response).await?;
        Ok(envelope.into_vec().into_iter().map(Employee::from).collect())
    }

    pub async fn create_employee(&self, form: &EmployeeForm) -> Result<(), ApiError> {
        let url = self.endpoint("employees/")?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().post(url.clone()).json(form)))
            .await?;
        self.map_empty_response(response).await
    }

    pub async fn update_employee(&self, id: EmployeeId, form: &EmployeeForm) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("employees/{}/", id))?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().put(url.clone()).json(form)))
            .await?;
        self.map_empty_response(response).await
    }

    pub async fn delete_employee(&self, id: EmployeeId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("employees/{}/", id))?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().delete(url.clone())))
            .await?;
        self.map_empty_response(response).await
    }
}
