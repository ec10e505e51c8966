use hrdesk_core::{models::ListEnvelope, Department, DepartmentForm, DepartmentId};

use super::{client::ApiClient, types::ApiError};

impl ApiClient {
    pub async fn list_departments(&self) -> Result<Vec<Department>, ApiError> {
        let url = self.endpoint("departments/")?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().get(url.clone())))
            .await?;
        let envelope: ListEnvelope<Department> = self.map_json_response(response).await?;
        Ok(envelope.into_vec())
    }

    pub async fn create_department(&self, form: &DepartmentForm) -> Result<(), ApiError> {
        let url = self.endpoint("departments/")?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().post(url.clone()).json(form)))
            .await?;
        self.map_empty_response(response).await
    }

    pub async fn update_department(
        &self,
        id: DepartmentId,
        form: &DepartmentForm,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("departments/{}/", id))?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().put(url.clone()).json(form)))
            .await?;
        self.map_empty_response(response).await
    }

    pub async fn delete_department(&self, id: DepartmentId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("departments/{}/", id))?;
        let response = self
            .send_with_refresh(|| Ok(self.http_client().delete(url.clone())))
            .await?;
        self.map_empty_response(response).await
    }
}
