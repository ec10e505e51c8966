use hrdesk_core::CurrentUser;

use super::{
    client::ApiClient,
    types::{ApiError, LoginRequest, LoginResponse},
};
use crate::state::session::Session;
use crate::utils::token::decode_jti;

impl ApiClient {
    /// Signs in and persists the returned session.
    pub async fn login(&self, request: LoginRequest) -> Result<CurrentUser, ApiError> {
        let response = self
            .http_client()
            .post(self.endpoint("auth/login/")?)
            .json(&request)
            .send()
            .await?;
        let login: LoginResponse = self.map_json_response(response).await?;
        tracing::info!(
            user = %login.user.username,
            role = %login.user.role,
            jti = ?decode_jti(&login.access),
            "Signed in"
        );
        let user = login.user.clone();
        self.session()
            .begin(Session {
                access: login.access,
                refresh: login.refresh,
                user: login.user,
            })
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        Ok(user)
    }

    /// Drops the local session. Tokens simply expire on the backend.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session()
            .end()
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))
    }

    pub async fn current_user(&self) -> Option<CurrentUser> {
        self.session().user().await
    }
}
