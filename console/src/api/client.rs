use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

use super::types::{ApiError, RefreshRequest, RefreshResponse};
use crate::config::Config;
use crate::state::session::SessionManager;
use crate::utils::token::decode_jti;

/// HTTP client for the HR backend.
///
/// Every authenticated call goes through [`ApiClient::send_with_refresh`]:
/// a 401 triggers one token refresh and one replay, and a second 401 (or a
/// failed refresh) ends the session.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<SessionManager>,
    refresh_lock: Mutex<()>,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<SessionManager>) -> Result<Self, ApiError> {
        Self::with_timeout(config.api_base_url.clone(), config.request_timeout, session)
    }

    pub fn with_timeout(
        base_url: Url,
        timeout: Duration,
        session: Arc<SessionManager>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url,
            session,
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.http
    }

    /// Resolves `path` (relative, trailing slash included) against the base.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Transport(format!("invalid endpoint {}: {}", path, e)))
    }

    /// Sends an authenticated request built by `build`, refreshing the access
    /// token and replaying once on 401.
    pub(crate) async fn send_with_refresh<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn() -> Result<RequestBuilder, ApiError>,
    {
        let token = self
            .session
            .access_token()
            .await
            .ok_or(ApiError::NotAuthenticated)?;
        let response = Self::send(build()?.bearer_auth(&token)).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::info!(
            jti = ?decode_jti(&token),
            "Access token rejected, attempting refresh"
        );
        if let Err(err) = self.refresh_access(&token).await {
            tracing::warn!(error = %err, "Token refresh failed, ending session");
            self.force_logout().await;
            return Err(ApiError::SessionExpired);
        }

        let token = self
            .session
            .access_token()
            .await
            .ok_or(ApiError::SessionExpired)?;
        let replay = Self::send(build()?.bearer_auth(&token)).await?;
        if replay.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("Replayed request still unauthorized, ending session");
            self.force_logout().await;
            return Err(ApiError::SessionExpired);
        }
        Ok(replay)
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request failed");
            ApiError::from(e)
        })
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// `stale` is the token that was just rejected; when another task has
    /// already replaced it the refresh is skipped.
    async fn refresh_access(&self, stale: &str) -> Result<(), ApiError> {
        let _guard = self.refresh_lock.lock().await;
        match self.session.access_token().await {
            Some(current) if current != stale => return Ok(()),
            Some(_) => {}
            None => return Err(ApiError::NotAuthenticated),
        }
        let refresh = self
            .session
            .refresh_token()
            .await
            .ok_or(ApiError::NotAuthenticated)?;

        let response = Self::send(
            self.http
                .post(self.endpoint("token/refresh/")?)
                .json(&RefreshRequest { refresh: &refresh }),
        )
        .await?;
        let refreshed: RefreshResponse = self.map_json_response(response).await?;
        tracing::debug!(jti = ?decode_jti(&refreshed.access), "Access token refreshed");
        self.session
            .update_tokens(refreshed.access, refreshed.refresh)
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))
    }

    pub(crate) async fn force_logout(&self) {
        if let Err(err) = self.session.end().await {
            tracing::error!(error = %err, "Failed to clear session");
        }
    }

    pub(crate) async fn map_json_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(|e| {
                tracing::warn!(error = %e, "Failed to parse response");
                ApiError::Decode(e.to_string())
            })
        } else {
            Err(Self::map_error_response(response).await)
        }
    }

    pub(crate) async fn map_empty_response(&self, response: Response) -> Result<(), ApiError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::map_error_response(response).await)
        }
    }

    async fn map_error_response(response: Response) -> ApiError {
        let status = response.status();
        let body: Option<Value> = response.json().await.ok();
        let error = ApiError::from_status(status.as_u16(), body.as_ref());
        tracing::debug!(status = status.as_u16(), error = %error, "Backend refused request");
        error
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
