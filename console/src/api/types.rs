use hrdesk_core::{CurrentUser, TransitionDenied, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const GENERIC_FAILURE: &str = "The request could not be completed. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("not signed in")]
    NotAuthenticated,
    #[error("session expired, please sign in again")]
    SessionExpired,
    #[error("network error: {0}")]
    Transport(String),
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error(transparent)]
    Local(#[from] ValidationError),
    #[error(transparent)]
    Denied(#[from] TransitionDenied),
    #[error("session storage failed: {0}")]
    Storage(String),
}

impl ApiError {
    /// Builds the error for a non-success status from its JSON body.
    pub fn from_status(status: u16, body: Option<&Value>) -> Self {
        let message = body
            .and_then(extract_message)
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        if status == 400 {
            ApiError::Validation(message)
        } else {
            ApiError::Rejected { status, message }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Validation(_) => Some(400),
            ApiError::SessionExpired => Some(401),
            _ => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Picks the most specific message from a backend error body: `error`,
/// then `detail`, then the first string of the first field array.
pub fn extract_message(body: &Value) -> Option<String> {
    let text = |v: &Value| v.as_str().map(str::trim).filter(|s| !s.is_empty()).map(String::from);
    match body {
        Value::Object(map) => {
            if let Some(message) = map.get("error").and_then(text) {
                return Some(message);
            }
            if let Some(message) = map.get("detail").and_then(text) {
                return Some(message);
            }
            map.values().find_map(|value| match value {
                Value::Array(items) => items.first().and_then(text),
                other => text(other),
            })
        }
        Value::Array(items) => items.first().and_then(text),
        Value::String(_) => text(body),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: CurrentUser,
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    /// Present when the backend rotates refresh tokens.
    #[serde(default)]
    pub refresh: Option<String>,
}
