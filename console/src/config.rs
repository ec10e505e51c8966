//! Console settings.
//!
//! Values are layered: built-in defaults, then an optional `hrdesk.toml` in
//! the working directory, then `HRDESK_*` environment variables (a `.env`
//! file is loaded first).

use chrono_tz::Tz;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SESSION_FILE: &str = ".hrdesk-session.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),
    #[error("invalid api_base_url {value}: {reason}")]
    BaseUrl { value: String, reason: String },
    #[error("invalid time_zone value: {0}")]
    TimeZone(String),
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    api_base_url: String,
    poll_interval_secs: u64,
    request_timeout_secs: u64,
    session_file: String,
    time_zone: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub session_file: PathBuf,
    pub time_zone: Tz,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let settings = config::Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("poll_interval_secs", DEFAULT_POLL_INTERVAL_SECS)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .set_default("session_file", DEFAULT_SESSION_FILE)?
            .set_default("time_zone", "UTC")?
            .add_source(config::File::with_name("hrdesk").required(false))
            .add_source(config::Environment::with_prefix("HRDESK").try_parsing(true))
            .build()?;
        Self::from_raw(settings.try_deserialize()?)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let api_base_url = parse_base_url(&raw.api_base_url)?;
        let time_zone: Tz = raw
            .time_zone
            .parse()
            .map_err(|_| ConfigError::TimeZone(raw.time_zone.clone()))?;
        if raw.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroDuration("poll_interval_secs"));
        }
        if raw.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration("request_timeout_secs"));
        }
        Ok(Config {
            api_base_url,
            poll_interval: Duration::from_secs(raw.poll_interval_secs),
            request_timeout: Duration::from_secs(raw.request_timeout_secs),
            session_file: PathBuf::from(raw.session_file),
            time_zone,
        })
    }

    /// Defaults pointed at another backend; used by tests and embedders.
    pub fn for_base_url(base: &str) -> Result<Self, ConfigError> {
        Self::from_raw(RawConfig {
            api_base_url: base.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            session_file: DEFAULT_SESSION_FILE.to_string(),
            time_zone: "UTC".to_string(),
        })
    }
}

/// Normalizes the base so joined paths keep its last segment
/// (`.../api` → `.../api/`).
pub fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let trimmed = value.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    let url = Url::parse(&with_slash).map_err(|e| ConfigError::BaseUrl {
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::BaseUrl {
            value: value.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(url)
}
