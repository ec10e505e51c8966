//! Records mirrored from the HR backend.
//!
//! Each module pairs a `*Record` type matching the backend's snake_case JSON
//! with the normalized domain type the console works on.

pub mod attendance;
pub mod department;
pub mod employee;
pub mod leave;
pub mod notification;
pub mod user;

use serde::{Deserialize, Deserializer};

/// List endpoints answer either with a bare array or with a paginated
/// `{ "results": [...] }` envelope depending on backend settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Paginated { results: Vec<T> },
    Plain(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Paginated { results } => results,
            ListEnvelope::Plain(items) => items,
        }
    }
}

/// Decimal columns arrive as strings (`"1250.00"`), computed columns as
/// numbers; both are accepted, null becomes zero.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(value)) => Ok(value),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(0.0),
        Some(Raw::Text(text)) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid decimal: {}", text))),
        None => Ok(0.0),
    }
}

/// Treats `null` and missing strings alike.
pub(crate) fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
