use serde::{Deserialize, Serialize};
use validator::Validate;

use super::string_or_empty;
use crate::types::DepartmentId;

/// A company or department. The backend uses the same table for both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub manager: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,
    #[serde(default)]
    pub employees_count: u32,
}

/// Body of `POST /departments/` and `PUT /departments/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct DepartmentForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub manager: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}
