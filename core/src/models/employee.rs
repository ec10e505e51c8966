//! Employee records and the create/update form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::{lenient_f64, string_or_empty};
use crate::types::{DepartmentId, EmployeeId, UserId};
use crate::validation::{rules, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    OnLeave,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::OnLeave => "on_leave",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::Inactive => "Inactive",
            EmployeeStatus::OnLeave => "On leave",
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(EmployeeStatus::Active),
            "inactive" => Ok(EmployeeStatus::Inactive),
            "on_leave" | "on-leave" => Ok(EmployeeStatus::OnLeave),
            other => Err(ValidationError::Invalid(format!(
                "unknown employee status: {}",
                other
            ))),
        }
    }
}

/// Employee as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    /// Login account tied to this employee, if any.
    #[serde(default)]
    pub user: Option<UserId>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub first_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub last_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub phone: String,
    #[serde(default)]
    pub department: Option<DepartmentId>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub department_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub direction: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub position: String,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub salary: f64,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub matricule: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub cnps: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub address: String,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub leave_balance: Option<i64>,
    #[serde(default)]
    pub leaves_pending_this_year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub user_id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department_id: Option<DepartmentId>,
    pub department_name: String,
    pub direction: String,
    pub position: String,
    pub hire_date: Option<NaiveDate>,
    pub salary: f64,
    pub matricule: String,
    pub cnps: String,
    pub address: String,
    pub status: EmployeeStatus,
    pub birth_date: Option<NaiveDate>,
    /// Remaining paid-leave days; the backend omits it for new hires.
    pub leave_balance: u32,
    /// Paid-leave days requested this year and still awaiting a decision.
    pub pending_leave_days: u32,
}

impl From<EmployeeRecord> for Employee {
    fn from(record: EmployeeRecord) -> Self {
        Employee {
            id: record.id,
            user_id: record.user,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            phone: record.phone,
            department_id: record.department,
            department_name: record.department_name,
            direction: record.direction,
            position: record.position,
            hire_date: record.hire_date,
            salary: record.salary,
            matricule: record.matricule,
            cnps: record.cnps,
            address: record.address,
            status: record.status,
            birth_date: record.birth_date,
            leave_balance: record
                .leave_balance
                .map(clamp_days)
                .unwrap_or(rules::ANNUAL_LEAVE_ALLOWANCE),
            pending_leave_days: record.leaves_pending_this_year.map(clamp_days).unwrap_or(0),
        }
    }
}

/// An overdrawn balance counts as zero days left.
fn clamp_days(days: i64) -> u32 {
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Case-insensitive match on name, email, or position.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.position.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn retirement_year(&self) -> Option<i32> {
        self.birth_date.map(rules::retirement_year)
    }
}

/// Body of `POST /employees/` and `PUT /employees/{id}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct EmployeeForm {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    pub department: DepartmentId,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub direction: String,
    #[validate(length(min = 1, max = 100))]
    pub position: String,
    pub hire_date: NaiveDate,
    #[validate(range(min = 0.0))]
    pub salary: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub matricule: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cnps: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
    pub status: EmployeeStatus,
    pub birth_date: NaiveDate,
}

impl EmployeeForm {
    /// Runs field validation and the working-age rule relative to `today`.
    pub fn check(&self, today: NaiveDate) -> Result<(), ValidationError> {
        self.validate()?;
        rules::validate_birth_date(Some(self.birth_date), today)
    }
}
