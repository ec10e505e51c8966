//! Authenticated account and role metadata returned at login.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::string_or_empty;
use crate::types::{DepartmentId, UserId};

/// Roles known to the console.
///
/// The backend spells the company role `entreprise`; `company` is accepted
/// on input so configuration and CLI flags can use either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    Manager,
    Company,
    #[default]
    Employee,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Company, Role::Employee];

    /// Returns the value the backend uses on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Company => "entreprise",
            Role::Employee => "employee",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Manager => "Manager",
            Role::Company => "Company",
            Role::Employee => "Employee",
        }
    }

    /// Employees get the self-service profile, everyone else the admin
    /// console with the reminder bell.
    pub fn uses_admin_console(&self) -> bool {
        !matches!(self, Role::Employee)
    }

    pub fn receives_reminders(&self) -> bool {
        self.uses_admin_console()
    }

    /// Only administrators create employees and companies.
    pub fn can_manage_records(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Managers and companies only act on requests; submitting is left to
    /// administrators and to employees themselves.
    pub fn can_submit_leave(&self) -> bool {
        matches!(self, Role::Admin | Role::Employee)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "entreprise" | "company" => Ok(Role::Company),
            "employee" => Ok(Role::Employee),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::unknown_variant(
                &s,
                &["admin", "manager", "entreprise", "company", "employee"],
            )
        })
    }
}

/// Company a `Company` user administers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedDepartment {
    pub id: DepartmentId,
    pub name: String,
}

/// Profile of the signed-in account, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    pub role: Role,
    /// Directions a manager is responsible for.
    #[serde(default)]
    pub managed_directions: Vec<String>,
    #[serde(default)]
    pub managed_department: Option<ManagedDepartment>,
}

impl CurrentUser {
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}
