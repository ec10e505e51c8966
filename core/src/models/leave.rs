use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::string_or_empty;
use crate::types::{EmployeeId, LeaveId};
use crate::validation::{rules, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Paid,
    Sick,
    Unpaid,
    Parental,
    Other,
}

impl LeaveType {
    pub const ALL: [LeaveType; 5] = [
        LeaveType::Paid,
        LeaveType::Sick,
        LeaveType::Unpaid,
        LeaveType::Parental,
        LeaveType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Paid => "paid",
            LeaveType::Sick => "sick",
            LeaveType::Unpaid => "unpaid",
            LeaveType::Parental => "parental",
            LeaveType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeaveType::Paid => "Paid leave",
            LeaveType::Sick => "Sick leave",
            LeaveType::Unpaid => "Unpaid leave",
            LeaveType::Parental => "Parental leave",
            LeaveType::Other => "Other",
        }
    }

    /// Only paid leave counts against the annual allowance.
    pub fn counts_against_allowance(&self) -> bool {
        matches!(self, LeaveType::Paid)
    }
}

impl FromStr for LeaveType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeaveType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::Invalid(format!("unknown leave type: {}", s)))
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a leave request.
///
/// `pending → manager_approved → approved`, with `rejected` reachable from
/// either non-terminal state. Nothing returns to `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    #[default]
    Pending,
    ManagerApproved,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub const ALL: [LeaveStatus; 4] = [
        LeaveStatus::Pending,
        LeaveStatus::ManagerApproved,
        LeaveStatus::Approved,
        LeaveStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::ManagerApproved => "manager_approved",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::ManagerApproved => "Validated by manager",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Rejected)
    }

    /// Still waiting on someone: `pending` or `manager_approved`.
    pub fn awaits_decision(&self) -> bool {
        !self.is_terminal()
    }

    /// Position along the approval chain. `Rejected` shares the final rank
    /// with `Approved` because both close the request.
    pub fn rank(&self) -> u8 {
        match self {
            LeaveStatus::Pending => 0,
            LeaveStatus::ManagerApproved => 1,
            LeaveStatus::Approved | LeaveStatus::Rejected => 2,
        }
    }

    /// Whether moving from `self` to `next` respects the forward-only
    /// lifecycle.
    pub fn can_advance_to(&self, next: LeaveStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }
}

impl FromStr for LeaveStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeaveStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::Invalid(format!("unknown leave status: {}", s)))
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leave request as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveRecord {
    pub id: LeaveId,
    pub employee: EmployeeId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub employee_name: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub days_count: Option<i64>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub reason: String,
    #[serde(default)]
    pub status: LeaveStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: LeaveId,
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: u32,
    pub reason: String,
    pub status: LeaveStatus,
}

impl From<LeaveRecord> for LeaveRequest {
    fn from(record: LeaveRecord) -> Self {
        let days = record
            .days_count
            .and_then(|count| u32::try_from(count).ok())
            .filter(|count| *count > 0)
            .unwrap_or_else(|| {
                rules::inclusive_days(record.start_date, record.end_date).unwrap_or(0)
            });
        LeaveRequest {
            id: record.id,
            employee_id: record.employee,
            employee_name: record.employee_name,
            leave_type: record.leave_type,
            start_date: record.start_date,
            end_date: record.end_date,
            days,
            reason: record.reason,
            status: record.status,
        }
    }
}

impl LeaveRequest {
    /// True when `day` falls inside the requested range, bounds included.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    pub fn is_approved_on(&self, day: NaiveDate) -> bool {
        self.status == LeaveStatus::Approved && self.covers(day)
    }
}

/// Body of `POST /leaves/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateLeaveRequest {
    pub employee: EmployeeId,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl CreateLeaveRequest {
    /// Builds a submission, refusing an end date before the start date.
    pub fn new(
        employee: EmployeeId,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        rules::validate_leave_dates(start_date, end_date)?;
        Ok(Self {
            employee,
            leave_type,
            start_date,
            end_date,
            reason: reason.into().trim().to_string(),
        })
    }

    pub fn days(&self) -> u32 {
        rules::inclusive_days(self.start_date, self.end_date).unwrap_or(0)
    }
}
