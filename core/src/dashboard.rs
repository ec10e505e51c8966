//! Derived views over the cached collections: scope filtering, list filters
//! and the dashboard summary.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::attendance::AttendanceRecord;
use crate::models::department::Department;
use crate::models::employee::Employee;
use crate::models::leave::{LeaveRequest, LeaveStatus};
use crate::models::user::{CurrentUser, Role};
use crate::types::DepartmentId;

const RECENT_LIMIT: usize = 5;

/// Restricts the employee list to what the viewer is responsible for.
///
/// Companies see the staff of their managed department, managers the staff
/// of their managed directions (nobody when they have none). Administrators
/// and employees get the list unchanged.
pub fn scope_employees(user: &CurrentUser, employees: Vec<Employee>) -> Vec<Employee> {
    match user.role {
        Role::Company => match &user.managed_department {
            Some(dept) => employees
                .into_iter()
                .filter(|e| e.department_name == dept.name || e.department_id == Some(dept.id))
                .collect(),
            None => employees,
        },
        Role::Manager => {
            if user.managed_directions.is_empty() {
                return Vec::new();
            }
            employees
                .into_iter()
                .filter(|e| user.managed_directions.iter().any(|d| d == &e.direction))
                .collect()
        }
        Role::Admin | Role::Employee => employees,
    }
}

/// Status tab on the leave list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaveFilter {
    #[default]
    All,
    Status(LeaveStatus),
}

impl LeaveFilter {
    pub fn matches(&self, leave: &LeaveRequest) -> bool {
        match self {
            LeaveFilter::All => true,
            LeaveFilter::Status(status) => leave.status == *status,
        }
    }
}

impl std::str::FromStr for LeaveFilter {
    type Err = crate::validation::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(LeaveFilter::All);
        }
        s.parse().map(LeaveFilter::Status)
    }
}

pub fn filter_leaves(leaves: &[LeaveRequest], filter: LeaveFilter) -> Vec<&LeaveRequest> {
    leaves.iter().filter(|l| filter.matches(l)).collect()
}

/// Requests still waiting on a decision.
pub fn pending_queue(leaves: &[LeaveRequest]) -> Vec<&LeaveRequest> {
    leaves
        .iter()
        .filter(|l| l.status.awaits_decision())
        .collect()
}

/// Employee list search box plus department drop-down.
pub fn search_employees<'a>(
    employees: &'a [Employee],
    query: &str,
    department: Option<DepartmentId>,
) -> Vec<&'a Employee> {
    employees
        .iter()
        .filter(|e| department.map_or(true, |id| e.department_id == Some(id)))
        .filter(|e| e.matches(query))
        .collect()
}

/// The employee record behind a self-service account.
///
/// Looks for the linked account first, then the same email address, then an
/// email containing the username.
pub fn own_profile<'a>(user: &CurrentUser, employees: &'a [Employee]) -> Option<&'a Employee> {
    employees
        .iter()
        .find(|e| e.user_id == Some(user.id))
        .or_else(|| {
            (!user.email.is_empty())
                .then(|| employees.iter().find(|e| e.email.eq_ignore_ascii_case(&user.email)))
                .flatten()
        })
        .or_else(|| {
            let username = user.username.trim().to_lowercase();
            (!username.is_empty())
                .then(|| employees.iter().find(|e| e.email.to_lowercase().contains(&username)))
                .flatten()
        })
}

/// Leave counters shown on an employee's own profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeaveSummary {
    pub total: usize,
    pub awaiting_decision: usize,
    pub approved: usize,
    pub rejected: usize,
    pub balance: u32,
    pub pending_days: u32,
    /// Paid days that can still be requested.
    pub available: u32,
}

impl LeaveSummary {
    pub fn compute(employee: &Employee, leaves: &[LeaveRequest]) -> Self {
        let own: Vec<&LeaveRequest> = leaves
            .iter()
            .filter(|l| l.employee_id == employee.id)
            .collect();
        let count = |status: LeaveStatus| own.iter().filter(|l| l.status == status).count();
        LeaveSummary {
            total: own.len(),
            awaiting_decision: own.iter().filter(|l| l.status.awaits_decision()).count(),
            approved: count(LeaveStatus::Approved),
            rejected: count(LeaveStatus::Rejected),
            balance: employee.leave_balance,
            pending_days: employee.pending_leave_days,
            available: employee.leave_balance.saturating_sub(employee.pending_leave_days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_employees: usize,
    pub total_departments: usize,
    pub present_today: usize,
    pub on_leave_today: usize,
    pub recent_employees: Vec<Employee>,
    pub recent_leaves: Vec<LeaveRequest>,
}

impl DashboardStats {
    pub fn compute(
        employees: &[Employee],
        departments: &[Department],
        leaves: &[LeaveRequest],
        attendance: &[AttendanceRecord],
        today: NaiveDate,
    ) -> Self {
        let present_today = attendance
            .iter()
            .filter(|a| a.date == today && a.status.is_on_site())
            .count();
        let on_leave_today = leaves.iter().filter(|l| l.is_approved_on(today)).count();

        let mut recent_employees = employees.to_vec();
        recent_employees.sort_by(|a, b| b.hire_date.cmp(&a.hire_date));
        recent_employees.truncate(RECENT_LIMIT);

        let mut recent_leaves = leaves.to_vec();
        recent_leaves.sort_by(|a, b| (b.start_date, b.id).cmp(&(a.start_date, a.id)));
        recent_leaves.truncate(RECENT_LIMIT);

        DashboardStats {
            total_employees: employees.len(),
            total_departments: departments.len(),
            present_today,
            on_leave_today,
            recent_employees,
            recent_leaves,
        }
    }
}
