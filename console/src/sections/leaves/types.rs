use chrono::NaiveDate;
use hrdesk_core::{
    validation::rules, CreateLeaveRequest, Employee, EmployeeId, LeaveRequest, LeaveType,
    RowActions, Role, ValidationError,
};
use serde::Serialize;

/// A leave request with what the current viewer may do to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveRow {
    pub leave: LeaveRequest,
    pub actions: RowActions,
}

impl LeaveRow {
    pub fn new(leave: LeaveRequest, viewer: Role) -> Self {
        let actions = RowActions::for_row(viewer, leave.status);
        Self { leave, actions }
    }

    pub fn period_label(&self) -> String {
        if self.leave.start_date == self.leave.end_date {
            self.leave.start_date.to_string()
        } else {
            format!("{} to {}", self.leave.start_date, self.leave.end_date)
        }
    }

    /// Button captions, or the informational hint when there are none.
    pub fn actions_label(&self) -> String {
        if !self.actions.transitions.is_empty() {
            return self
                .actions
                .transitions
                .iter()
                .map(|t| t.action.as_str())
                .collect::<Vec<_>>()
                .join("/");
        }
        self.actions
            .hint
            .map(|h| h.label().to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Leave submission as typed in by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveForm {
    pub employee: EmployeeId,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl LeaveForm {
    /// Validates the form into a request body.
    ///
    /// Paid leave is checked against the employee's remaining balance when
    /// the employee is known.
    pub fn to_payload(
        &self,
        employee: Option<&Employee>,
    ) -> Result<CreateLeaveRequest, ValidationError> {
        let payload = CreateLeaveRequest::new(
            self.employee,
            self.leave_type,
            self.start_date,
            self.end_date,
            self.reason.clone(),
        )?;
        if let Some(employee) = employee.filter(|_| self.leave_type.counts_against_allowance()) {
            rules::check_paid_leave_balance(
                payload.days(),
                employee.leave_balance,
                employee.pending_leave_days,
            )?;
        }
        Ok(payload)
    }
}
