//! Role-aware leave approval gate.
//!
//! The table below is the only place that decides which buttons a row shows
//! and which actions the console lets through to the backend:
//!
//! | role     | pending                     | manager_approved         |
//! |----------|-----------------------------|--------------------------|
//! | admin    | approve→approved, reject    | approve→approved, reject |
//! | manager  | approve→manager_approved, reject | none                |
//! | company  | none (awaiting manager)     | approve→approved, reject |
//! | employee | none                        | none                     |
//!
//! Terminal statuses offer nothing to anyone. Delete is outside the table:
//! it is always offered and the backend decides.

use std::fmt;
use thiserror::Error;

use crate::models::leave::LeaveStatus;
use crate::models::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaveAction {
    Approve,
    Reject,
}

impl LeaveAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveAction::Approve => "approve",
            LeaveAction::Reject => "reject",
        }
    }
}

impl fmt::Display for LeaveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An offered action and the status it leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub action: LeaveAction,
    pub to: LeaveStatus,
}

const fn approve(to: LeaveStatus) -> Transition {
    Transition {
        action: LeaveAction::Approve,
        to,
    }
}

const REJECT: Transition = Transition {
    action: LeaveAction::Reject,
    to: LeaveStatus::Rejected,
};

const FINAL_SIGN_OFF: &[Transition] = &[approve(LeaveStatus::Approved), REJECT];
const MANAGER_SIGN_OFF: &[Transition] = &[approve(LeaveStatus::ManagerApproved), REJECT];
const NONE: &[Transition] = &[];

/// Transitions `role` may perform on a request in `status`.
pub fn transitions(role: Role, status: LeaveStatus) -> &'static [Transition] {
    use LeaveStatus::*;
    match role {
        Role::Admin => match status {
            Pending | ManagerApproved => FINAL_SIGN_OFF,
            Approved | Rejected => NONE,
        },
        Role::Manager => match status {
            Pending => MANAGER_SIGN_OFF,
            ManagerApproved | Approved | Rejected => NONE,
        },
        Role::Company => match status {
            ManagerApproved => FINAL_SIGN_OFF,
            Pending | Approved | Rejected => NONE,
        },
        Role::Employee => NONE,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{role} cannot {action} a {status} leave request")]
pub struct TransitionDenied {
    pub role: Role,
    pub status: LeaveStatus,
    pub action: LeaveAction,
}

/// Returns the status `action` leads to, or refuses it.
pub fn check(
    role: Role,
    status: LeaveStatus,
    action: LeaveAction,
) -> Result<LeaveStatus, TransitionDenied> {
    transitions(role, status)
        .iter()
        .find(|t| t.action == action)
        .map(|t| t.to)
        .ok_or(TransitionDenied {
            role,
            status,
            action,
        })
}

/// Informational text shown instead of buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowHint {
    AwaitingManager,
    ManagerValidated,
}

impl RowHint {
    pub fn label(&self) -> &'static str {
        match self {
            RowHint::AwaitingManager => "Awaiting manager validation",
            RowHint::ManagerValidated => "Validated by manager",
        }
    }
}

pub fn hint(role: Role, status: LeaveStatus) -> Option<RowHint> {
    match (role, status) {
        (Role::Company, LeaveStatus::Pending) => Some(RowHint::AwaitingManager),
        (Role::Company, LeaveStatus::ManagerApproved) => Some(RowHint::ManagerValidated),
        _ => None,
    }
}

/// Everything a leave row renders for the current viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowActions {
    pub transitions: &'static [Transition],
    pub hint: Option<RowHint>,
    pub can_delete: bool,
}

impl RowActions {
    pub fn for_row(role: Role, status: LeaveStatus) -> Self {
        RowActions {
            transitions: transitions(role, status),
            hint: hint(role, status),
            can_delete: true,
        }
    }

    pub fn offers(&self, action: LeaveAction) -> bool {
        self.transitions.iter().any(|t| t.action == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LeaveAction::*;
    use LeaveStatus::*;

    fn actions(role: Role, status: LeaveStatus) -> Vec<(LeaveAction, LeaveStatus)> {
        transitions(role, status)
            .iter()
            .map(|t| (t.action, t.to))
            .collect()
    }

    #[test]
    fn table_matches_for_every_role_and_status() {
        let expected: [(Role, [Vec<(LeaveAction, LeaveStatus)>; 4]); 4] = [
            (
                Role::Admin,
                [
                    vec![(Approve, Approved), (Reject, Rejected)],
                    vec![(Approve, Approved), (Reject, Rejected)],
                    vec![],
                    vec![],
                ],
            ),
            (
                Role::Manager,
                [
                    vec![(Approve, ManagerApproved), (Reject, Rejected)],
                    vec![],
                    vec![],
                    vec![],
                ],
            ),
            (
                Role::Company,
                [
                    vec![],
                    vec![(Approve, Approved), (Reject, Rejected)],
                    vec![],
                    vec![],
                ],
            ),
            (Role::Employee, [vec![], vec![], vec![], vec![]]),
        ];

        for (role, row) in expected {
            for (status, want) in LeaveStatus::ALL.into_iter().zip(row) {
                assert_eq!(actions(role, status), want, "{role} on {status}");
            }
        }
    }

    #[test]
    fn every_offered_transition_moves_forward() {
        for role in Role::ALL {
            for status in LeaveStatus::ALL {
                for t in transitions(role, status) {
                    assert!(status.can_advance_to(t.to), "{role}: {status} -> {}", t.to);
                }
            }
        }
    }

    #[test]
    fn check_returns_next_status_or_denial() {
        assert_eq!(check(Role::Manager, Pending, Approve), Ok(ManagerApproved));
        assert_eq!(check(Role::Company, ManagerApproved, Reject), Ok(Rejected));
        let denied = check(Role::Company, Pending, Approve).unwrap_err();
        assert_eq!(denied.role, Role::Company);
        assert_eq!(
            denied.to_string(),
            "entreprise cannot approve a pending leave request"
        );
        assert!(check(Role::Admin, Approved, Reject).is_err());
    }

    #[test]
    fn company_rows_carry_hints() {
        assert_eq!(hint(Role::Company, Pending), Some(RowHint::AwaitingManager));
        assert_eq!(
            hint(Role::Company, ManagerApproved),
            Some(RowHint::ManagerValidated)
        );
        assert_eq!(hint(Role::Manager, Pending), None);
    }

    #[test]
    fn delete_is_always_offered() {
        for role in Role::ALL {
            for status in LeaveStatus::ALL {
                assert!(RowActions::for_row(role, status).can_delete);
            }
        }
        assert!(!RowActions::for_row(Role::Admin, Approved).offers(Approve));
    }
}
