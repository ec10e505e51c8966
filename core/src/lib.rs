//! Domain model and pure business rules for the HR desk console.
//!
//! Nothing in this crate performs I/O: records are decoded from the backend's
//! wire format, the leave approval gate is a closed table over [`Role`] and
//! [`LeaveStatus`], and reminder de-duplication works on plain snapshots.

pub mod dashboard;
pub mod gate;
pub mod models;
pub mod reminders;
pub mod types;
pub mod validation;

pub use gate::{LeaveAction, RowActions, RowHint, Transition, TransitionDenied};
pub use models::{
    attendance::{AttendanceForm, AttendanceRecord, AttendanceStatus},
    department::{Department, DepartmentForm},
    employee::{Employee, EmployeeForm, EmployeeStatus},
    leave::{CreateLeaveRequest, LeaveRequest, LeaveStatus, LeaveType},
    notification::{LeaveNotification, NotificationFeed, NotificationType, TonePattern},
    user::{CurrentUser, ManagedDepartment, Role},
};
pub use types::{AttendanceId, DepartmentId, EmployeeId, LeaveId, NotificationId, UserId};
pub use validation::ValidationError;
