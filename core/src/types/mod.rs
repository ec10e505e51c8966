pub mod id;

pub use id::{AttendanceId, DepartmentId, EmployeeId, LeaveId, NotificationId, UserId};
