use chrono::NaiveDate;
use hrdesk_console::{sections::leaves::LeaveForm, ApiError};
use hrdesk_core::{
    dashboard::LeaveFilter, EmployeeId, LeaveAction, LeaveId, LeaveStatus, LeaveType, RowHint,
};

mod support;

use support::Stub;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn paid_leave(start: NaiveDate, end: NaiveDate) -> LeaveForm {
    LeaveForm {
        employee: EmployeeId::new(7),
        leave_type: LeaveType::Paid,
        start_date: start,
        end_date: end,
        reason: "  Family visit ".into(),
    }
}

#[tokio::test]
async fn test_leave_goes_through_manager_then_company() {
    let stub = Stub::spawn().await;

    let employee = stub.signed_in("employee").await;
    employee.reload().await.unwrap();
    employee
        .leaves()
        .submit(paid_leave(date(2026, 3, 1), date(2026, 3, 5)))
        .await
        .unwrap();
    let submitted = employee.store().leaves().await;
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].status, LeaveStatus::Pending);
    assert_eq!(submitted[0].days, 5);
    assert_eq!(submitted[0].reason, "Family visit");
    let id = submitted[0].id;

    let manager = stub.signed_in("manager").await;
    manager.reload().await.unwrap();
    let queue = manager.leaves().queue().await.unwrap();
    assert_eq!(queue.len(), 1);
    assert!(queue[0].actions.offers(LeaveAction::Approve));
    assert!(queue[0].actions.offers(LeaveAction::Reject));
    assert_eq!(
        manager.leaves().approve(id).await.unwrap(),
        LeaveStatus::ManagerApproved
    );
    assert_eq!(
        manager.store().leave(id).await.unwrap().status,
        LeaveStatus::ManagerApproved
    );
    let queue = manager.leaves().queue().await.unwrap();
    assert_eq!(queue.len(), 1);
    assert!(queue[0].actions.transitions.is_empty());

    let company = stub.signed_in("company").await;
    company.reload().await.unwrap();
    let rows = company.leaves().rows(LeaveFilter::All).await.unwrap();
    assert_eq!(rows[0].actions.hint, Some(RowHint::ManagerValidated));
    assert!(rows[0].actions.offers(LeaveAction::Approve));
    assert_eq!(
        company.leaves().approve(id).await.unwrap(),
        LeaveStatus::Approved
    );
    assert_eq!(stub.state().leave_status(id.get()).as_deref(), Some("approved"));

    let admin = stub.signed_in("admin").await;
    admin.reload().await.unwrap();
    let rows = admin
        .leaves()
        .rows(LeaveFilter::Status(LeaveStatus::Approved))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].actions.transitions.is_empty());
    assert!(rows[0].actions.can_delete);
}

#[tokio::test]
async fn test_company_cannot_skip_manager_validation() {
    let stub = Stub::spawn().await;
    let employee = stub.signed_in("employee").await;
    employee.reload().await.unwrap();
    employee
        .leaves()
        .submit(paid_leave(date(2026, 4, 6), date(2026, 4, 7)))
        .await
        .unwrap();

    let company = stub.signed_in("company").await;
    company.reload().await.unwrap();
    let rows = company.leaves().rows(LeaveFilter::All).await.unwrap();
    assert_eq!(rows[0].actions.hint, Some(RowHint::AwaitingManager));
    assert!(rows[0].actions.transitions.is_empty());

    let err = company.leaves().approve(LeaveId::new(1)).await.unwrap_err();
    assert!(matches!(err, ApiError::Denied(_)));
    // Refused locally, nothing reached the backend
    assert_eq!(stub.state().hits_for("POST leaves/1/approve/"), 0);
    assert_eq!(stub.state().leave_status(1).as_deref(), Some("pending"));
}

#[tokio::test]
async fn test_manager_rejection_is_final() {
    let stub = Stub::spawn().await;
    let employee = stub.signed_in("employee").await;
    employee.reload().await.unwrap();
    employee
        .leaves()
        .submit(paid_leave(date(2026, 5, 4), date(2026, 5, 4)))
        .await
        .unwrap();

    let manager = stub.signed_in("manager").await;
    manager.reload().await.unwrap();
    let id = LeaveId::new(1);
    assert_eq!(
        manager.leaves().reject(id).await.unwrap(),
        LeaveStatus::Rejected
    );
    let err = manager.leaves().approve(id).await.unwrap_err();
    assert!(matches!(err, ApiError::Denied(_)));
}

#[tokio::test]
async fn test_deleting_approved_leave_is_refused_and_store_unchanged() {
    let stub = Stub::spawn().await;
    stub.state().leaves.push(serde_json::json!({
        "id": 42, "employee": 7, "employee_name": "Awa Kone", "leave_type": "paid",
        "start_date": "2026-03-01", "end_date": "2026-03-05", "days_count": 5,
        "reason": "", "status": "approved"
    }));

    let admin = stub.signed_in("admin").await;
    admin.reload().await.unwrap();
    let before = admin.store().leaves().await;

    let err = admin.leaves().delete(LeaveId::new(42)).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Validation("Approved leave requests cannot be deleted".into())
    );
    assert_eq!(admin.store().leaves().await, before);
    assert_eq!(stub.state().leave_status(42).as_deref(), Some("approved"));
}

#[tokio::test]
async fn test_deleting_pending_leave_reloads_store() {
    let stub = Stub::spawn().await;
    let employee = stub.signed_in("employee").await;
    employee.reload().await.unwrap();
    employee
        .leaves()
        .submit(paid_leave(date(2026, 6, 1), date(2026, 6, 2)))
        .await
        .unwrap();

    let admin = stub.signed_in("admin").await;
    admin.reload().await.unwrap();
    admin.leaves().delete(LeaveId::new(1)).await.unwrap();
    assert!(admin.store().leaves().await.is_empty());
}

#[tokio::test]
async fn test_submit_rejects_reversed_dates_without_calling_backend() {
    let stub = Stub::spawn().await;
    let employee = stub.signed_in("employee").await;
    employee.reload().await.unwrap();
    let err = employee
        .leaves()
        .submit(paid_leave(date(2026, 3, 5), date(2026, 3, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Local(_)));
    assert_eq!(stub.state().hits_for("POST leaves/"), 0);
}

#[tokio::test]
async fn test_submit_checks_paid_leave_balance() {
    let stub = Stub::spawn().await;
    stub.state().employees[0]["leaves_pending_this_year"] = serde_json::json!(28);
    let employee = stub.signed_in("employee").await;
    employee.reload().await.unwrap();
    let err = employee
        .leaves()
        .submit(paid_leave(date(2026, 3, 1), date(2026, 3, 5)))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Local(_)));
    assert!(employee.store().leaves().await.is_empty());
}

#[tokio::test]
async fn test_employee_follows_own_request_through_manager_step() {
    let stub = Stub::spawn().await;
    stub.state().leaves.push(serde_json::json!({
        "id": 50, "employee": 8, "employee_name": "Marc Diallo", "leave_type": "sick",
        "start_date": "2026-02-02", "end_date": "2026-02-03", "days_count": 2,
        "reason": "", "status": "pending"
    }));
    stub.state().employees[0]["leaves_pending_this_year"] = serde_json::json!(5);

    let employee = stub.signed_in("employee").await;
    employee.reload().await.unwrap();
    employee
        .leaves()
        .submit(paid_leave(date(2026, 3, 2), date(2026, 3, 6)))
        .await
        .unwrap();

    let own = employee.leaves().own(LeaveFilter::All).await.unwrap();
    assert_eq!(own.employee.id, EmployeeId::new(7));
    assert_eq!(own.rows.len(), 1);
    assert_eq!(own.rows[0].leave.status, LeaveStatus::Pending);
    assert!(own.rows[0].actions.transitions.is_empty());
    assert_eq!(own.summary.balance, 30);
    assert_eq!(own.summary.pending_days, 5);
    assert_eq!(own.summary.available, 25);
    let id = own.rows[0].leave.id;

    let manager = stub.signed_in("manager").await;
    manager.reload().await.unwrap();
    manager.leaves().approve(id).await.unwrap();

    employee.reload().await.unwrap();
    // The other employee's request never reaches this account
    assert_eq!(employee.store().leaves().await.len(), 1);
    let own = employee.leaves().own(LeaveFilter::All).await.unwrap();
    assert_eq!(own.rows[0].leave.status, LeaveStatus::ManagerApproved);
    assert_eq!(own.summary.awaiting_decision, 1);
    assert_eq!(own.summary.approved, 0);
    let approved = employee
        .leaves()
        .own("approved".parse().unwrap())
        .await
        .unwrap();
    assert!(approved.rows.is_empty());
}
