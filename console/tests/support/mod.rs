#![allow(dead_code)]
//! In-process HTTP stand-in for the HR backend.

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use hrdesk_console::{
    config::Config, sections::notifications::AlertSink, state::MemorySessionStore, Console,
};
use hrdesk_core::LeaveNotification;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub const PASSWORD: &str = "secret";

type Shared = Arc<Mutex<StubState>>;

#[derive(Debug, Default)]
pub struct StubState {
    users: HashMap<String, Value>,
    access: HashMap<String, String>,
    refresh: HashMap<String, String>,
    issued: u32,
    next_leave_id: i64,
    pub refresh_calls: u32,
    pub fail_refresh: bool,
    /// Every access token is refused, including freshly refreshed ones.
    pub reject_all_access: bool,
    /// Hit label (e.g. `GET leaves/`) answered with a 500.
    pub fail_hit: Option<String>,
    pub departments: Vec<Value>,
    pub employees: Vec<Value>,
    pub leaves: Vec<Value>,
    pub attendance: Vec<Value>,
    pub notifications: Vec<Value>,
    pub hits: Vec<String>,
}

impl StubState {
    pub fn seeded() -> Self {
        let mut users = HashMap::new();
        for user in [
            json!({"id": 1, "username": "admin", "email": "admin@hr.test", "name": "Root Admin", "role": "admin"}),
            json!({"id": 2, "username": "manager", "email": "manager@hr.test", "name": "Mariam Sow", "role": "manager",
                   "managed_directions": ["Operations"]}),
            json!({"id": 3, "username": "company", "email": "rh@acme.test", "name": "Acme HR", "role": "entreprise",
                   "managed_department": {"id": 10, "name": "Acme"}}),
            json!({"id": 4, "username": "employee", "email": "awa@acme.test", "name": "", "role": "employee"}),
        ] {
            let name = user["username"].as_str().unwrap_or_default().to_string();
            users.insert(name, user);
        }

        Self {
            users,
            next_leave_id: 1,
            departments: vec![
                json!({"id": 10, "name": "Acme", "manager": "Jean Yao", "description": "", "employees_count": 2}),
                json!({"id": 11, "name": "Globex", "manager": null, "description": null, "employees_count": 1}),
            ],
            employees: vec![
                linked(employee(7, "Awa", "Kone", 10, "Acme", "Operations"), 4),
                employee(8, "Marc", "Diallo", 11, "Globex", "Finance"),
                employee(9, "Ines", "Traore", 10, "Acme", "Finance"),
            ],
            attendance: vec![json!({
                "id": 1, "employee": 7, "employee_name": "Awa Kone", "date": "2026-03-02",
                "check_in": "08:00:00", "check_out": "17:00:00", "hours_worked": "9.00", "status": "present"
            })],
            ..Self::default()
        }
    }

    /// Invalidates every access token while keeping refresh tokens valid.
    pub fn expire_access_tokens(&mut self) {
        self.access.clear();
    }

    pub fn hits_for(&self, label: &str) -> usize {
        self.hits.iter().filter(|h| h.as_str() == label).count()
    }

    pub fn leave_status(&self, id: i64) -> Option<String> {
        self.leaves
            .iter()
            .find(|l| l["id"] == id)
            .and_then(|l| l["status"].as_str())
            .map(str::to_string)
    }

    fn issue(&mut self, username: &str) -> (String, String) {
        self.issued += 1;
        let access = format!("access-{}", self.issued);
        let refresh = format!("refresh-{}", self.issued);
        self.access.insert(access.clone(), username.to_string());
        self.refresh.insert(refresh.clone(), username.to_string());
        (access, refresh)
    }
}

pub fn employee(id: i64, first: &str, last: &str, dept: i64, dept_name: &str, direction: &str) -> Value {
    json!({
        "id": id, "first_name": first, "last_name": last,
        "email": format!("{}.{}@hr.test", first.to_lowercase(), last.to_lowercase()),
        "phone": "", "department": dept, "department_name": dept_name, "direction": direction,
        "position": "Analyst", "hire_date": format!("2020-01-{:02}", id), "salary": "350000.00",
        "matricule": format!("M{:04}", id), "cnps": "", "address": "", "status": "active",
        "birth_date": "1990-05-01", "leave_balance": 30, "leaves_pending_this_year": 0
    })
}

fn linked(mut employee: Value, user: i64) -> Value {
    employee["user"] = json!(user);
    employee
}

/// Employee accounts only get their own record and requests back.
fn own_rows(state: &StubState, user: &Value, rows: &[Value], key: &str) -> Vec<Value> {
    if user["role"] != "employee" {
        return rows.to_vec();
    }
    let own: Vec<&Value> = state
        .employees
        .iter()
        .filter(|e| e["user"] == user["id"])
        .map(|e| &e["id"])
        .collect();
    rows.iter()
        .filter(|row| own.contains(&&row[key]))
        .cloned()
        .collect()
}

pub fn reminder(id: i64, kind: &str, days_until_start: i64) -> Value {
    json!({
        "id": id, "employee_name": "Awa Kone", "leave_type_display": "Paid leave",
        "leave_start_date": "2026-03-01", "leave_end_date": "2026-03-05",
        "notification_type": kind, "days_until_start": days_until_start, "is_read": false
    })
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn lock(stub: &Shared) -> MutexGuard<'_, StubState> {
    stub.lock().expect("stub state poisoned")
}

/// Records the hit and resolves the bearer token to its user.
fn authorize(state: &mut StubState, headers: &HeaderMap, hit: String) -> Result<Value, Response> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let user = token
        .filter(|_| !state.reject_all_access)
        .and_then(|t| state.access.get(t))
        .and_then(|name| state.users.get(name))
        .cloned();
    let failing = state.fail_hit.as_deref() == Some(hit.as_str());
    state.hits.push(hit);
    let user = user.ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Given token not valid for any token type"})),
        )
            .into_response()
    })?;
    if failing {
        return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable"));
    }
    Ok(user)
}

macro_rules! guard {
    ($state:expr, $headers:expr, $hit:expr) => {
        match authorize(&mut $state, &$headers, $hit) {
            Ok(user) => user,
            Err(response) => return response,
        }
    };
}

async fn login(State(stub): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&stub);
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let Some(user) = state.users.get(&username).cloned() else {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    };
    if body["password"] != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let (access, refresh) = state.issue(&username);
    Json(json!({ "user": user, "access": access, "refresh": refresh })).into_response()
}

async fn refresh(State(stub): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&stub);
    state.refresh_calls += 1;
    let owner = body["refresh"]
        .as_str()
        .and_then(|t| state.refresh.get(t))
        .cloned();
    match owner {
        Some(username) if !state.fail_refresh => {
            state.issued += 1;
            let access = format!("access-{}", state.issued);
            state.access.insert(access.clone(), username);
            Json(json!({ "access": access })).into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired", "code": "token_not_valid"})),
        )
            .into_response(),
    }
}

async fn list_departments(State(stub): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&stub);
    guard!(state, headers, "GET departments/".to_string());
    Json(state.departments.clone()).into_response()
}

async fn create_department(
    State(stub): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&stub);
    guard!(state, headers, "POST departments/".to_string());
    let name = body["name"].as_str().unwrap_or_default().trim().to_string();
    if state.departments.iter().any(|d| d["name"] == name.as_str()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"name": ["department with this name already exists."]})),
        )
            .into_response();
    }
    let id = state
        .departments
        .iter()
        .filter_map(|d| d["id"].as_i64())
        .max()
        .unwrap_or(0)
        + 1;
    let department = json!({
        "id": id,
        "name": name,
        "manager": body["manager"],
        "description": body["description"],
        "employees_count": 0,
    });
    state.departments.push(department.clone());
    (StatusCode::CREATED, Json(department)).into_response()
}

async fn list_employees(State(stub): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&stub);
    let user = guard!(state, headers, "GET employees/".to_string());
    Json(own_rows(&state, &user, &state.employees, "id")).into_response()
}

async fn list_attendance(State(stub): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&stub);
    guard!(state, headers, "GET attendances/".to_string());
    Json(state.attendance.clone()).into_response()
}

async fn list_leaves(State(stub): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&stub);
    let user = guard!(state, headers, "GET leaves/".to_string());
    let rows = own_rows(&state, &user, &state.leaves, "employee");
    Json(json!({
        "count": rows.len(),
        "next": null,
        "previous": null,
        "results": rows,
    }))
    .into_response()
}

async fn pending_leaves(State(stub): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&stub);
    let user = guard!(state, headers, "GET leaves/pending/".to_string());
    let waiting: &[&str] = match user["role"].as_str() {
        Some("manager") => &["pending"],
        Some("entreprise") => &["manager_approved"],
        _ => &["pending", "manager_approved"],
    };
    let rows: Vec<Value> = state
        .leaves
        .iter()
        .filter(|l| waiting.iter().any(|s| l["status"] == *s))
        .cloned()
        .collect();
    Json(rows).into_response()
}

async fn create_leave(
    State(stub): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&stub);
    guard!(state, headers, "POST leaves/".to_string());
    let parse = |key: &str| {
        body[key]
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    };
    let (Some(start), Some(end)) = (parse("start_date"), parse("end_date")) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"start_date": ["This field is required."]})),
        )
            .into_response();
    };
    if end < start {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"end_date": ["End date must be after start date."]})),
        )
            .into_response();
    }
    let employee_name = state
        .employees
        .iter()
        .find(|e| e["id"] == body["employee"])
        .map(|e| format!("{} {}", e["first_name"].as_str().unwrap_or_default(), e["last_name"].as_str().unwrap_or_default()))
        .unwrap_or_default();
    let id = state.next_leave_id;
    state.next_leave_id += 1;
    let leave = json!({
        "id": id,
        "employee": body["employee"],
        "employee_name": employee_name,
        "leave_type": body["leave_type"],
        "start_date": body["start_date"],
        "end_date": body["end_date"],
        "days_count": (end - start).num_days() + 1,
        "reason": body["reason"],
        "status": "pending",
    });
    state.leaves.push(leave.clone());
    (StatusCode::CREATED, Json(leave)).into_response()
}

async fn decide(stub: Shared, headers: HeaderMap, id: i64, action: &str) -> Response {
    let mut state = lock(&stub);
    let user = guard!(state, headers, format!("POST leaves/{}/{}/", id, action));
    let role = user["role"].as_str().unwrap_or_default().to_string();
    let Some(leave) = state.leaves.iter_mut().find(|l| l["id"] == id) else {
        return error(StatusCode::NOT_FOUND, "Not found.");
    };
    let status = leave["status"].as_str().unwrap_or_default().to_string();
    let next = match (role.as_str(), status.as_str(), action) {
        ("manager", "pending", "approve") => "manager_approved",
        ("entreprise", "manager_approved", "approve") => "approved",
        ("admin", "pending" | "manager_approved", "approve") => "approved",
        ("manager", "pending", "reject")
        | ("entreprise", "manager_approved", "reject")
        | ("admin", "pending" | "manager_approved", "reject") => "rejected",
        _ => {
            return error(
                StatusCode::BAD_REQUEST,
                "This request cannot be processed at its current stage",
            )
        }
    };
    leave["status"] = json!(next);
    Json(leave.clone()).into_response()
}

async fn approve_leave(
    State(stub): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    decide(stub, headers, id, "approve").await
}

async fn reject_leave(
    State(stub): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    decide(stub, headers, id, "reject").await
}

async fn delete_leave(
    State(stub): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let mut state = lock(&stub);
    guard!(state, headers, format!("DELETE leaves/{}/", id));
    match state.leave_status(id).as_deref() {
        None => error(StatusCode::NOT_FOUND, "Not found."),
        Some("approved") => error(
            StatusCode::BAD_REQUEST,
            "Approved leave requests cannot be deleted",
        ),
        Some(_) => {
            state.leaves.retain(|l| l["id"] != id);
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

async fn list_notifications(State(stub): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&stub);
    guard!(state, headers, "GET notifications/".to_string());
    let unread = state
        .notifications
        .iter()
        .filter(|n| n["is_read"] == false)
        .count();
    Json(json!({ "notifications": state.notifications, "unread_count": unread })).into_response()
}

async fn mark_read(
    State(stub): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let mut state = lock(&stub);
    guard!(state, headers, format!("POST notifications/{}/mark_read/", id));
    match state.notifications.iter_mut().find(|n| n["id"] == id) {
        Some(n) => {
            n["is_read"] = json!(true);
            Json(json!({"status": "ok"})).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Not found."),
    }
}

async fn mark_all_read(State(stub): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&stub);
    guard!(state, headers, "POST notifications/mark_all_read/".to_string());
    for n in state.notifications.iter_mut() {
        n["is_read"] = json!(true);
    }
    Json(json!({"status": "ok"})).into_response()
}

fn router(shared: Shared) -> Router {
    let api = Router::new()
        .route("/auth/login/", post(login))
        .route("/token/refresh/", post(refresh))
        .route("/departments/", get(list_departments).post(create_department))
        .route("/employees/", get(list_employees))
        .route("/attendances/", get(list_attendance))
        .route("/leaves/", get(list_leaves).post(create_leave))
        .route("/leaves/pending/", get(pending_leaves))
        .route("/leaves/{id}/", delete(delete_leave))
        .route("/leaves/{id}/approve/", post(approve_leave))
        .route("/leaves/{id}/reject/", post(reject_leave))
        .route("/notifications/", get(list_notifications))
        .route("/notifications/mark_all_read/", post(mark_all_read))
        .route("/notifications/{id}/mark_read/", post(mark_read));
    Router::new().nest("/api", api).with_state(shared)
}

pub struct Stub {
    pub base_url: String,
    shared: Shared,
}

impl Stub {
    pub async fn spawn() -> Self {
        Self::spawn_with(StubState::seeded()).await
    }

    pub async fn spawn_with(state: StubState) -> Self {
        let shared = Arc::new(Mutex::new(state));
        let app = router(shared.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve stub backend");
        });
        Self {
            base_url: format!("http://{}/api/", addr),
            shared,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, StubState> {
        lock(&self.shared)
    }

    pub fn config(&self) -> Config {
        Config::for_base_url(&self.base_url).expect("stub config")
    }

    pub fn console(&self) -> Console {
        Console::with_session_store(&self.config(), Box::new(MemorySessionStore::new()))
            .expect("build console")
    }

    pub async fn signed_in(&self, username: &str) -> Console {
        let console = self.console();
        console.login(username, PASSWORD).await.expect("login");
        console
    }
}

/// Alert sink that only remembers what it was told.
#[derive(Debug, Default)]
pub struct RecordingSink {
    alerts: Mutex<Vec<i64>>,
    badges: Mutex<Vec<u32>>,
}

impl RecordingSink {
    pub fn alerted(&self) -> Vec<i64> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn badges(&self) -> Vec<u32> {
        self.badges.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn alert(&self, reminder: &LeaveNotification) {
        self.alerts.lock().unwrap().push(reminder.id.get());
    }

    async fn badge(&self, unread: u32) {
        self.badges.lock().unwrap().push(unread);
    }
}
