//! Top-level controller tying the client, the store and the reminder poller
//! to one signed-in session.

use chrono_tz::Tz;
use hrdesk_core::{dashboard::DashboardStats, CurrentUser};
use std::sync::Arc;
use std::time::Duration;

use crate::api::{ApiClient, ApiError, LoginRequest};
use crate::config::Config;
use crate::sections::{
    attendance::AttendanceSection,
    dashboard,
    departments::DepartmentsSection,
    employees::EmployeesSection,
    leaves::LeavesViewModel,
    notifications::{AlertSink, NotificationCenter, PollerHandle},
};
use crate::state::{
    session::{FileSessionStore, SessionManager, SessionStore},
    store::AppStore,
};

pub struct Console {
    api: Arc<ApiClient>,
    store: Arc<AppStore>,
    time_zone: Tz,
    poll_interval: Duration,
    center: Option<Arc<NotificationCenter>>,
    poller: Option<PollerHandle>,
}

impl Console {
    /// Builds a console whose session lives in the configured session file.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::with_session_store(config, Box::new(FileSessionStore::new(&config.session_file)))
    }

    pub fn with_session_store(
        config: &Config,
        sessions: Box<dyn SessionStore>,
    ) -> Result<Self, ApiError> {
        let session = Arc::new(SessionManager::new(sessions));
        let api = Arc::new(ApiClient::new(config, session)?);
        Ok(Self {
            store: Arc::new(AppStore::new(api.clone())),
            api,
            time_zone: config.time_zone,
            poll_interval: config.poll_interval,
            center: None,
            poller: None,
        })
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn store(&self) -> &Arc<AppStore> {
        &self.store
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Picks up a session saved by an earlier run.
    pub async fn resume(&self) -> Result<Option<CurrentUser>, ApiError> {
        let session = self
            .api
            .session()
            .restore()
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        Ok(session.map(|s| s.user))
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<CurrentUser, ApiError> {
        self.api
            .login(LoginRequest {
                username: username.trim().to_string(),
                password: password.to_string(),
            })
            .await
    }

    /// Stops reminders, forgets the session and drops cached records.
    pub async fn logout(&mut self) -> Result<(), ApiError> {
        self.stop_notifications().await;
        self.store.clear().await;
        self.api.logout().await
    }

    pub async fn viewer(&self) -> Result<CurrentUser, ApiError> {
        self.api
            .current_user()
            .await
            .ok_or(ApiError::NotAuthenticated)
    }

    /// Viewer allowed into the administration views.
    pub async fn admin_viewer(&self) -> Result<CurrentUser, ApiError> {
        let user = self.viewer().await?;
        if user.role.uses_admin_console() {
            Ok(user)
        } else {
            Err(ApiError::Rejected {
                status: 403,
                message: "Employee accounts only have access to their own leave requests".into(),
            })
        }
    }

    pub async fn reload(&self) -> Result<(), ApiError> {
        self.store.reload().await
    }

    pub fn leaves(&self) -> LeavesViewModel {
        LeavesViewModel::new(self.api.clone(), self.store.clone())
    }

    pub fn employees(&self) -> EmployeesSection {
        EmployeesSection::new(self.api.clone(), self.store.clone(), self.time_zone)
    }

    pub fn departments(&self) -> DepartmentsSection {
        DepartmentsSection::new(self.api.clone(), self.store.clone())
    }

    pub fn attendance(&self) -> AttendanceSection {
        AttendanceSection::new(self.api.clone(), self.store.clone())
    }

    pub async fn dashboard(&self) -> DashboardStats {
        dashboard::stats(&self.store, &self.time_zone).await
    }

    /// Notification center for the current session, created on first use.
    pub fn notifications(&mut self, sink: Arc<dyn AlertSink>) -> Arc<NotificationCenter> {
        self.center
            .get_or_insert_with(|| {
                Arc::new(NotificationCenter::new(
                    self.api.clone(),
                    sink,
                    self.store.clone(),
                ))
            })
            .clone()
    }

    /// Starts the background reminder poller for roles that have the bell.
    ///
    /// Returns `false` when the viewer's role gets no reminders.
    pub async fn start_notifications(&mut self, sink: Arc<dyn AlertSink>) -> Result<bool, ApiError> {
        let user = self.viewer().await?;
        if !user.role.receives_reminders() {
            tracing::debug!(role = %user.role, "Role has no reminder bell");
            return Ok(false);
        }
        if self.poller.as_ref().is_some_and(PollerHandle::is_running) {
            return Ok(true);
        }
        let center = self.notifications(sink);
        self.poller = Some(PollerHandle::spawn(center, self.poll_interval));
        Ok(true)
    }

    pub fn notifications_running(&self) -> bool {
        self.poller.as_ref().is_some_and(PollerHandle::is_running)
    }

    pub async fn stop_notifications(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.shutdown().await;
        }
        self.center = None;
    }
}
