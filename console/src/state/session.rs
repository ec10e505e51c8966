//! Signed-in session: tokens plus the user profile returned at login.

use async_trait::async_trait;
use hrdesk_core::CurrentUser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::utils::token::{decode_jti, mask_secret};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access: String,
    pub refresh: String,
    pub user: CurrentUser,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access", &mask_secret(&self.access))
            .field("refresh", &mask_secret(&self.refresh))
            .field("user", &self.user.username)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the session survives between runs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, SessionError>;
    async fn save(&self, session: &Session) -> Result<(), SessionError>;
    async fn clear(&self) -> Result<(), SessionError>;
}

/// Keeps nothing across runs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.slot.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.slot.write().await = None;
        Ok(())
    }
}

/// JSON file on disk, the terminal counterpart of browser local storage.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, SessionError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        let body = serde_json::to_vec_pretty(session).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| self.io_error(e))
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

/// In-memory view of the session backed by a [`SessionStore`].
///
/// Every change is written through so a later run picks it up.
pub struct SessionManager {
    current: RwLock<Option<Session>>,
    store: Box<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        Self {
            current: RwLock::new(None),
            store,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySessionStore::new()))
    }

    /// Loads a persisted session, if any. A corrupt file is discarded.
    pub async fn restore(&self) -> Result<Option<Session>, SessionError> {
        let loaded = match self.store.load().await {
            Ok(session) => session,
            Err(err @ SessionError::Corrupt { .. }) => {
                tracing::warn!(error = %err, "Discarding unreadable session");
                self.store.clear().await?;
                None
            }
            Err(err) => return Err(err),
        };
        if let Some(session) = &loaded {
            tracing::debug!(
                user = %session.user.username,
                jti = ?decode_jti(&session.access),
                "Restored session"
            );
        }
        *self.current.write().await = loaded.clone();
        Ok(loaded)
    }

    pub async fn begin(&self, session: Session) -> Result<(), SessionError> {
        self.store.save(&session).await?;
        *self.current.write().await = Some(session);
        Ok(())
    }

    /// Replaces the access token (and the refresh token when rotated).
    pub async fn update_tokens(
        &self,
        access: String,
        refresh: Option<String>,
    ) -> Result<(), SessionError> {
        let updated = {
            let mut guard = self.current.write().await;
            let Some(session) = guard.as_mut() else {
                return Ok(());
            };
            session.access = access;
            if let Some(refresh) = refresh {
                session.refresh = refresh;
            }
            session.clone()
        };
        self.store.save(&updated).await
    }

    pub async fn end(&self) -> Result<(), SessionError> {
        *self.current.write().await = None;
        self.store.clear().await
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|s| s.access.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|s| s.refresh.clone())
    }

    pub async fn user(&self) -> Option<CurrentUser> {
        self.current.read().await.as_ref().map(|s| s.user.clone())
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrdesk_core::{Role, UserId};

    fn session() -> Session {
        Session {
            access: "access-token-1".into(),
            refresh: "refresh-token-1".into(),
            user: CurrentUser {
                id: UserId::new(1),
                username: "admin".into(),
                email: "admin@example.com".into(),
                name: "Admin".into(),
                role: Role::Admin,
                managed_directions: Vec::new(),
                managed_department: None,
            },
        }
    }

    #[test]
    fn debug_output_masks_tokens() {
        let text = format!("{:?}", session());
        assert!(!text.contains("access-token-1"));
        assert!(text.contains("acce***"));
    }

    #[tokio::test]
    async fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/session.json"));
        assert!(store.load().await.unwrap().is_none());
        store.save(&session()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session()));
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_is_discarded_on_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();
        let manager = SessionManager::new(Box::new(FileSessionStore::new(&path)));
        assert!(manager.restore().await.unwrap().is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn token_update_writes_through() {
        let mut store = MockSessionStore::new();
        store.expect_save().times(2).returning(|_| Ok(()));
        let manager = SessionManager::new(Box::new(store));
        manager.begin(session()).await.unwrap();
        manager
            .update_tokens("access-token-2".into(), None)
            .await
            .unwrap();
        let current = manager.current().await.unwrap();
        assert_eq!(current.access, "access-token-2");
        assert_eq!(current.refresh, "refresh-token-1");
    }

    #[tokio::test]
    async fn update_without_session_is_a_no_op() {
        let mut store = MockSessionStore::new();
        store.expect_save().never();
        let manager = SessionManager::new(Box::new(store));
        manager.update_tokens("x".into(), None).await.unwrap();
        assert!(manager.access_token().await.is_none());
    }
}
