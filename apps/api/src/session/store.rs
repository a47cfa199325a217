//! In-memory session store. Sessions live for one workflow run; there is no
//! on-disk layout, and a reset discards every artifact.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::models::Session;

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Session {
        let session = Session::new();
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Result<Session, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Applies a mutation under the write lock and returns its result.
    /// The closure sees the live session; errors leave prior state in place
    /// only if the closure itself did not mutate before failing.
    pub async fn update<T>(
        &self,
        id: Uuid,
        mutate: impl FnOnce(&mut Session) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        mutate(session)
    }

    /// Replaces the session with a fresh one under the same id.
    pub async fn reset(&self, id: Uuid) -> Result<Session, AppError> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(&id) {
            return Err(AppError::NotFound(format!("Session {id} not found")));
        }
        let mut fresh = Session::new();
        fresh.id = id;
        sessions.insert(id, fresh.clone());
        Ok(fresh)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::steps::Step;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::new();
        let session = store.create().await;
        let fetched = store.get(session.id).await.unwrap();
        assert_eq!(fetched.id, session.id);
        assert_eq!(fetched.current_step, Step::Input);
    }

    #[tokio::test]
    async fn test_get_unknown_session_is_not_found() {
        let store = SessionStore::new();
        let err = store.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_persists_mutation() {
        let store = SessionStore::new();
        let session = store.create().await;

        store
            .update(session.id, |s| {
                s.company_name = "Acme".to_string();
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(store.get(session.id).await.unwrap().company_name, "Acme");
    }

    #[tokio::test]
    async fn test_reset_discards_all_artifacts_but_keeps_id() {
        let store = SessionStore::new();
        let session = store.create().await;

        store
            .update(session.id, |s| {
                s.company_name = "Acme".to_string();
                s.company_research = Some("notes".to_string());
                s.completed_steps.insert(1);
                Ok(())
            })
            .await
            .unwrap();

        let fresh = store.reset(session.id).await.unwrap();
        assert_eq!(fresh.id, session.id);
        assert!(fresh.company_name.is_empty());
        assert!(fresh.company_research.is_none());
        assert!(fresh.completed_steps.is_empty());
        assert_eq!(fresh.current_step, Step::Input);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::new();
        let session = store.create().await;
        store.remove(session.id).await.unwrap();
        assert!(store.get(session.id).await.is_err());
    }
}
