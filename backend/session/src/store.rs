//! Session storage behind a small injected interface.
//!
//! The machine owns session lifecycle through this trait rather than
//! process-wide maps, so tests run against the in-memory implementation and
//! a persistent store can be swapped in later without touching the machine.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use polisbot_core::{IntakeError, Session, UserId};

/// Keyed session storage. Sessions never reference each other, so per-key
/// isolation is all the concurrency contract callers get.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a fresh session, replacing any existing one for the user.
    async fn create(&self, session: Session) -> Result<(), IntakeError>;

    async fn get(&self, user: UserId) -> Result<Option<Session>, IntakeError>;

    /// Persist a mutated session. Errors if the session was never created.
    async fn update(&self, session: Session) -> Result<(), IntakeError>;

    async fn remove(&self, user: UserId) -> Result<(), IntakeError>;
}

/// Process-lifetime session store over a `RwLock`ed map.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<UserId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: Session) -> Result<(), IntakeError> {
        self.sessions.write().await.insert(session.user, session);
        Ok(())
    }

    async fn get(&self, user: UserId) -> Result<Option<Session>, IntakeError> {
        Ok(self.sessions.read().await.get(&user).cloned())
    }

    async fn update(&self, session: Session) -> Result<(), IntakeError> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(&session.user) {
            return Err(IntakeError::Storage(format!(
                "no session to update for user {}",
                session.user
            )));
        }
        sessions.insert(session.user, session);
        Ok(())
    }

    async fn remove(&self, user: UserId) -> Result<(), IntakeError> {
        self.sessions.write().await.remove(&user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_get_remove_roundtrip() {
        let store = InMemorySessionStore::new();
        assert!(store.get(1).await.unwrap().is_none());

        store.create(Session::start(1)).await.unwrap();
        assert!(store.get(1).await.unwrap().is_some());

        store.remove(1).await.unwrap();
        assert!(store.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_requires_existing_session() {
        let store = InMemorySessionStore::new();
        let err = store.update(Session::start(9)).await.unwrap_err();
        assert!(matches!(err, IntakeError::Storage(_)));
    }

    #[tokio::test]
    async fn create_replaces_prior_session() {
        let store = InMemorySessionStore::new();
        let mut first = Session::start(5);
        first.documents.identity_image = Some("old.jpg".into());
        store.create(first).await.unwrap();

        store.create(Session::start(5)).await.unwrap();
        let session = store.get(5).await.unwrap().unwrap();
        assert!(session.documents.identity_image.is_none());
    }
}
