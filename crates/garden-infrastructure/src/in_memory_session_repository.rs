//! Process-local session collection.

use async_trait::async_trait;
use garden_core::error::{GardenError, Result};
use garden_core::repository::{SessionHandle, SessionRepository};
use garden_core::session::Session;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[derive(Default)]
struct Sessions {
    by_id: HashMap<String, SessionHandle>,
    /// Ids in insertion order
    order: Vec<String>,
}

/// Keeps every live session in memory, each behind its own mutex.
///
/// The outer lock only guards membership and is never held while a session
/// is being worked on.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<Sessions>>,
}

impl InMemorySessionRepository {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<SessionHandle>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.by_id.get(session_id).cloned())
    }

    async fn insert(&self, session: Session) -> Result<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let session_id = session.id().to_string();
        if sessions.by_id.contains_key(&session_id) {
            return Err(GardenError::conflict(format!(
                "session '{session_id}' already exists"
            )));
        }

        let handle: SessionHandle = Arc::new(Mutex::new(session));
        sessions.by_id.insert(session_id.clone(), handle.clone());
        sessions.order.push(session_id.clone());
        tracing::debug!(session_id = %session_id, "session added to collection");
        Ok(handle)
    }

    async fn delete(&self, session_id: &str) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        let existed = sessions.by_id.remove(session_id).is_some();
        if existed {
            sessions.order.retain(|id| id != session_id);
            tracing::debug!(session_id, "session removed from collection");
        }
        Ok(existed)
    }

    async fn list_all(&self) -> Result<Vec<SessionHandle>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .order
            .iter()
            .filter_map(|id| sessions.by_id.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_core::session::NodeDraft;

    #[tokio::test]
    async fn test_insert_find_and_delete() {
        let repo = InMemorySessionRepository::new();
        let session = Session::with_id("s1", Some("Retention"), None);
        repo.insert(session).await.unwrap();

        assert!(repo.contains("s1").await.unwrap());
        let handle = repo.find_by_id("s1").await.unwrap().unwrap();
        assert_eq!(handle.lock().await.title, "Retention");
        assert!(repo.find_by_id("missing").await.unwrap().is_none());

        assert!(repo.delete("s1").await.unwrap());
        assert!(!repo.delete("s1").await.unwrap());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_a_conflict() {
        let repo = InMemorySessionRepository::new();
        repo.insert(Session::with_id("s1", None, None)).await.unwrap();
        let err = repo
            .insert(Session::with_id("s1", Some("Other"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, GardenError::Conflict(_)));

        let handle = repo.find_by_id("s1").await.unwrap().unwrap();
        assert_eq!(handle.lock().await.title, "Untitled Session");
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let repo = InMemorySessionRepository::new();
        for id in ["b", "a", "c"] {
            repo.insert(Session::with_id(id, None, None)).await.unwrap();
        }
        repo.delete("a").await.unwrap();

        let mut ids = Vec::new();
        for handle in repo.list_all().await.unwrap() {
            ids.push(handle.lock().await.id().to_string());
        }
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_handles_share_state() {
        let repo = InMemorySessionRepository::new();
        let first = repo.insert(Session::with_id("s1", None, None)).await.unwrap();
        first
            .lock()
            .await
            .add_node(NodeDraft::root("Why?"))
            .unwrap();

        let second = repo.find_by_id("s1").await.unwrap().unwrap();
        assert_eq!(second.lock().await.nodes().len(), 1);
    }
}
