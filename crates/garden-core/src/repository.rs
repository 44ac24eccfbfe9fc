//! Session repository trait.
//!
//! Defines the interface for the session collection.

use crate::error::Result;
use crate::session::Session;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to one session.
///
/// The mutex is the unit of serialisation: operations on the same session run
/// one at a time, operations on different sessions are independent.
pub type SessionHandle = Arc<Mutex<Session>>;

/// An abstract collection of live sessions.
///
/// This decouples the workshop flows from where sessions are kept (process
/// memory today).
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(handle))`: Session found
    /// - `Ok(None)`: Session not found
    async fn find_by_id(&self, session_id: &str) -> Result<Option<SessionHandle>>;

    /// Adds a session to the collection.
    ///
    /// # Errors
    ///
    /// `Conflict` if a session with the same id is already present.
    async fn insert(&self, session: Session) -> Result<SessionHandle>;

    /// Removes a session. Returns whether it existed.
    async fn delete(&self, session_id: &str) -> Result<bool>;

    /// All sessions, in the order they were inserted.
    async fn list_all(&self) -> Result<Vec<SessionHandle>>;

    /// Whether a session id is taken.
    async fn contains(&self, session_id: &str) -> Result<bool> {
        Ok(self.find_by_id(session_id).await?.is_some())
    }
}
