//! Follow-up question log.

use crate::id::{generate_id, now_timestamp};
use serde::{Deserialize, Serialize};

/// A follow-up question that was put to the group for a node.
///
/// Logs are append-only; the node they point at may since have been deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptLog {
    pub id: String,
    pub session_id: String,
    pub node_id: String,
    pub prompt_text: String,
    pub response_text: Option<String>,
    pub timestamp: String,
}

impl PromptLog {
    pub fn new(
        session_id: impl Into<String>,
        node_id: impl Into<String>,
        prompt_text: impl Into<String>,
        response_text: Option<String>,
    ) -> Self {
        Self {
            id: generate_id("pl"),
            session_id: session_id.into(),
            node_id: node_id.into(),
            prompt_text: prompt_text.into(),
            response_text,
            timestamp: now_timestamp(),
        }
    }
}
