//! Session domain model.
//!
//! A session is one workshop: its tree of causal statements, the clusters
//! drawn over it, and the log of follow-up questions asked.

use super::cluster::Cluster;
use super::node::Node;
use super::prompt_log::PromptLog;
use crate::id::{generate_id, now_timestamp};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

pub const DEFAULT_SESSION_TITLE: &str = "Untitled Session";
pub const DEFAULT_FACILITATOR_NAME: &str = "Facilitator";

/// The workshop's current stage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    #[default]
    Seeding,
    Growing,
    Deepening,
    Clustering,
    Reflection,
}

/// A workshop instance.
///
/// The session exclusively owns its nodes, clusters and prompt logs. Nodes can
/// only enter through [`Session::add_node`] and leave through
/// [`Session::delete_node`], so the tree's level and parent/child links are
/// consistent by construction. There is no stored root reference: the root is
/// derived from the tree (see [`Session::root_node`] and
/// [`Session::root_status`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: String,
    pub title: String,
    pub facilitator_name: String,
    pub(crate) phase: Phase,
    pub created_at: String,
    pub(crate) nodes: Vec<Node>,
    pub(crate) clusters: Vec<Cluster>,
    pub(crate) prompt_logs: Vec<PromptLog>,
    /// Closing reflection text, once generated
    pub reflection: Option<String>,
}

impl Session {
    /// Creates an empty session in the seeding phase.
    ///
    /// Blank or missing title and facilitator fall back to
    /// "Untitled Session" and "Facilitator".
    pub fn new(title: Option<&str>, facilitator_name: Option<&str>) -> Self {
        Self::with_id(generate_id("session"), title, facilitator_name)
    }

    /// Creates an empty session with a caller-chosen id (import, fixtures).
    pub fn with_id(
        id: impl Into<String>,
        title: Option<&str>,
        facilitator_name: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            title: non_blank(title).unwrap_or(DEFAULT_SESSION_TITLE).to_string(),
            facilitator_name: non_blank(facilitator_name)
                .unwrap_or(DEFAULT_FACILITATOR_NAME)
                .to_string(),
            phase: Phase::Seeding,
            created_at: now_timestamp(),
            nodes: Vec::new(),
            clusters: Vec::new(),
            prompt_logs: Vec::new(),
            reflection: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Prompt logs in the order they were appended.
    pub fn prompt_logs(&self) -> &[PromptLog] {
        &self.prompt_logs
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// How many parentless nodes the tree currently has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootStatus {
    /// No nodes at all.
    Empty,
    /// Exactly one parentless node.
    Single(String),
    /// Several parentless nodes, in store order.
    Multiple(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new(None, Some("   "));
        assert_eq!(session.title, DEFAULT_SESSION_TITLE);
        assert_eq!(session.facilitator_name, DEFAULT_FACILITATOR_NAME);
        assert_eq!(session.phase(), Phase::Seeding);
        assert!(session.id().starts_with("session_"));
        assert!(session.nodes().is_empty());
        assert!(session.clusters().is_empty());
        assert!(session.prompt_logs().is_empty());
        assert!(session.reflection.is_none());
    }

    #[test]
    fn test_new_session_keeps_given_names() {
        let session = Session::new(Some("Retention"), Some("Ana"));
        assert_eq!(session.title, "Retention");
        assert_eq!(session.facilitator_name, "Ana");
    }

    #[test]
    fn test_phase_round_trips_through_strings() {
        let names: Vec<String> = Phase::iter().map(|p| p.to_string()).collect();
        assert_eq!(
            names,
            vec!["seeding", "growing", "deepening", "clustering", "reflection"]
        );
        assert_eq!(Phase::from_str("clustering").unwrap(), Phase::Clustering);
        assert!(Phase::from_str("harvest").is_err());
    }
}
