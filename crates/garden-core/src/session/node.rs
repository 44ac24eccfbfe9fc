//! Causal statement nodes.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Who wrote a node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Author {
    Facilitator,
    #[default]
    Participant,
}

/// Qualitative agency tag, orthogonal to clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Agency {
    Low,
    Med,
    High,
}

/// A single causal statement inside a session's tree.
///
/// Structural fields (`id`, `parent_id`, `level`, `children`, `cluster_id`) are
/// owned by the session store and only readable from outside; they can only
/// change through [`Session`](super::Session) operations, which keeps the
/// level and parent/child links consistent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: String,
    session_id: String,
    parent_id: Option<String>,
    text: String,
    level: u32,
    author_id: Author,
    created_at: String,
    /// Free-form tags attached by the facilitator
    pub tags: Vec<String>,
    cluster_id: Option<String>,
    /// Agency classification (unset when `None`)
    pub agency: Option<Agency>,
    /// Whether the facilitator still wants to explore beneath this node
    pub needs_deepening: bool,
    children: Vec<String>,
}

impl Node {
    pub(crate) fn from_draft(
        id: String,
        session_id: String,
        level: u32,
        draft: NodeDraft,
    ) -> Self {
        Self {
            id,
            session_id,
            parent_id: draft.parent_id,
            text: draft.text,
            level,
            author_id: draft.author,
            created_at: draft.created_at.unwrap_or_else(crate::id::now_timestamp),
            tags: draft.tags,
            cluster_id: None,
            agency: draft.agency,
            needs_deepening: draft.needs_deepening,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Depth in the tree; the root is 0.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn author(&self) -> Author {
        self.author_id
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn cluster_id(&self) -> Option<&str> {
        self.cluster_id.as_deref()
    }

    /// Child ids in insertion order.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub(crate) fn push_child(&mut self, child_id: String) {
        self.children.push(child_id);
    }

    pub(crate) fn remove_child(&mut self, child_id: &str) {
        self.children.retain(|c| c != child_id);
    }

    pub(crate) fn set_cluster(&mut self, cluster_id: Option<String>) {
        self.cluster_id = cluster_id;
    }
}

/// A node that has not been placed in a tree yet.
///
/// Drafts carry no id and no level: both are assigned by
/// [`Session::add_node`](super::Session::add_node), which looks up the live
/// parent. A draft therefore can never be observed with a wrong depth.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDraft {
    pub(crate) text: String,
    pub(crate) parent_id: Option<String>,
    pub(crate) author: Author,
    pub(crate) created_at: Option<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) agency: Option<Agency>,
    pub(crate) needs_deepening: bool,
}

impl NodeDraft {
    /// Creates a draft with `needs_deepening` set, no tags and no agency.
    pub fn new(text: impl Into<String>, parent_id: Option<String>, author: Author) -> Self {
        Self {
            text: text.into(),
            parent_id,
            author,
            created_at: None,
            tags: Vec::new(),
            agency: None,
            needs_deepening: true,
        }
    }

    /// Shorthand for a parentless facilitator statement.
    pub fn root(text: impl Into<String>) -> Self {
        Self::new(text, None, Author::Facilitator)
    }

    /// Shorthand for a participant statement under `parent_id`.
    pub fn child_of(parent_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(text, Some(parent_id.into()), Author::Participant)
    }

    /// Keeps an existing creation timestamp (used when rebuilding imported trees).
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub fn with_agency(mut self, agency: Option<Agency>) -> Self {
        self.agency = agency;
        self
    }

    pub fn with_needs_deepening(mut self, needs_deepening: bool) -> Self {
        self.needs_deepening = needs_deepening;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
}
