//! Read models handed to the facilitator and participant surfaces.

use garden_core::session::{
    Agency, Author, Cluster, ClusterCount, Node, Phase, Session, SessionStats, TreeNode,
    UNCLUSTERED_COLOUR, UNCLUSTERED_LABEL,
};
use garden_core::suggestion::{IdeaSplit, VaguenessCheck};
use serde::Serialize;

/// One line in the session list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub facilitator_name: String,
    pub phase: Phase,
    pub created_at: String,
    pub node_count: usize,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            title: session.title.clone(),
            facilitator_name: session.facilitator_name.clone(),
            phase: session.phase(),
            created_at: session.created_at.clone(),
            node_count: session.nodes().len(),
        }
    }
}

/// A node flattened for lists, with its cluster already resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: String,
    pub text: String,
    pub level: u32,
    pub author: Author,
    pub agency: Option<Agency>,
    pub cluster_label: String,
    pub cluster_colour: String,
}

impl NodeView {
    pub(crate) fn of(session: &Session, node: &Node) -> Self {
        Self {
            id: node.id().to_string(),
            text: node.text().to_string(),
            level: node.level(),
            author: node.author(),
            agency: node.agency,
            cluster_label: session.cluster_label(node.cluster_id()).to_string(),
            cluster_colour: session.cluster_colour(node.cluster_id()).to_string(),
        }
    }
}

/// Everything the facilitator dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub session_id: String,
    pub title: String,
    pub facilitator_name: String,
    pub phase: Phase,
    /// Tree under the canonical root; `None` for an empty session
    pub tree: Option<TreeNode>,
    /// Trees under any additional parentless nodes
    pub detached: Vec<TreeNode>,
    pub stats: SessionStats,
    pub shallow_nodes: Vec<NodeView>,
    pub clusters: Vec<Cluster>,
    pub cluster_counts: Vec<ClusterCount>,
}

impl Dashboard {
    pub(crate) fn build(session: &Session, shallow_depth: u32) -> Self {
        let mut forest = session.build_forest().into_iter();
        let tree = forest.next();
        Self {
            session_id: session.id().to_string(),
            title: session.title.clone(),
            facilitator_name: session.facilitator_name.clone(),
            phase: session.phase(),
            tree,
            detached: forest.collect(),
            stats: session.stats_with_depth(shallow_depth),
            shallow_nodes: session
                .shallow_nodes(shallow_depth)
                .into_iter()
                .map(|node| NodeView::of(session, node))
                .collect(),
            clusters: session.clusters().to_vec(),
            cluster_counts: session.cluster_counts(),
        }
    }

    /// Display label for a cluster reference in the tree.
    pub fn cluster_label(&self, cluster_id: Option<&str>) -> &str {
        self.cluster(cluster_id)
            .map(|c| c.label.as_str())
            .unwrap_or(UNCLUSTERED_LABEL)
    }

    /// Display colour for a cluster reference in the tree.
    pub fn cluster_colour(&self, cluster_id: Option<&str>) -> &str {
        self.cluster(cluster_id)
            .map(|c| c.colour.as_str())
            .unwrap_or(UNCLUSTERED_COLOUR)
    }

    fn cluster(&self, cluster_id: Option<&str>) -> Option<&Cluster> {
        let cluster_id = cluster_id?;
        self.clusters.iter().find(|c| c.id == cluster_id)
    }
}

/// What a participant sees: the question being asked and the latest answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantView {
    pub session_id: String,
    pub title: String,
    pub phase: Phase,
    pub current_prompt: Option<String>,
    /// The node the current prompt was asked about
    pub current_node_id: Option<String>,
    /// Newest first
    pub recent_nodes: Vec<NodeView>,
}

impl ParticipantView {
    pub(crate) fn build(session: &Session, recent: usize) -> Self {
        let latest = session.latest_prompt_log();
        Self {
            session_id: session.id().to_string(),
            title: session.title.clone(),
            phase: session.phase(),
            current_prompt: latest.map(|log| log.prompt_text.clone()),
            current_node_id: latest.map(|log| log.node_id.clone()),
            recent_nodes: session
                .recent_nodes(recent)
                .into_iter()
                .map(|node| NodeView::of(session, node))
                .collect(),
        }
    }
}

/// Analysis of a raw response, before anything is committed to the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseAnalysis {
    pub original_response: String,
    pub parent_id: Option<String>,
    /// Depth the new node(s) would sit at
    pub depth: u32,
    pub split: IdeaSplit,
    pub vagueness: VaguenessCheck,
    pub follow_up: String,
}

impl ResponseAnalysis {
    /// Texts that committing this analysis would insert: each split idea when
    /// the response held several, otherwise the response itself.
    pub fn node_texts(&self) -> Vec<String> {
        if self.split.is_multiple() {
            self.split.ideas.iter().map(|idea| idea.text.clone()).collect()
        } else {
            vec![self.original_response.clone()]
        }
    }
}

/// A follow-up question put to the group about one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deepening {
    pub node_id: String,
    pub question: String,
    pub prompt_log_id: String,
}

/// Result of asking for cluster suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClusterOutcome {
    /// Not enough nodes; the collaborator was not consulted.
    TooFewNodes { node_count: usize, required: usize },
    /// Nothing usable came back; existing clusters are untouched.
    NoSuggestions,
    /// Existing clusters were replaced.
    Applied {
        clusters: usize,
        assigned_nodes: usize,
    },
}

/// The closing view: numbers, themes and the stored reflection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReflectionView {
    pub session_id: String,
    pub title: String,
    pub stats: SessionStats,
    pub cluster_counts: Vec<ClusterCount>,
    pub reflection: Option<String>,
    /// The reflection split into sentences for display
    pub reflection_sentences: Vec<String>,
}
