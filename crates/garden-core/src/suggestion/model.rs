//! Data shapes exchanged with the suggestion collaborator.

use crate::error::{GardenError, Result};
use crate::session::Session;
use serde::{Deserialize, Serialize};

/// How concrete a single idea is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaType {
    ConcreteSituation,
    InferredCause,
    VagueFeeling,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One cause extracted from a participant's response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub text: String,
    #[serde(default, rename = "type")]
    pub idea_type: IdeaType,
}

/// Result of splitting a response into separate ideas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaSplit {
    #[serde(default)]
    pub idea_count: usize,
    #[serde(default)]
    pub ideas: Vec<Idea>,
}

impl IdeaSplit {
    /// The degraded answer: the whole response as one idea of unknown type.
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            idea_count: 1,
            ideas: vec![Idea {
                text: text.into(),
                idea_type: IdeaType::Unknown,
            }],
        }
    }

    pub fn is_multiple(&self) -> bool {
        self.idea_count > 1
    }

    /// Drops blank ideas and reconciles `idea_count` with the ideas returned.
    ///
    /// # Errors
    ///
    /// `Adapter` when no usable idea remains.
    pub fn validated(mut self) -> Result<Self> {
        self.ideas.retain(|idea| !idea.text.trim().is_empty());
        if self.ideas.is_empty() {
            return Err(GardenError::adapter("idea split returned no ideas"));
        }
        self.idea_count = self.ideas.len();
        Ok(self)
    }
}

/// Outcome of the vagueness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaguenessCheck {
    pub is_vague: bool,
    pub nudge: Option<String>,
}

impl VaguenessCheck {
    pub fn clear() -> Self {
        Self {
            is_vague: false,
            nudge: None,
        }
    }

    pub fn vague(nudge: impl Into<String>) -> Self {
        Self {
            is_vague: true,
            nudge: Some(nudge.into()),
        }
    }
}

/// One proposed theme. `node_indices` are 0-based positions in the node list
/// that was sent, not node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSuggestion {
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub node_indices: Vec<usize>,
}

/// All proposed themes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClusterSuggestions {
    #[serde(default)]
    pub clusters: Vec<ClusterSuggestion>,
}

impl ClusterSuggestions {
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Drops unlabeled themes and indices outside `0..node_count`.
    pub fn validated(mut self, node_count: usize) -> Self {
        self.clusters.retain(|c| !c.label.trim().is_empty());
        for cluster in &mut self.clusters {
            cluster.label = cluster.label.trim().to_string();
            cluster.node_indices.retain(|&i| i < node_count);
        }
        self
    }
}

/// Label and size of one cluster, as sent for reflection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub label: String,
    pub node_count: usize,
}

/// What the reflection step gets to see of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionSummary {
    pub total_nodes: usize,
    pub clusters: Vec<ClusterSummary>,
    pub sample_nodes: Vec<String>,
}

impl ReflectionSummary {
    /// Node count, per-cluster counts and the first `sample_size` node texts.
    pub fn from_session(session: &Session, sample_size: usize) -> Self {
        Self {
            total_nodes: session.nodes().len(),
            clusters: session
                .cluster_counts()
                .into_iter()
                .map(|c| ClusterSummary {
                    label: c.label,
                    node_count: c.node_count,
                })
                .collect(),
            sample_nodes: session
                .nodes()
                .iter()
                .take(sample_size)
                .map(|n| n.text().to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Cluster, NodeDraft};

    #[test]
    fn test_idea_split_parses_collaborator_json() {
        let json = r#"{
            "idea_count": 2,
            "ideas": [
                {"text": "Managers never say thanks", "type": "concrete_situation"},
                {"text": "Feeling stuck", "type": "something_new"}
            ]
        }"#;
        let split: IdeaSplit = serde_json::from_str(json).unwrap();
        assert!(split.is_multiple());
        assert_eq!(split.ideas[0].idea_type, IdeaType::ConcreteSituation);
        assert_eq!(split.ideas[1].idea_type, IdeaType::Unknown);
    }

    #[test]
    fn test_idea_split_validation() {
        let split = IdeaSplit {
            idea_count: 3,
            ideas: vec![
                Idea {
                    text: "Pay".into(),
                    idea_type: IdeaType::InferredCause,
                },
                Idea {
                    text: "  ".into(),
                    idea_type: IdeaType::Unknown,
                },
            ],
        };
        let split = split.validated().unwrap();
        assert_eq!(split.idea_count, 1);
        assert!(!split.is_multiple());

        let empty = IdeaSplit {
            idea_count: 0,
            ideas: vec![],
        };
        assert!(empty.validated().unwrap_err().is_adapter_failure());
    }

    #[test]
    fn test_single_fallback_shape() {
        let split = IdeaSplit::single("I don't know");
        assert_eq!(split.idea_count, 1);
        assert_eq!(split.ideas[0].text, "I don't know");
        assert_eq!(split.ideas[0].idea_type, IdeaType::Unknown);
    }

    #[test]
    fn test_cluster_suggestions_validation() {
        let json = r#"{"clusters": [
            {"label": " Security ", "description": "money", "node_indices": [0, 4, 9]},
            {"label": "", "node_indices": [1]}
        ]}"#;
        let suggestions: ClusterSuggestions = serde_json::from_str(json).unwrap();
        let suggestions = suggestions.validated(5);
        assert_eq!(suggestions.clusters.len(), 1);
        assert_eq!(suggestions.clusters[0].label, "Security");
        assert_eq!(suggestions.clusters[0].node_indices, vec![0, 4]);
    }

    #[test]
    fn test_reflection_summary_from_session() {
        let mut session = Session::new(None, None);
        let root = session.add_node(NodeDraft::root("root")).unwrap().id().to_string();
        for i in 0..12 {
            session
                .add_node(NodeDraft::child_of(root.as_str(), format!("cause {i}")))
                .unwrap();
        }
        let sid = session.id().to_string();
        let cluster_id = session.add_cluster(Cluster::new(sid, "Growth", None, "")).id.clone();
        session.assign_node_to_cluster(&root, Some(&cluster_id));

        let summary = ReflectionSummary::from_session(&session, 10);
        assert_eq!(summary.total_nodes, 13);
        assert_eq!(summary.sample_nodes.len(), 10);
        assert_eq!(summary.sample_nodes[0], "root");
        assert_eq!(
            summary.clusters,
            vec![ClusterSummary {
                label: "Growth".into(),
                node_count: 1,
            }]
        );
    }
}
