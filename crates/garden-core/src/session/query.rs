//! Read-only derivations over a session.

use super::cluster::{Cluster, UNCLUSTERED_COLOUR, UNCLUSTERED_LABEL};
use super::model::{RootStatus, Session};
use super::node::Node;
use super::prompt_log::PromptLog;
use super::tree::TreeNode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Leaves shallower than this are flagged for deepening by default.
pub const DEFAULT_SHALLOW_DEPTH: u32 = 3;

/// Aggregate numbers shown on the facilitator dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_nodes: usize,
    pub total_clusters: usize,
    pub max_depth: u32,
    pub shallow_nodes: usize,
    pub unclustered_nodes: usize,
}

/// Node count for one cluster, in cluster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterCount {
    pub cluster_id: String,
    pub label: String,
    pub node_count: usize,
}

impl Session {
    pub fn get_node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == node_id)
    }

    pub fn get_cluster(&self, cluster_id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == cluster_id)
    }

    /// Nodes whose parent is `node_id`, in store order.
    pub fn children_of(&self, node_id: &str) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.parent_id() == Some(node_id))
            .collect()
    }

    /// The first parentless node in store order.
    ///
    /// Use [`Session::root_status`] to tell a single root apart from several.
    pub fn root_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_root())
    }

    pub fn root_status(&self) -> RootStatus {
        let roots: Vec<String> = self
            .nodes
            .iter()
            .filter(|n| n.is_root())
            .map(|n| n.id().to_string())
            .collect();

        match roots.len() {
            0 => RootStatus::Empty,
            1 => RootStatus::Single(roots.into_iter().next().unwrap_or_default()),
            _ => RootStatus::Multiple(roots),
        }
    }

    /// Nested projection of the tree under [`Session::root_node`].
    ///
    /// Returns `None` when there are no nodes. Other parentless nodes (if any)
    /// are not part of the result; see [`Session::build_forest`].
    pub fn build_tree(&self) -> Option<TreeNode> {
        let root = self.root_node()?;
        let index = self.child_index();
        Some(project(root, &index))
    }

    /// Nested projections of every parentless node, in store order.
    pub fn build_forest(&self) -> Vec<TreeNode> {
        let index = self.child_index();
        self.nodes
            .iter()
            .filter(|n| n.is_root())
            .map(|root| project(root, &index))
            .collect()
    }

    /// Leaves whose level is below `min_depth`: the branches worth deepening.
    pub fn shallow_nodes(&self, min_depth: u32) -> Vec<&Node> {
        let index = self.child_index();
        self.nodes
            .iter()
            .filter(|n| !index.contains_key(n.id()) && n.level() < min_depth)
            .collect()
    }

    pub fn nodes_in_cluster(&self, cluster_id: &str) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.cluster_id() == Some(cluster_id))
            .collect()
    }

    /// Per-cluster node counts, in cluster order.
    pub fn cluster_counts(&self) -> Vec<ClusterCount> {
        self.clusters
            .iter()
            .map(|c| ClusterCount {
                cluster_id: c.id.clone(),
                label: c.label.clone(),
                node_count: self.nodes_in_cluster(&c.id).len(),
            })
            .collect()
    }

    /// Colour for a node's cluster reference, grey when unset or unknown.
    pub fn cluster_colour(&self, cluster_id: Option<&str>) -> &str {
        cluster_id
            .and_then(|id| self.get_cluster(id))
            .map(|c| c.colour.as_str())
            .unwrap_or(UNCLUSTERED_COLOUR)
    }

    /// Label for a node's cluster reference, "Unclustered" when unset or unknown.
    pub fn cluster_label(&self, cluster_id: Option<&str>) -> &str {
        cluster_id
            .and_then(|id| self.get_cluster(id))
            .map(|c| c.label.as_str())
            .unwrap_or(UNCLUSTERED_LABEL)
    }

    /// Statistics with the default shallow depth of 3.
    pub fn stats(&self) -> SessionStats {
        self.stats_with_depth(DEFAULT_SHALLOW_DEPTH)
    }

    pub fn stats_with_depth(&self, shallow_depth: u32) -> SessionStats {
        SessionStats {
            total_nodes: self.nodes.len(),
            total_clusters: self.clusters.len(),
            max_depth: self.nodes.iter().map(Node::level).max().unwrap_or(0),
            shallow_nodes: self.shallow_nodes(shallow_depth).len(),
            unclustered_nodes: self
                .nodes
                .iter()
                .filter(|n| n.cluster_id().is_none())
                .count(),
        }
    }

    /// The most recently appended prompt log.
    pub fn latest_prompt_log(&self) -> Option<&PromptLog> {
        self.prompt_logs.last()
    }

    /// The last `count` nodes, newest first.
    pub fn recent_nodes(&self, count: usize) -> Vec<&Node> {
        self.nodes.iter().rev().take(count).collect()
    }

    fn child_index(&self) -> HashMap<&str, Vec<&Node>> {
        let mut index: HashMap<&str, Vec<&Node>> = HashMap::new();
        for node in &self.nodes {
            if let Some(parent_id) = node.parent_id() {
                index.entry(parent_id).or_default().push(node);
            }
        }
        index
    }
}

/// Builds the nested projection under `root` bottom-up, so depth never
/// grows the call stack.
fn project(root: &Node, index: &HashMap<&str, Vec<&Node>>) -> TreeNode {
    let mut order = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        order.push(node);
        if let Some(children) = index.get(node.id()) {
            stack.extend(children.iter().copied());
        }
    }

    // Reverse pre-order: every child is finished before its parent.
    let mut built: HashMap<&str, TreeNode> = HashMap::with_capacity(order.len());
    for node in order.into_iter().rev() {
        let mut tree = TreeNode::leaf(node);
        if let Some(children) = index.get(node.id()) {
            tree.children = children
                .iter()
                .filter_map(|child| built.remove(child.id()))
                .collect();
        }
        built.insert(node.id(), tree);
    }
    built
        .remove(root.id())
        .unwrap_or_else(|| TreeNode::leaf(root))
}
