//! Mutating operations over a session's tree.

use super::cluster::Cluster;
use super::model::{Phase, Session};
use super::node::{Node, NodeDraft};
use super::prompt_log::PromptLog;
use crate::error::{GardenError, Result};
use crate::id::generate_id;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

impl Session {
    /// Places a draft in the tree and returns the finalized node.
    ///
    /// The store assigns the id, links the node into its parent's children and
    /// sets `level = parent.level + 1` (or 0 without a parent).
    ///
    /// # Errors
    ///
    /// - `Validation` if the draft's text is blank
    /// - `NotFound` if the draft names a parent that is not in this session
    pub fn add_node(&mut self, draft: NodeDraft) -> Result<&Node> {
        if draft.text.trim().is_empty() {
            return Err(GardenError::validation("node text must not be empty"));
        }

        let mut node_id = generate_id("node");
        while self.get_node(&node_id).is_some() {
            node_id = generate_id("node");
        }

        let level = match draft.parent_id.as_deref() {
            Some(parent_id) => {
                let parent = self
                    .nodes
                    .iter_mut()
                    .find(|n| n.id() == parent_id)
                    .ok_or_else(|| GardenError::not_found("Node", parent_id))?;
                parent.push_child(node_id.clone());
                parent.level() + 1
            }
            None => 0,
        };

        let node = Node::from_draft(node_id, self.id().to_string(), level, draft);
        tracing::debug!(
            session_id = %self.id(),
            node_id = %node.id(),
            level,
            "node inserted"
        );
        self.nodes.push(node);

        // Just pushed above.
        Ok(&self.nodes[self.nodes.len() - 1])
    }

    /// Removes a node together with every transitive descendant.
    ///
    /// Descendants are found over the current parent links with an explicit
    /// worklist, the node is unlinked from its parent's children, and the whole
    /// set is dropped in a single pass. Returns how many nodes were removed
    /// (0 when the id is unknown or the session is empty).
    pub fn delete_node(&mut self, node_id: &str) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let doomed: HashSet<String> = {
            let mut index: HashMap<&str, Vec<&str>> = HashMap::new();
            for node in &self.nodes {
                if let Some(parent_id) = node.parent_id() {
                    index.entry(parent_id).or_default().push(node.id());
                }
            }

            let mut doomed = HashSet::new();
            let mut worklist = vec![node_id];
            while let Some(current) = worklist.pop() {
                if doomed.insert(current.to_string()) {
                    if let Some(children) = index.get(current) {
                        worklist.extend(children.iter().copied());
                    }
                }
            }
            doomed
        };

        let parent_id = self
            .get_node(node_id)
            .and_then(|n| n.parent_id())
            .map(str::to_string);
        if let Some(parent_id) = parent_id {
            if let Some(parent) = self.nodes.iter_mut().find(|n| n.id() == parent_id) {
                parent.remove_child(node_id);
            }
        }

        let before = self.nodes.len();
        self.nodes.retain(|n| !doomed.contains(n.id()));
        let removed = before - self.nodes.len();

        tracing::debug!(
            session_id = %self.id(),
            node_id,
            removed,
            "subtree deleted"
        );
        removed
    }

    /// Mutable access to a node's content fields (text-independent metadata
    /// such as agency, tags and `needs_deepening`).
    pub fn node_mut(&mut self, node_id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id() == node_id)
    }

    /// Appends a cluster to the session.
    pub fn add_cluster(&mut self, cluster: Cluster) -> &Cluster {
        self.clusters.push(cluster);
        &self.clusters[self.clusters.len() - 1]
    }

    /// Sets (or clears, with `None`) a node's cluster.
    ///
    /// Returns `None` without changing anything if the node is unknown or the
    /// cluster id does not belong to this session.
    pub fn assign_node_to_cluster(
        &mut self,
        node_id: &str,
        cluster_id: Option<&str>,
    ) -> Option<&Node> {
        if let Some(cluster_id) = cluster_id {
            if !self.clusters.iter().any(|c| c.id == cluster_id) {
                return None;
            }
        }

        let node = self.nodes.iter_mut().find(|n| n.id() == node_id)?;
        node.set_cluster(cluster_id.map(str::to_string));
        Some(&*node)
    }

    /// Removes every cluster and every node's cluster reference in one step.
    pub fn clear_clusters(&mut self) {
        for node in &mut self.nodes {
            node.set_cluster(None);
        }
        self.clusters.clear();
    }

    /// Appends a prompt log entry.
    pub fn add_prompt_log(&mut self, log: PromptLog) -> &PromptLog {
        self.prompt_logs.push(log);
        &self.prompt_logs[self.prompt_logs.len() - 1]
    }

    /// Moves to the named phase.
    ///
    /// Unknown names are ignored and the current phase is kept. Returns whether
    /// the value was accepted.
    pub fn update_phase(&mut self, new_phase: &str) -> bool {
        match Phase::from_str(new_phase.trim()) {
            Ok(phase) => {
                self.set_phase(phase);
                true
            }
            Err(_) => {
                tracing::debug!(session_id = %self.id(), new_phase, "ignoring unknown phase");
                false
            }
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        tracing::debug!(session_id = %self.id(), from = %self.phase, to = %phase, "phase changed");
        self.phase = phase;
    }

    /// Clears nodes, clusters, prompt logs and reflection, and returns to seeding.
    pub fn reset_tree(&mut self) {
        self.nodes.clear();
        self.clusters.clear();
        self.prompt_logs.clear();
        self.reflection = None;
        self.phase = Phase::Seeding;
    }
}
