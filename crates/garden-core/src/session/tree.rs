//! Nested tree projection.

use super::node::{Agency, Author, Node};
use serde::Serialize;

/// A node copied out of the store, with its children nested as full objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub text: String,
    pub level: u32,
    pub author_id: Author,
    pub created_at: String,
    pub tags: Vec<String>,
    pub cluster_id: Option<String>,
    pub agency: Option<Agency>,
    pub needs_deepening: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub(crate) fn leaf(node: &Node) -> Self {
        Self {
            id: node.id().to_string(),
            parent_id: node.parent_id().map(str::to_string),
            text: node.text().to_string(),
            level: node.level(),
            author_id: node.author(),
            created_at: node.created_at().to_string(),
            tags: node.tags.clone(),
            cluster_id: node.cluster_id().map(str::to_string),
            agency: node.agency,
            needs_deepening: node.needs_deepening,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Depth-first, pre-order visit of the subtree.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TreeNode)) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            visit(node);
            stack.extend(node.children.iter().rev());
        }
    }
}

// Deep chains would otherwise be dropped one stack frame per level.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}
