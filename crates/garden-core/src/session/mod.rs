//! Session domain module.
//!
//! This module contains the causal-tree model and every operation that
//! mutates or reads it.
//!
//! # Module Structure
//!
//! - `model`: the `Session` aggregate, `Phase`, `RootStatus`
//! - `node`: `Node`, `NodeDraft`, `Author`, `Agency`
//! - `cluster`: `Cluster` and the display palette
//! - `prompt_log`: `PromptLog`
//! - `store`: insertion, subtree deletion, cluster assignment, phase changes
//! - `query`: lookups, tree projection, shallow-node detection, statistics
//! - `tree`: the nested `TreeNode` projection

mod cluster;
mod model;
mod node;
mod prompt_log;
mod query;
mod store;
mod tree;

// Re-export public API
pub use cluster::{CLUSTER_PALETTE, Cluster, UNCLUSTERED_COLOUR, UNCLUSTERED_LABEL};
pub use model::{DEFAULT_FACILITATOR_NAME, DEFAULT_SESSION_TITLE, Phase, RootStatus, Session};
pub use node::{Agency, Author, Node, NodeDraft};
pub use prompt_log::PromptLog;
pub use query::{ClusterCount, DEFAULT_SHALLOW_DEPTH, SessionStats};
pub use tree::TreeNode;
