//! Thematic clusters of nodes.

use crate::id::{generate_id, now_timestamp};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Display palette used when a cluster is created without a colour.
pub const CLUSTER_PALETTE: [&str; 7] = [
    "#F6D365", // Yellow
    "#FDA085", // Orange
    "#A8E6CF", // Green
    "#FFB3BA", // Pink
    "#BAE1FF", // Blue
    "#FFFFBA", // Light Yellow
    "#E0BBE4", // Purple
];

/// Colour shown for nodes that have no (or an unknown) cluster.
pub const UNCLUSTERED_COLOUR: &str = "#b1b4b6";

/// Label shown for nodes that have no (or an unknown) cluster.
pub const UNCLUSTERED_LABEL: &str = "Unclustered";

/// A facilitator- or adapter-assigned thematic group of nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub session_id: String,
    pub label: String,
    /// Hex colour string
    pub colour: String,
    pub description: String,
    pub created_at: String,
}

impl Cluster {
    /// Creates a cluster, picking a palette colour at random when `colour` is
    /// `None` or blank.
    pub fn new(
        session_id: impl Into<String>,
        label: impl Into<String>,
        colour: Option<String>,
        description: impl Into<String>,
    ) -> Self {
        let colour = colour
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(random_palette_colour);

        Self {
            id: generate_id("cluster"),
            session_id: session_id.into(),
            label: label.into(),
            colour,
            description: description.into(),
            created_at: now_timestamp(),
        }
    }
}

fn random_palette_colour() -> String {
    CLUSTER_PALETTE
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(UNCLUSTERED_COLOUR)
        .to_string()
}
