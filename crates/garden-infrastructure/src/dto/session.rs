//! Session export format.
//!
//! An export is the whole session as indented JSON. Import is lenient: every
//! field may be missing or null, and unknown phase, author or agency values
//! fall back to their defaults. Imported trees are rebuilt through
//! `Session::add_node`, so node ids are regenerated and levels are recomputed
//! from the parent links rather than trusted from the file.

use garden_core::error::{GardenError, Result};
use garden_core::session::{Agency, Author, Cluster, Node, NodeDraft, PromptLog, Session};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// Title given to imports that carry none.
pub const IMPORTED_SESSION_TITLE: &str = "Imported session";

const UNTITLED_CLUSTER: &str = "Untitled cluster";

/// Exported session, field for field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionExport {
    pub id: Option<String>,
    pub title: Option<String>,
    pub facilitator_name: Option<String>,
    pub phase: Option<String>,
    pub created_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub nodes: Vec<NodeRecord>,
    #[serde(deserialize_with = "null_as_default")]
    pub clusters: Vec<ClusterRecord>,
    #[serde(deserialize_with = "null_as_default")]
    pub prompt_logs: Vec<PromptLogRecord>,
    pub reflection: Option<String>,
    /// Written for readers of the file; ignored on import, where the root is
    /// derived from the rebuilt tree.
    pub root_node_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRecord {
    pub id: String,
    pub session_id: Option<String>,
    pub parent_id: Option<String>,
    pub text: String,
    pub level: Option<u32>,
    pub author_id: Option<String>,
    pub created_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub cluster_id: Option<String>,
    pub agency: Option<String>,
    pub needs_deepening: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterRecord {
    pub id: String,
    pub session_id: Option<String>,
    pub label: String,
    pub colour: Option<String>,
    pub description: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptLogRecord {
    pub id: String,
    pub session_id: Option<String>,
    pub node_id: String,
    pub prompt_text: String,
    pub response_text: Option<String>,
    pub timestamp: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id().to_string(),
            session_id: Some(node.session_id().to_string()),
            parent_id: node.parent_id().map(str::to_string),
            text: node.text().to_string(),
            level: Some(node.level()),
            author_id: Some(node.author().to_string()),
            created_at: Some(node.created_at().to_string()),
            tags: node.tags.clone(),
            cluster_id: node.cluster_id().map(str::to_string),
            agency: node.agency.map(|a| a.to_string()),
            needs_deepening: Some(node.needs_deepening),
            children: node.children().to_vec(),
        }
    }
}

impl NodeRecord {
    fn to_draft(&self, parent_id: Option<String>) -> NodeDraft {
        let author = self
            .author_id
            .as_deref()
            .and_then(|a| Author::from_str(a.trim()).ok())
            .unwrap_or_default();
        let agency = self
            .agency
            .as_deref()
            .and_then(|a| Agency::from_str(a.trim()).ok());

        let draft = NodeDraft::new(self.text.clone(), parent_id, author)
            .with_tags(self.tags.clone())
            .with_agency(agency)
            .with_needs_deepening(self.needs_deepening.unwrap_or(true));
        match non_blank(self.created_at.clone()) {
            Some(created_at) => draft.with_created_at(created_at),
            None => draft,
        }
    }
}

impl From<&Cluster> for ClusterRecord {
    fn from(cluster: &Cluster) -> Self {
        Self {
            id: cluster.id.clone(),
            session_id: Some(cluster.session_id.clone()),
            label: cluster.label.clone(),
            colour: Some(cluster.colour.clone()),
            description: cluster.description.clone(),
            created_at: Some(cluster.created_at.clone()),
        }
    }
}

impl ClusterRecord {
    fn into_cluster(self, session_id: &str) -> Cluster {
        let label = if self.label.trim().is_empty() {
            UNTITLED_CLUSTER.to_string()
        } else {
            self.label
        };
        let mut cluster = Cluster::new(session_id, label, self.colour, self.description);
        if let Some(created_at) = non_blank(self.created_at) {
            cluster.created_at = created_at;
        }
        cluster
    }
}

impl From<&PromptLog> for PromptLogRecord {
    fn from(log: &PromptLog) -> Self {
        Self {
            id: log.id.clone(),
            session_id: Some(log.session_id.clone()),
            node_id: log.node_id.clone(),
            prompt_text: log.prompt_text.clone(),
            response_text: log.response_text.clone(),
            timestamp: Some(log.timestamp.clone()),
        }
    }
}

impl From<&Session> for SessionExport {
    fn from(session: &Session) -> Self {
        Self {
            id: Some(session.id().to_string()),
            title: Some(session.title.clone()),
            facilitator_name: Some(session.facilitator_name.clone()),
            phase: Some(session.phase().to_string()),
            created_at: Some(session.created_at.clone()),
            nodes: session.nodes().iter().map(NodeRecord::from).collect(),
            clusters: session.clusters().iter().map(ClusterRecord::from).collect(),
            prompt_logs: session
                .prompt_logs()
                .iter()
                .map(PromptLogRecord::from)
                .collect(),
            reflection: session.reflection.clone(),
            root_node_id: session.root_node().map(|n| n.id().to_string()),
        }
    }
}

impl SessionExport {
    /// The session id written in the file, if any.
    pub fn original_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Rebuilds a live session under `session_id`.
    ///
    /// Clusters, nodes and prompt logs all get fresh ids; parent, cluster and
    /// node references are rewritten through id maps. Nodes are inserted
    /// parent-first, so a well-formed export keeps its original order.
    ///
    /// # Errors
    ///
    /// `Validation` if a node has blank text, two nodes share an id, or a
    /// node's parent is not in the file (including parent cycles).
    pub fn into_session(self, session_id: impl Into<String>) -> Result<Session> {
        let title = non_blank(self.title).unwrap_or_else(|| IMPORTED_SESSION_TITLE.to_string());
        let mut session =
            Session::with_id(session_id, Some(&title), self.facilitator_name.as_deref());

        if let Some(created_at) = non_blank(self.created_at) {
            session.created_at = created_at;
        }
        if let Some(phase) = self.phase.as_deref() {
            session.update_phase(phase);
        }
        session.reflection = non_blank(self.reflection);

        let sid = session.id().to_string();
        let mut cluster_ids = HashMap::new();
        for record in self.clusters {
            let old_id = record.id.clone();
            let new_id = session.add_cluster(record.into_cluster(&sid)).id.clone();
            if !old_id.is_empty() {
                cluster_ids.insert(old_id, new_id);
            }
        }

        let node_ids = rebuild_nodes(&mut session, self.nodes, &cluster_ids)?;

        for record in self.prompt_logs {
            let node_id = node_ids
                .get(&record.node_id)
                .cloned()
                .unwrap_or(record.node_id);
            let mut log = PromptLog::new(&sid, node_id, record.prompt_text, record.response_text);
            if let Some(timestamp) = non_blank(record.timestamp) {
                log.timestamp = timestamp;
            }
            session.add_prompt_log(log);
        }

        tracing::debug!(
            session_id = %sid,
            nodes = session.nodes().len(),
            clusters = session.clusters().len(),
            prompt_logs = session.prompt_logs().len(),
            "session rebuilt from export"
        );
        Ok(session)
    }
}

/// Inserts node records parent-first and returns the old-to-new id map.
fn rebuild_nodes(
    session: &mut Session,
    records: Vec<NodeRecord>,
    cluster_ids: &HashMap<String, String>,
) -> Result<HashMap<String, String>> {
    {
        let mut seen = HashSet::new();
        for record in &records {
            if !record.id.is_empty() && !seen.insert(record.id.as_str()) {
                return Err(GardenError::validation(format!(
                    "duplicate node id '{}'",
                    record.id
                )));
            }
        }
    }

    let mut node_ids: HashMap<String, String> = HashMap::new();
    let mut pending = records;
    while !pending.is_empty() {
        let before = pending.len();
        let mut deferred = Vec::new();

        for record in pending {
            let parent_id = match record.parent_id.as_deref().filter(|p| !p.is_empty()) {
                None => None,
                Some(old) => match node_ids.get(old) {
                    Some(new) => Some(new.clone()),
                    None => {
                        deferred.push(record);
                        continue;
                    }
                },
            };

            let new_id = session.add_node(record.to_draft(parent_id))?.id().to_string();
            if let Some(old_cluster) = record.cluster_id.as_deref() {
                match cluster_ids.get(old_cluster) {
                    Some(cluster_id) => {
                        session.assign_node_to_cluster(&new_id, Some(cluster_id));
                    }
                    None => tracing::debug!(
                        node_id = %new_id,
                        cluster_id = old_cluster,
                        "dropping reference to unknown cluster"
                    ),
                }
            }
            if !record.id.is_empty() {
                node_ids.insert(record.id, new_id);
            }
        }

        if deferred.len() == before {
            let missing: Vec<&str> = deferred
                .iter()
                .filter_map(|r| r.parent_id.as_deref())
                .collect();
            return Err(GardenError::validation(format!(
                "nodes reference missing parents: {}",
                missing.join(", ")
            )));
        }
        pending = deferred;
    }

    Ok(node_ids)
}

/// Serializes a session as indented JSON.
pub fn export_session_json(session: &Session) -> Result<String> {
    Ok(serde_json::to_string_pretty(&SessionExport::from(session))?)
}

/// Parses an export file without touching any session.
///
/// # Errors
///
/// `Serialization` if the text is not a JSON object of the export shape.
pub fn parse_session_json(json: &str) -> Result<SessionExport> {
    serde_json::from_str(json).map_err(|e| GardenError::Serialization {
        format: "JSON".to_string(),
        message: e.to_string(),
    })
}
