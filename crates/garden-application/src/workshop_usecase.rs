//! Workshop use case.
//!
//! `WorkshopUseCase` drives every flow of a causality-garden workshop over the
//! session collection: seeding, collecting and analysing responses, deepening,
//! clustering, reflecting, and moving sessions in and out as JSON.
//!
//! # Locking
//!
//! Each session sits behind its own mutex. Flows that consult the suggestion
//! collaborator take what they need under the lock, release it for the call,
//! and re-validate against the live tree once they lock again, so a slow
//! collaborator never blocks other work on the same session.

use crate::suggestion_service::SuggestionService;
use crate::views::{
    ClusterOutcome, Dashboard, Deepening, ParticipantView, ReflectionView, ResponseAnalysis,
    SessionSummary,
};
use garden_core::config::WorkshopConfig;
use garden_core::error::{GardenError, Result};
use garden_core::id::generate_id;
use garden_core::repository::{SessionHandle, SessionRepository};
use garden_core::session::{Agency, Author, Cluster, NodeDraft, PromptLog, Session};
use garden_core::suggestion::heuristics::split_sentences;
use garden_core::suggestion::ReflectionSummary;
use garden_infrastructure::dto::{export_session_json, parse_session_json, SessionExport};
use garden_infrastructure::sample::sample_session;
use std::sync::Arc;

/// Appended to the title of an import whose id was already taken.
pub const IMPORTED_TITLE_SUFFIX: &str = " (imported)";

pub struct WorkshopUseCase {
    sessions: Arc<dyn SessionRepository>,
    suggestions: Arc<SuggestionService>,
    workshop: WorkshopConfig,
}

impl WorkshopUseCase {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        suggestions: Arc<SuggestionService>,
        workshop: WorkshopConfig,
    ) -> Self {
        Self {
            sessions,
            suggestions,
            workshop,
        }
    }

    async fn session(&self, session_id: &str) -> Result<SessionHandle> {
        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| GardenError::not_found("Session", session_id))
    }

    // ============================================================================
    // Sessions
    // ============================================================================

    /// Creates a session and, when `seed` has content, a facilitator root node.
    pub async fn create_session(
        &self,
        title: Option<&str>,
        facilitator_name: Option<&str>,
        seed: Option<&str>,
    ) -> Result<String> {
        let mut session = Session::new(title, facilitator_name);
        if let Some(seed) = seed.map(str::trim).filter(|s| !s.is_empty()) {
            session.add_node(NodeDraft::root(seed))?;
        }

        let session_id = session.id().to_string();
        self.sessions.insert(session).await?;
        tracing::info!(session_id = %session_id, "session created");
        Ok(session_id)
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let mut summaries = Vec::new();
        for handle in self.sessions.list_all().await? {
            summaries.push(SessionSummary::from(&*handle.lock().await));
        }
        Ok(summaries)
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<bool> {
        let removed = self.sessions.delete(session_id).await?;
        if removed {
            tracing::info!(session_id, "session deleted");
        }
        Ok(removed)
    }

    /// Moves the session to the named phase; unknown names are ignored and
    /// reported as `false`.
    pub async fn update_phase(&self, session_id: &str, phase: &str) -> Result<bool> {
        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        Ok(session.update_phase(phase))
    }

    // ============================================================================
    // Views
    // ============================================================================

    pub async fn dashboard(&self, session_id: &str) -> Result<Dashboard> {
        let handle = self.session(session_id).await?;
        let session = handle.lock().await;
        Ok(Dashboard::build(&session, self.workshop.shallow_depth))
    }

    pub async fn participant_view(&self, session_id: &str) -> Result<ParticipantView> {
        let handle = self.session(session_id).await?;
        let session = handle.lock().await;
        Ok(ParticipantView::build(&session, self.workshop.recent_nodes))
    }

    pub async fn reflection_view(&self, session_id: &str) -> Result<ReflectionView> {
        let handle = self.session(session_id).await?;
        let session = handle.lock().await;
        Ok(ReflectionView {
            session_id: session.id().to_string(),
            title: session.title.clone(),
            stats: session.stats_with_depth(self.workshop.shallow_depth),
            cluster_counts: session.cluster_counts(),
            reflection: session.reflection.clone(),
            reflection_sentences: session
                .reflection
                .as_deref()
                .map(split_sentences)
                .unwrap_or_default(),
        })
    }

    // ============================================================================
    // Responses and nodes
    // ============================================================================

    /// Splits, checks and proposes a follow-up for a response without
    /// touching the tree.
    ///
    /// The depth is the parent's level + 1, or 0 when there is no parent or
    /// the parent is unknown.
    pub async fn analyse_response(
        &self,
        session_id: &str,
        response: &str,
        parent_id: Option<&str>,
    ) -> Result<ResponseAnalysis> {
        if response.trim().is_empty() {
            return Err(GardenError::validation("response must not be empty"));
        }

        let depth = {
            let handle = self.session(session_id).await?;
            let session = handle.lock().await;
            parent_id
                .and_then(|id| session.get_node(id))
                .map(|parent| parent.level() + 1)
                .unwrap_or(0)
        };

        let split = self.suggestions.split_ideas(response).await;
        let vagueness = self.suggestions.check_vagueness(response).await;
        let follow_up = self.suggestions.follow_up(response, depth).await;

        Ok(ResponseAnalysis {
            original_response: response.to_string(),
            parent_id: parent_id.map(str::to_string),
            depth,
            split,
            vagueness,
            follow_up,
        })
    }

    /// Inserts one participant node per non-blank text under `parent_id`.
    ///
    /// # Errors
    ///
    /// `NotFound` if `parent_id` is given but not in the session; nothing is
    /// inserted in that case.
    pub async fn commit_ideas(
        &self,
        session_id: &str,
        parent_id: Option<&str>,
        ideas: &[String],
    ) -> Result<Vec<String>> {
        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        if let Some(parent_id) = parent_id {
            if session.get_node(parent_id).is_none() {
                return Err(GardenError::not_found("Node", parent_id));
            }
        }
        insert_texts(&mut session, parent_id, ideas)
    }

    /// Commits an analysis: its split ideas, or the original response when it
    /// held a single idea.
    pub async fn commit_analysis(
        &self,
        session_id: &str,
        analysis: &ResponseAnalysis,
    ) -> Result<Vec<String>> {
        self.commit_ideas(
            session_id,
            analysis.parent_id.as_deref(),
            &analysis.node_texts(),
        )
        .await
    }

    /// Adds a single node as written.
    pub async fn add_node(
        &self,
        session_id: &str,
        text: &str,
        parent_id: Option<&str>,
        author: Author,
    ) -> Result<String> {
        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        let draft = NodeDraft::new(text.trim(), parent_id.map(str::to_string), author);
        Ok(session.add_node(draft)?.id().to_string())
    }

    /// Participant quick path: split and insert straight away.
    ///
    /// An unknown or since-deleted parent is dropped and the nodes are added
    /// without one.
    pub async fn quick_submit(
        &self,
        session_id: &str,
        response: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<String>> {
        if response.trim().is_empty() {
            return Err(GardenError::validation("response must not be empty"));
        }
        let handle = self.session(session_id).await?;

        let split = self.suggestions.split_ideas(response).await;
        let texts = if split.is_multiple() {
            split.ideas.into_iter().map(|idea| idea.text).collect()
        } else {
            vec![response.to_string()]
        };

        let mut session = handle.lock().await;
        let parent_id = parent_id.filter(|id| session.get_node(id).is_some());
        insert_texts(&mut session, parent_id, &texts)
    }

    /// Asks a follow-up question about a node and logs it.
    pub async fn deepen_node(&self, session_id: &str, node_id: &str) -> Result<Deepening> {
        let handle = self.session(session_id).await?;
        let (text, level) = {
            let session = handle.lock().await;
            let node = session
                .get_node(node_id)
                .ok_or_else(|| GardenError::not_found("Node", node_id))?;
            (node.text().to_string(), node.level())
        };

        let question = self.suggestions.follow_up(&text, level).await;

        let mut session = handle.lock().await;
        let log = PromptLog::new(session.id(), node_id, question.clone(), None);
        let prompt_log_id = session.add_prompt_log(log).id.clone();
        tracing::debug!(session_id, node_id, "follow-up logged");
        Ok(Deepening {
            node_id: node_id.to_string(),
            question,
            prompt_log_id,
        })
    }

    /// Deletes a node and its subtree; returns how many nodes went.
    pub async fn delete_node(&self, session_id: &str, node_id: &str) -> Result<usize> {
        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        Ok(session.delete_node(node_id))
    }

    pub async fn set_agency(
        &self,
        session_id: &str,
        node_id: &str,
        agency: Option<Agency>,
    ) -> Result<()> {
        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        let node = session
            .node_mut(node_id)
            .ok_or_else(|| GardenError::not_found("Node", node_id))?;
        node.agency = agency;
        Ok(())
    }

    pub async fn set_needs_deepening(
        &self,
        session_id: &str,
        node_id: &str,
        needs_deepening: bool,
    ) -> Result<()> {
        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        let node = session
            .node_mut(node_id)
            .ok_or_else(|| GardenError::not_found("Node", node_id))?;
        node.needs_deepening = needs_deepening;
        Ok(())
    }

    // ============================================================================
    // Clusters
    // ============================================================================

    /// Asks for themes over the whole tree and, if any come back, replaces the
    /// session's clusters with them.
    ///
    /// Indices in the answer refer to the node list as it was sent; nodes
    /// deleted while the collaborator was thinking are skipped.
    pub async fn suggest_clusters(&self, session_id: &str) -> Result<ClusterOutcome> {
        let handle = self.session(session_id).await?;
        let (node_ids, texts): (Vec<String>, Vec<String>) = {
            let session = handle.lock().await;
            session
                .nodes()
                .iter()
                .map(|n| (n.id().to_string(), n.text().to_string()))
                .unzip()
        };

        let required = self.suggestions.cluster_min_nodes();
        if texts.len() < required {
            return Ok(ClusterOutcome::TooFewNodes {
                node_count: texts.len(),
                required,
            });
        }

        let suggestions = self.suggestions.suggest_clusters(&texts).await;
        if suggestions.is_empty() {
            return Ok(ClusterOutcome::NoSuggestions);
        }

        let mut session = handle.lock().await;
        session.clear_clusters();
        let sid = session.id().to_string();
        let mut assigned_nodes = 0;
        for suggestion in &suggestions.clusters {
            let cluster = Cluster::new(
                sid.as_str(),
                suggestion.label.clone(),
                None,
                suggestion.description.clone(),
            );
            let cluster_id = session.add_cluster(cluster).id.clone();
            for node_id in suggestion.node_indices.iter().filter_map(|&i| node_ids.get(i)) {
                if session.assign_node_to_cluster(node_id, Some(&cluster_id)).is_some() {
                    assigned_nodes += 1;
                }
            }
        }

        let outcome = ClusterOutcome::Applied {
            clusters: suggestions.clusters.len(),
            assigned_nodes,
        };
        tracing::info!(session_id, ?outcome, "cluster suggestions applied");
        Ok(outcome)
    }

    /// Creates a cluster by hand; a blank colour picks one from the palette.
    pub async fn create_cluster(
        &self,
        session_id: &str,
        label: &str,
        colour: Option<String>,
        description: &str,
    ) -> Result<String> {
        let label = label.trim();
        if label.is_empty() {
            return Err(GardenError::validation("cluster label must not be empty"));
        }
        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        let cluster = Cluster::new(session.id(), label, colour, description.trim());
        Ok(session.add_cluster(cluster).id.clone())
    }

    /// Puts a node in a cluster (`None` clears it).
    ///
    /// Returns `false` without changing anything when the cluster is unknown.
    ///
    /// # Errors
    ///
    /// `NotFound` if the node is not in the session.
    pub async fn assign_node(
        &self,
        session_id: &str,
        node_id: &str,
        cluster_id: Option<&str>,
    ) -> Result<bool> {
        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        if session.get_node(node_id).is_none() {
            return Err(GardenError::not_found("Node", node_id));
        }
        Ok(session.assign_node_to_cluster(node_id, cluster_id).is_some())
    }

    // ============================================================================
    // Reflection and reset
    // ============================================================================

    /// Generates the closing reflection and stores it on the session.
    pub async fn generate_reflection(&self, session_id: &str) -> Result<String> {
        let handle = self.session(session_id).await?;
        let summary = {
            let session = handle.lock().await;
            ReflectionSummary::from_session(&session, self.workshop.reflection_sample_size)
        };

        let reflection = self.suggestions.reflect(&summary).await;
        handle.lock().await.reflection = Some(reflection.clone());
        Ok(reflection)
    }

    /// Clears the tree, clusters, prompt logs and reflection in one step.
    pub async fn reset_tree(&self, session_id: &str) -> Result<()> {
        let handle = self.session(session_id).await?;
        handle.lock().await.reset_tree();
        tracing::info!(session_id, "tree reset");
        Ok(())
    }

    // ============================================================================
    // Export, import and sample
    // ============================================================================

    pub async fn export_session(&self, session_id: &str) -> Result<String> {
        let handle = self.session(session_id).await?;
        let session = handle.lock().await;
        export_session_json(&session)
    }

    /// Adds a session from exported JSON and returns its id.
    ///
    /// The file's id is kept when free. When it is taken, a fresh id is
    /// generated and " (imported)" is appended to the title.
    ///
    /// # Errors
    ///
    /// `Serialization` for malformed JSON and `Validation` for a broken tree;
    /// the collection is unchanged in both cases.
    pub async fn import_session(&self, json: &str) -> Result<String> {
        let export = parse_session_json(json)?;

        let original_id = export.original_id().map(str::to_string);
        let mut collided = match original_id.as_deref() {
            Some(id) => self.sessions.contains(id).await?,
            None => false,
        };
        let session_id = match original_id {
            Some(id) if !collided => id,
            _ => generate_id("session"),
        };

        let session = imported_session(export.clone(), session_id, collided)?;
        let mut session_id = session.id().to_string();
        match self.sessions.insert(session).await {
            Ok(_) => {}
            // Another import took the id after it was checked.
            Err(err) if err.is_conflict() && !collided => {
                collided = true;
                let session = imported_session(export, generate_id("session"), true)?;
                session_id = session.id().to_string();
                self.sessions.insert(session).await?;
            }
            Err(err) => return Err(err),
        }
        tracing::info!(session_id = %session_id, collided, "session imported");
        Ok(session_id)
    }

    /// Adds a fresh copy of the bundled sample workshop.
    pub async fn load_sample(&self) -> Result<String> {
        let session = sample_session()?;
        let session_id = session.id().to_string();
        self.sessions.insert(session).await?;
        Ok(session_id)
    }
}

fn imported_session(export: SessionExport, session_id: String, collided: bool) -> Result<Session> {
    let mut session = export.into_session(session_id)?;
    if collided {
        session.title.push_str(IMPORTED_TITLE_SUFFIX);
    }
    Ok(session)
}

fn insert_texts(
    session: &mut Session,
    parent_id: Option<&str>,
    texts: &[String],
) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    for text in texts.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        let draft = NodeDraft::new(text, parent_id.map(str::to_string), Author::Participant);
        ids.push(session.add_node(draft)?.id().to_string());
    }
    Ok(ids)
}
