//! Degradation policy around the suggestion collaborator.
//!
//! Every call gets a deadline. A failure, a timeout or unusable output is
//! logged and replaced by the operation's fallback, so nothing here returns
//! an error and the workshop keeps moving when the collaborator is down.

use garden_core::config::{GardenConfig, SuggestionConfig};
use garden_core::error::{GardenError, Result};
use garden_core::suggestion::heuristics::{fallback_follow_up, is_vague};
use garden_core::suggestion::{
    ClusterSuggestions, IdeaSplit, ReflectionSummary, SuggestionAdapter, UnavailableAdapter,
    VaguenessCheck,
};
use garden_interaction::{LlmSuggestionAdapter, OpenAIApiAgent};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Wraps a [`SuggestionAdapter`] with timeouts and per-operation fallbacks.
pub struct SuggestionService {
    adapter: Arc<dyn SuggestionAdapter>,
    config: SuggestionConfig,
    timeout: Duration,
    cluster_min_nodes: usize,
}

impl SuggestionService {
    pub fn new(adapter: Arc<dyn SuggestionAdapter>, config: &GardenConfig) -> Self {
        Self {
            adapter,
            timeout: config.suggestion.timeout(),
            config: config.suggestion.clone(),
            cluster_min_nodes: config.workshop.cluster_min_nodes,
        }
    }

    /// Service whose collaborator always fails: every answer is a fallback.
    pub fn offline(config: &GardenConfig) -> Self {
        Self::new(Arc::new(UnavailableAdapter), config)
    }

    /// Uses OpenAI when credentials are found, and runs offline otherwise.
    pub fn from_config(config: &GardenConfig) -> Self {
        match OpenAIApiAgent::try_from_env(&config.suggestion) {
            Ok(agent) => {
                tracing::info!(model = %agent.model(), "suggestions use OpenAI chat completions");
                Self::new(Arc::new(LlmSuggestionAdapter::new(agent)), config)
            }
            Err(err) => {
                tracing::warn!(error = %err, "no suggestion collaborator, using fallbacks only");
                Self::offline(config)
            }
        }
    }

    /// Overrides the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cluster_min_nodes(&self) -> usize {
        self.cluster_min_nodes
    }

    /// Runs one collaborator call; `None` means "use the fallback".
    async fn guard<T>(&self, operation: &'static str, call: impl Future<Output = Result<T>>) -> Option<T> {
        let err = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(err)) => err,
            Err(_) => GardenError::timeout(operation, self.timeout),
        };
        tracing::warn!(operation, error = %err, "suggestion failed, using fallback");
        None
    }

    /// Splits a response into ideas; falls back to the whole response as one idea.
    pub async fn split_ideas(&self, text: &str) -> IdeaSplit {
        self.guard("split_ideas", self.adapter.split_ideas(text))
            .await
            .and_then(|split| split.validated().ok())
            .unwrap_or_else(|| IdeaSplit::single(text))
    }

    /// Local vagueness check. The collaborator is only consulted to phrase the
    /// nudge for a response already judged vague.
    pub async fn check_vagueness(&self, text: &str) -> VaguenessCheck {
        if !is_vague(text) {
            return VaguenessCheck::clear();
        }

        let nudge = self
            .guard("vagueness_nudge", self.adapter.vagueness_nudge(text))
            .await
            .filter(|nudge| !nudge.trim().is_empty())
            .unwrap_or_else(|| self.config.fallback_nudge.clone());
        VaguenessCheck::vague(nudge)
    }

    /// A question to go deeper beneath text at `depth`; falls back to a canned
    /// question for that depth.
    pub async fn follow_up(&self, text: &str, depth: u32) -> String {
        self.guard("follow_up", self.adapter.follow_up(text, depth))
            .await
            .filter(|question| !question.trim().is_empty())
            .unwrap_or_else(|| fallback_follow_up(depth, &self.config.fallback_follow_ups))
    }

    /// Proposed themes for `texts`. Too few texts short-circuit to no
    /// suggestions without calling the collaborator; failure also yields none.
    pub async fn suggest_clusters(&self, texts: &[String]) -> ClusterSuggestions {
        if texts.len() < self.cluster_min_nodes {
            tracing::debug!(
                nodes = texts.len(),
                required = self.cluster_min_nodes,
                "too few nodes to cluster"
            );
            return ClusterSuggestions::default();
        }

        self.guard("suggest_clusters", self.adapter.suggest_clusters(texts))
            .await
            .map(|suggestions| suggestions.validated(texts.len()))
            .unwrap_or_default()
    }

    /// Closing reflection; falls back to a generic summary.
    pub async fn reflect(&self, summary: &ReflectionSummary) -> String {
        self.guard("reflect", self.adapter.reflect(summary))
            .await
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| self.config.fallback_reflection.clone())
    }
}
