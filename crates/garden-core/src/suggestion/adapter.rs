//! The suggestion collaborator contract.

use super::model::{ClusterSuggestions, IdeaSplit, ReflectionSummary};
use crate::error::{GardenError, Result};
use async_trait::async_trait;

/// An external text-analysis collaborator (hosted model, local inference, stub).
///
/// Implementations report failures honestly through `Result`; they never see
/// or mutate a session. Graceful degradation (timeouts and fallback values) is
/// applied by the caller, so every operation here may fail freely.
#[async_trait]
pub trait SuggestionAdapter: Send + Sync {
    /// Splits a response into the smallest meaningful separate causes.
    async fn split_ideas(&self, text: &str) -> Result<IdeaSplit>;

    /// Phrases a supportive nudge for a response already judged vague.
    async fn vagueness_nudge(&self, text: &str) -> Result<String>;

    /// One short question to go deeper beneath a node at `depth`.
    async fn follow_up(&self, text: &str, depth: u32) -> Result<String>;

    /// Groups node texts into themes; indices refer to positions in `texts`.
    async fn suggest_clusters(&self, texts: &[String]) -> Result<ClusterSuggestions>;

    /// A 3-4 sentence closing reflection.
    async fn reflect(&self, summary: &ReflectionSummary) -> Result<String>;
}

/// Adapter used when no collaborator is configured: every call fails, so every
/// caller receives its fallback.
#[derive(Debug, Clone, Default)]
pub struct UnavailableAdapter;

impl UnavailableAdapter {
    fn unavailable<T>() -> Result<T> {
        Err(GardenError::adapter("no suggestion collaborator configured"))
    }
}

#[async_trait]
impl SuggestionAdapter for UnavailableAdapter {
    async fn split_ideas(&self, _text: &str) -> Result<IdeaSplit> {
        Self::unavailable()
    }

    async fn vagueness_nudge(&self, _text: &str) -> Result<String> {
        Self::unavailable()
    }

    async fn follow_up(&self, _text: &str, _depth: u32) -> Result<String> {
        Self::unavailable()
    }

    async fn suggest_clusters(&self, _texts: &[String]) -> Result<ClusterSuggestions> {
        Self::unavailable()
    }

    async fn reflect(&self, _summary: &ReflectionSummary) -> Result<String> {
        Self::unavailable()
    }
}
