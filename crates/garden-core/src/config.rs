//! Configuration model.
//!
//! Every field has a default so a missing or partial `config.toml` is valid.

use crate::session::DEFAULT_SHALLOW_DEPTH;
use crate::suggestion::heuristics::{
    FALLBACK_FOLLOW_UPS, FALLBACK_NUDGE, FALLBACK_REFLECTION, MIN_NODES_FOR_CLUSTERING,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GardenConfig {
    pub suggestion: SuggestionConfig,
    pub workshop: WorkshopConfig,
}

/// How the suggestion collaborator is reached and how its failures degrade.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Upper bound for every collaborator call; exceeding it counts as failure.
    pub timeout_secs: u64,
    pub model: String,
    pub base_url: String,
    /// Cap on generated tokens per reply; unset leaves it to the provider.
    pub max_tokens: Option<u32>,
    pub fallback_follow_ups: Vec<String>,
    pub fallback_nudge: String,
    pub fallback_reflection: String,
}

impl SuggestionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_CHAT_COMPLETIONS_URL.to_string(),
            max_tokens: None,
            fallback_follow_ups: FALLBACK_FOLLOW_UPS.iter().map(|q| q.to_string()).collect(),
            fallback_nudge: FALLBACK_NUDGE.to_string(),
            fallback_reflection: FALLBACK_REFLECTION.to_string(),
        }
    }
}

/// Workshop thresholds used by the facilitator views.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorkshopConfig {
    pub shallow_depth: u32,
    pub cluster_min_nodes: usize,
    pub reflection_sample_size: usize,
    pub recent_nodes: usize,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            shallow_depth: DEFAULT_SHALLOW_DEPTH,
            cluster_min_nodes: MIN_NODES_FOR_CLUSTERING,
            reflection_sample_size: 10,
            recent_nodes: 5,
        }
    }
}

/// API credentials, kept apart from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct SecretConfig {
    #[serde(default)]
    pub openai: Option<OpenAIConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OpenAIConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}
