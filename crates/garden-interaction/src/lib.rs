//! Interaction layer: talking to a hosted language model.
//!
//! - `agent`: the minimal chat-completion seam (`ChatAgent`) and its errors
//! - `openai_api_agent`: `ChatAgent` over the OpenAI Chat Completions API
//! - `llm_suggestion_adapter`: `SuggestionAdapter` built on any `ChatAgent`

pub mod agent;
pub mod llm_suggestion_adapter;
pub mod openai_api_agent;

pub use agent::{AgentError, ChatAgent, ChatRequest};
pub use llm_suggestion_adapter::LlmSuggestionAdapter;
pub use openai_api_agent::OpenAIApiAgent;
