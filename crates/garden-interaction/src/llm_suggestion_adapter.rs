//! Suggestion adapter backed by a chat model.
//!
//! Each adapter operation is one chat exchange. Structured answers are asked
//! for as JSON objects and validated before they leave this module; anything
//! unparseable becomes an `Adapter` error so the caller can fall back.

use crate::agent::{ChatAgent, ChatRequest};
use async_trait::async_trait;
use garden_core::error::{GardenError, Result};
use garden_core::suggestion::{ClusterSuggestions, IdeaSplit, ReflectionSummary, SuggestionAdapter};
use serde::de::DeserializeOwned;

const SPLIT_PROMPT: &str = r#"A workshop participant has sent one message.

1. Decide whether it holds one idea or several.
2. If several, break it into the smallest separate causes that still make sense alone.
3. Classify each cause as a concrete situation, an inferred cause, or a vague feeling.
4. Answer with JSON only, shaped exactly like this:
{
  "idea_count": number,
  "ideas": [
    {
      "text": "string",
      "type": "concrete_situation|inferred_cause|vague_feeling"
    }
  ]
}"#;

const NUDGE_PROMPT: &str = "The participant's answer was vague. Invite them, warmly, to describe \
a situation, a moment or a context where this shows up. Use fewer than 20 words.";

const FOLLOW_UP_PROMPT: &str = "You support a causality-mapping workshop. You receive a node's \
text and its depth in the tree (0 is the root). Write ONE short question that helps the group go \
a level deeper. If the text is vague, ask for an example instead. Stay under 18 words and reply \
with the question alone.";

const CLUSTER_PROMPT: &str = r#"You help a facilitator group the causes collected in a causality garden.
You receive a list of node texts, one per line.
Sort them into 4 to 7 themes.
Where they fit, reuse these names: Identity, Environment, Growth, Security, Relationships, Health/Wellbeing.
Otherwise invent a short new name.
Refer to nodes by their 0-based position in the list and never reword them.
Answer with JSON of the form {"clusters": [{"label": "string", "description": "string", "node_indices": [numbers]}]}."#;

const REFLECTION_PROMPT: &str = "You help a facilitator close a causality garden workshop. From \
the summary you receive, write a short reflection of 3 to 4 sentences that names the main themes, \
points out patterns or tensions between them, and proposes a sensible next area of focus. Keep the \
tone supportive.";

const SPLIT_TEMPERATURE: f32 = 0.3;
const CLUSTER_TEMPERATURE: f32 = 0.5;
const CREATIVE_TEMPERATURE: f32 = 0.7;

/// [`SuggestionAdapter`] that asks a [`ChatAgent`] for every answer.
pub struct LlmSuggestionAdapter<A> {
    agent: A,
}

impl<A: ChatAgent> LlmSuggestionAdapter<A> {
    pub fn new(agent: A) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    /// One exchange; a failure the provider marks retryable gets a single
    /// second attempt. The caller's timeout bounds both.
    async fn complete(&self, operation: &str, request: ChatRequest) -> Result<String> {
        match self.agent.complete(request.clone()).await {
            Err(err) if err.is_retryable() => {
                tracing::debug!(operation, error = %err, "retrying suggestion request");
                Ok(self.agent.complete(request).await?)
            }
            reply => Ok(reply?),
        }
    }

    async fn ask_text(&self, operation: &str, request: ChatRequest) -> Result<String> {
        let reply = self.complete(operation, request).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(GardenError::adapter(format!("{operation}: empty reply")));
        }
        Ok(reply.to_string())
    }

    async fn ask_json<T: DeserializeOwned>(&self, operation: &str, request: ChatRequest) -> Result<T> {
        let reply = self.complete(operation, request).await?;
        serde_json::from_str(json_body(&reply)).map_err(|e| {
            GardenError::adapter(format!("{operation}: unparseable reply: {e}"))
        })
    }
}

/// The JSON object inside a reply, without Markdown fences or chatter around it.
fn json_body(reply: &str) -> &str {
    let reply = reply.trim();
    match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => reply,
    }
}

#[async_trait]
impl<A: ChatAgent> SuggestionAdapter for LlmSuggestionAdapter<A> {
    async fn split_ideas(&self, text: &str) -> Result<IdeaSplit> {
        let split: IdeaSplit = self
            .ask_json("split_ideas", ChatRequest::json(SPLIT_PROMPT, text, SPLIT_TEMPERATURE))
            .await?;
        split.validated()
    }

    async fn vagueness_nudge(&self, text: &str) -> Result<String> {
        self.ask_text(
            "vagueness_nudge",
            ChatRequest::text(NUDGE_PROMPT, text, CREATIVE_TEMPERATURE),
        )
        .await
    }

    async fn follow_up(&self, text: &str, depth: u32) -> Result<String> {
        let user = serde_json::json!({ "text": text, "depth": depth }).to_string();
        self.ask_text(
            "follow_up",
            ChatRequest::text(FOLLOW_UP_PROMPT, user, CREATIVE_TEMPERATURE),
        )
        .await
    }

    async fn suggest_clusters(&self, texts: &[String]) -> Result<ClusterSuggestions> {
        let user = format!("- {}", texts.join("\n- "));
        let suggestions: ClusterSuggestions = self
            .ask_json(
                "suggest_clusters",
                ChatRequest::json(CLUSTER_PROMPT, user, CLUSTER_TEMPERATURE),
            )
            .await?;
        Ok(suggestions.validated(texts.len()))
    }

    async fn reflect(&self, summary: &ReflectionSummary) -> Result<String> {
        let user = serde_json::to_string(summary)?;
        self.ask_text(
            "reflect",
            ChatRequest::text(REFLECTION_PROMPT, user, CREATIVE_TEMPERATURE),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentError;
    use garden_core::suggestion::{ClusterSummary, IdeaType};
    use std::sync::Mutex;

    /// Replies with a fixed string and remembers what it was asked.
    struct ScriptedAgent {
        reply: std::result::Result<String, AgentError>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedAgent {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(AgentError::ProcessError {
                    status_code: Some(503),
                    message: "overloaded".into(),
                    is_retryable: true,
                    retry_after: None,
                }),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn last_request(&self) -> ChatRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ChatAgent for ScriptedAgent {
        async fn complete(&self, request: ChatRequest) -> std::result::Result<String, AgentError> {
            self.requests.lock().unwrap().push(request);
            self.reply.clone()
        }
    }

    #[tokio::test]
    async fn test_split_ideas_parses_fenced_json() {
        let adapter = LlmSuggestionAdapter::new(ScriptedAgent::replying(
            "```json\n{\"idea_count\": 2, \"ideas\": [\
             {\"text\": \"Pay is low\", \"type\": \"inferred_cause\"},\
             {\"text\": \"Rota changes weekly\", \"type\": \"concrete_situation\"}]}\n```",
        ));

        let split = adapter.split_ideas("Pay is low and the rota changes weekly").await.unwrap();
        assert_eq!(split.idea_count, 2);
        assert_eq!(split.ideas[1].idea_type, IdeaType::ConcreteSituation);

        let request = adapter.agent().last_request();
        assert!(request.json_response);
        assert_eq!(request.user, "Pay is low and the rota changes weekly");
        assert!((request.temperature - SPLIT_TEMPERATURE).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_adapter_error() {
        let adapter = LlmSuggestionAdapter::new(ScriptedAgent::replying("I think there are two ideas."));
        let err = adapter.split_ideas("anything").await.unwrap_err();
        assert!(err.is_adapter_failure());
        assert!(err.to_string().contains("split_ideas"));

        let adapter = LlmSuggestionAdapter::new(ScriptedAgent::replying(r#"{"idea_count": 0, "ideas": []}"#));
        assert!(adapter.split_ideas("anything").await.unwrap_err().is_adapter_failure());
    }

    #[tokio::test]
    async fn test_agent_failure_is_adapter_error() {
        let adapter = LlmSuggestionAdapter::new(ScriptedAgent::failing());
        let err = adapter.follow_up("Pay is low", 1).await.unwrap_err();
        assert!(err.is_adapter_failure());
        assert!(err.to_string().contains("overloaded"));
        assert_eq!(adapter.agent().calls(), 2);
    }

    /// Fails with the given error until `failures` calls have been made.
    struct FlakyAgent {
        error: AgentError,
        failures: usize,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl ChatAgent for FlakyAgent {
        async fn complete(&self, _request: ChatRequest) -> std::result::Result<String, AgentError> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls <= self.failures {
                Err(self.error.clone())
            } else {
                Ok("What keeps pay low?".to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_retryable_failure_is_tried_once_more() {
        let adapter = LlmSuggestionAdapter::new(FlakyAgent {
            error: AgentError::ProcessError {
                status_code: Some(429),
                message: "slow down".into(),
                is_retryable: true,
                retry_after: None,
            },
            failures: 1,
            calls: Mutex::new(0),
        });
        assert_eq!(adapter.follow_up("Pay is low", 1).await.unwrap(), "What keeps pay low?");
        assert_eq!(*adapter.agent().calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let adapter = LlmSuggestionAdapter::new(FlakyAgent {
            error: AgentError::ProcessError {
                status_code: Some(401),
                message: "bad key".into(),
                is_retryable: false,
                retry_after: None,
            },
            failures: 1,
            calls: Mutex::new(0),
        });
        assert!(adapter.follow_up("Pay is low", 1).await.unwrap_err().is_adapter_failure());
        assert_eq!(*adapter.agent().calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_follow_up_sends_text_and_depth() {
        let adapter = LlmSuggestionAdapter::new(ScriptedAgent::replying("  What makes pay low?\n"));
        let question = adapter.follow_up("Pay is low", 2).await.unwrap();
        assert_eq!(question, "What makes pay low?");

        let request = adapter.agent().last_request();
        assert!(!request.json_response);
        let sent: serde_json::Value = serde_json::from_str(&request.user).unwrap();
        assert_eq!(sent["text"], "Pay is low");
        assert_eq!(sent["depth"], 2);
    }

    #[tokio::test]
    async fn test_blank_text_reply_is_rejected() {
        let adapter = LlmSuggestionAdapter::new(ScriptedAgent::replying("   "));
        assert!(adapter.vagueness_nudge("maybe").await.unwrap_err().is_adapter_failure());
    }

    #[tokio::test]
    async fn test_suggest_clusters_lists_texts_and_drops_bad_indices() {
        let adapter = LlmSuggestionAdapter::new(ScriptedAgent::replying(
            r#"{"clusters": [{"label": "Security", "description": "money", "node_indices": [0, 2, 11]}]}"#,
        ));
        let texts: Vec<String> = ["Pay", "Rota", "Contracts"].iter().map(|t| t.to_string()).collect();

        let suggestions = adapter.suggest_clusters(&texts).await.unwrap();
        assert_eq!(suggestions.clusters[0].node_indices, vec![0, 2]);

        let request = adapter.agent().last_request();
        assert_eq!(request.user, "- Pay\n- Rota\n- Contracts");
        assert!(request.json_response);
    }

    #[tokio::test]
    async fn test_reflect_sends_summary_json() {
        let adapter = LlmSuggestionAdapter::new(ScriptedAgent::replying("Security dominated."));
        let summary = ReflectionSummary {
            total_nodes: 6,
            clusters: vec![ClusterSummary {
                label: "Security".into(),
                node_count: 4,
            }],
            sample_nodes: vec!["Pay".into()],
        };

        assert_eq!(adapter.reflect(&summary).await.unwrap(), "Security dominated.");
        let sent: serde_json::Value =
            serde_json::from_str(&adapter.agent().last_request().user).unwrap();
        assert_eq!(sent["total_nodes"], 6);
        assert_eq!(sent["clusters"][0]["node_count"], 4);
    }

    #[test]
    fn test_json_body_extraction() {
        assert_eq!(json_body("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(json_body("Sure! {\"a\": {\"b\": 2}} Hope that helps"), "{\"a\": {\"b\": 2}}");
        assert_eq!(json_body("no json here"), "no json here");
    }
}
