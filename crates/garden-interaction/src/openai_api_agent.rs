//! OpenAIApiAgent - Direct REST API implementation for OpenAI chat completions.
//!
//! Configuration priority: ~/.config/garden/secret.json > environment variables.

use crate::agent::{AgentError, ChatAgent, ChatRequest};
use async_trait::async_trait;
use garden_core::config::{SuggestionConfig, DEFAULT_CHAT_COMPLETIONS_URL, DEFAULT_MODEL};
use garden_infrastructure::storage::SecretStorage;
use reqwest::{header::HeaderValue, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Agent implementation that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAIApiAgent {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: Option<u32>,
}

impl OpenAIApiAgent {
    /// Creates a new agent with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_CHAT_COMPLETIONS_URL.to_string(),
            max_tokens: None,
        }
    }

    /// Loads credentials from ~/.config/garden/secret.json or environment variables.
    ///
    /// Priority:
    /// 1. ~/.config/garden/secret.json
    /// 2. Environment variables (OPENAI_API_KEY, OPENAI_MODEL_NAME)
    ///
    /// The model falls back to `config.model`; the endpoint and token limit
    /// always come from `config`.
    pub fn try_from_env(config: &SuggestionConfig) -> Result<Self, AgentError> {
        let default_model = if config.model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            config.model.clone()
        };

        // Secret file first
        if let Ok(storage) = SecretStorage::new() {
            match storage.load() {
                Ok(Some(secrets)) => {
                    if let Some(openai) = secrets.openai {
                        let model = openai.model_name.unwrap_or(default_model);
                        return Ok(Self::new(openai.api_key, model).with_config(config));
                    }
                }
                Ok(None) => {}
                Err(err) => tracing::warn!(
                    path = %storage.path().display(),
                    error = %err,
                    "ignoring unreadable secret file"
                ),
            }
        }

        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AgentError::ExecutionFailed(
                    "OPENAI_API_KEY not found in ~/.config/garden/secret.json or environment variables"
                        .into(),
                )
            })?;

        let model = env::var("OPENAI_MODEL_NAME").unwrap_or(default_model);
        Ok(Self::new(api_key, model).with_config(config))
    }

    /// Applies the endpoint and token limit from the suggestion settings.
    pub fn with_config(self, config: &SuggestionConfig) -> Self {
        let agent = self.with_base_url(&config.base_url);
        match config.max_tokens {
            Some(max_tokens) => agent.with_max_tokens(max_tokens),
            None => agent,
        }
    }

    /// Points the agent at another chat-completions compatible endpoint.
    /// A blank URL keeps the current one.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        if !base_url.trim().is_empty() {
            self.base_url = base_url.trim().to_string();
        }
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: ChatRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: self.max_tokens,
            response_format: request.json_response.then_some(ResponseFormat {
                r#type: "json_object",
            }),
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String, AgentError> {
        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| AgentError::ProcessError {
                status_code: None,
                message: format!("OpenAI API request failed: {err}"),
                is_retryable: err.is_connect() || err.is_timeout(),
                retry_after: None,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| AgentError::Other(format!("Failed to parse OpenAI response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl ChatAgent for OpenAIApiAgent {
    async fn complete(&self, request: ChatRequest) -> Result<String, AgentError> {
        let body = self.build_request(request);
        tracing::debug!(
            model = %body.model,
            json = body.response_format.is_some(),
            "sending chat completion"
        );
        self.send_request(&body).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, AgentError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            AgentError::ExecutionFailed("OpenAI API returned no content in the response".into())
        })
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> AgentError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    match retry_after {
        Some(delay) => {
            AgentError::process_error_with_retry_after(status.as_u16(), message, is_retryable, delay)
        }
        None => AgentError::ProcessError {
            status_code: Some(status.as_u16()),
            message,
            is_retryable,
            retry_after: None,
        },
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // Only the delay-seconds form; HTTP-dates are ignored.
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let agent = OpenAIApiAgent::new("sk-test", "gpt-4.1-mini").with_max_tokens(200);
        let body = agent.build_request(ChatRequest::json("system text", "user text", 0.3));
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["model"], "gpt-4.1-mini");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], "system text");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["max_tokens"], 200);
        assert!((value["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_with_config_applies_endpoint_and_token_limit() {
        let config = SuggestionConfig {
            base_url: "http://localhost:8080/v1/chat/completions".into(),
            max_tokens: Some(300),
            ..SuggestionConfig::default()
        };
        let agent = OpenAIApiAgent::new("k", "m").with_config(&config);
        assert_eq!(agent.base_url, "http://localhost:8080/v1/chat/completions");
        let value = serde_json::to_value(agent.build_request(ChatRequest::text("s", "u", 0.7))).unwrap();
        assert_eq!(value["max_tokens"], 300);

        let agent = OpenAIApiAgent::new("k", "m").with_config(&SuggestionConfig::default());
        assert_eq!(agent.base_url, DEFAULT_CHAT_COMPLETIONS_URL);
        assert!(agent.max_tokens.is_none());
    }

    #[test]
    fn test_text_request_omits_response_format() {
        let agent = OpenAIApiAgent::new("sk-test", "gpt-4.1-mini");
        let body = agent.build_request(ChatRequest::text("s", "u", 0.7));
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("response_format").is_none());
        assert!(value.get("max_tokens").is_none());
    }

    #[test]
    fn test_base_url_override() {
        let agent = OpenAIApiAgent::new("k", "m").with_base_url("  ");
        assert_eq!(agent.base_url, DEFAULT_CHAT_COMPLETIONS_URL);
        let agent = agent.with_base_url("http://localhost:8080/v1/chat/completions");
        assert_eq!(agent.base_url, "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_extract_text_response() {
        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "Why?"}}]}"#).unwrap();
        assert_eq!(extract_text_response(parsed).unwrap(), "Why?");

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            extract_text_response(empty),
            Err(AgentError::ExecutionFailed(_))
        ));
    }

    #[test]
    fn test_map_http_error() {
        let err = map_http_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#.to_string(),
            Some(Duration::from_secs(3)),
        );
        match err {
            AgentError::ProcessError {
                status_code,
                message,
                is_retryable,
                retry_after,
            } => {
                assert_eq!(status_code, Some(429));
                assert_eq!(message, "Rate limit reached");
                assert!(is_retryable);
                assert_eq!(retry_after, Some(Duration::from_secs(3)));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = map_http_error(StatusCode::UNAUTHORIZED, "bad key".to_string(), None);
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("bad key"));
    }

    #[test]
    fn test_parse_retry_after() {
        let header = HeaderValue::from_static("7");
        assert_eq!(parse_retry_after(Some(&header)), Some(Duration::from_secs(7)));
        let date = HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_retry_after(Some(&date)), None);
        assert_eq!(parse_retry_after(None), None);
    }
}
