//! Chat-completion seam.

use async_trait::async_trait;
use garden_core::error::GardenError;
use std::time::Duration;
use thiserror::Error;

/// One system + user exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    /// Ask the model for a JSON object instead of free text
    pub json_response: bool,
}

impl ChatRequest {
    pub fn text(system: impl Into<String>, user: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature,
            json_response: false,
        }
    }

    pub fn json(system: impl Into<String>, user: impl Into<String>, temperature: f32) -> Self {
        Self {
            json_response: true,
            ..Self::text(system, user, temperature)
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    /// The provider answered with an error, or could not be reached
    #[error("Process error (status: {status_code:?}): {message}")]
    ProcessError {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("{0}")]
    Other(String),
}

impl AgentError {
    pub fn process_error_with_retry_after(
        status_code: u16,
        message: impl Into<String>,
        is_retryable: bool,
        retry_after: Duration,
    ) -> Self {
        Self::ProcessError {
            status_code: Some(status_code),
            message: message.into(),
            is_retryable,
            retry_after: Some(retry_after),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProcessError {
                is_retryable: true,
                ..
            }
        )
    }
}

impl From<AgentError> for GardenError {
    fn from(err: AgentError) -> Self {
        GardenError::adapter(err.to_string())
    }
}

/// Something that can answer a chat request with text.
#[async_trait]
pub trait ChatAgent: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_request_sets_flag() {
        let request = ChatRequest::json("sys", "user", 0.3);
        assert!(request.json_response);
        assert_eq!(request.system, "sys");
        assert!(!ChatRequest::text("sys", "user", 0.7).json_response);
    }

    #[test]
    fn test_agent_error_maps_to_adapter_failure() {
        let err = AgentError::process_error_with_retry_after(
            429,
            "slow down",
            true,
            Duration::from_secs(2),
        );
        assert!(err.is_retryable());

        let garden: GardenError = err.into();
        assert!(garden.is_adapter_failure());
        assert!(garden.to_string().contains("slow down"));
    }
}
