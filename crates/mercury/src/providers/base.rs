use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::errors::{RelayError, RelayResult};
use crate::models::event::{ChatMode, StreamEvent};
use crate::models::message::Message;
use crate::models::tool::{Tool, ToolCallFragment};

/// Everything a probe call produced once its stream was fully consumed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub text: String,
    pub tool_calls: Vec<ToolCallFragment>,
}

/// Result of checking an API key against the model API.
///
/// Every variant other than `Valid` means the key cannot be used, the variants only keep the causes apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStatus {
    Valid,
    Rejected { status: u16, message: String },
    TimedOut,
    Unreachable(String),
}

impl KeyStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, KeyStatus::Valid)
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            KeyStatus::Valid => None,
            KeyStatus::Rejected { message, .. } => Some(message.clone()),
            KeyStatus::TimedOut => Some("Request timed out".to_string()),
            KeyStatus::Unreachable(detail) => Some(format!("Network error: {}", detail)),
        }
    }

    pub fn into_result(self) -> RelayResult<()> {
        match self {
            KeyStatus::Valid => Ok(()),
            KeyStatus::Rejected { message, .. } => Err(RelayError::Validation(message)),
            other => Err(RelayError::Transport(other.error_message().unwrap_or_default())),
        }
    }
}

/// A chat completion API that streams its answers
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Run a non-diffusing request with tools attached and consume it completely
    async fn probe(&self, messages: &[Message], tools: &[Tool]) -> RelayResult<ProbeOutcome>;

    /// Start a request whose snapshots are handed out as they arrive
    fn display(
        &self,
        messages: Vec<Message>,
        mode: ChatMode,
        tools: Vec<Tool>,
    ) -> BoxStream<'static, StreamEvent>;

    /// Check that the configured API key is accepted
    async fn validate_key(&self) -> KeyStatus;
}
