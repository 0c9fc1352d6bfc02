use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};

use super::base::{ChatProvider, KeyStatus, ProbeOutcome};
use super::configs::InceptionProviderConfig;
use super::sse::{parse_line, LineBuffer, SseLine};
use super::utils::{completion_payload, provider_error_message, ChunkAccumulator};
use crate::errors::{RelayError, RelayResult};
use crate::models::event::{ChatMode, StreamEvent};
use crate::models::message::Message;
use crate::models::tool::Tool;

/// Streaming client for the Inception Labs completions API
#[derive(Clone)]
pub struct InceptionProvider {
    client: Client,
    config: InceptionProviderConfig,
}

impl InceptionProvider {
    pub fn new(config: InceptionProviderConfig) -> RelayResult<Self> {
        // No overall timeout, completions stream for as long as the model writes
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing connection pool
    pub fn with_client(client: Client, config: InceptionProviderConfig) -> Self {
        Self { client, config }
    }

    async fn post_stream(&self, payload: Value) -> RelayResult<Response> {
        let url = self.config.completions_url();
        tracing::debug!(url = %url, diffusing = %payload["diffusing"], "Opening completion stream");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response),
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), "Completion request rejected");
                Err(RelayError::UpstreamStatus {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    fn payload(&self, messages: &[Message], mode: ChatMode, tools: &[Tool]) -> RelayResult<Value> {
        completion_payload(
            &self.config.model,
            self.config.max_tokens,
            messages,
            mode,
            tools,
        )
        .map_err(|e| RelayError::Parse(format!("completion request: {}", e)))
    }
}

#[async_trait]
impl ChatProvider for InceptionProvider {
    async fn probe(&self, messages: &[Message], tools: &[Tool]) -> RelayResult<ProbeOutcome> {
        let payload = self.payload(messages, ChatMode::Streaming, tools)?;
        let response = self.post_stream(payload).await?;

        let mut stream = response.bytes_stream();
        let mut lines = LineBuffer::new();
        let mut accumulator = ChunkAccumulator::new(ChatMode::Streaming);

        'read: while let Some(bytes) = stream.next().await {
            for line in lines.push(&bytes?) {
                match parse_line(&line) {
                    Some(SseLine::Done) => break 'read,
                    Some(SseLine::Chunk(chunk)) => {
                        accumulator.apply(&chunk);
                    }
                    None => {}
                }
            }
        }
        if let Some(SseLine::Chunk(chunk)) = lines.finish().as_deref().and_then(parse_line) {
            accumulator.apply(&chunk);
        }

        let outcome = accumulator.into_probe();
        tracing::debug!(tool_calls = outcome.tool_calls.len(), "Probe finished");
        Ok(outcome)
    }

    fn display(
        &self,
        messages: Vec<Message>,
        mode: ChatMode,
        tools: Vec<Tool>,
    ) -> BoxStream<'static, StreamEvent> {
        let provider = self.clone();

        let stream = async_stream::stream! {
            let response = match provider.payload(&messages, mode, &tools) {
                Ok(payload) => provider.post_stream(payload).await,
                Err(e) => Err(e),
            };
            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    yield StreamEvent::error(e.to_string());
                    return;
                }
            };

            let mut bytes_stream = response.bytes_stream();
            let mut lines = LineBuffer::new();
            let mut accumulator = ChunkAccumulator::new(mode);

            while let Some(bytes) = bytes_stream.next().await {
                let bytes = match bytes {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield StreamEvent::error(e.to_string());
                        return;
                    }
                };
                for line in lines.push(&bytes) {
                    match parse_line(&line) {
                        Some(SseLine::Done) => {
                            yield StreamEvent::Done;
                            return;
                        }
                        Some(SseLine::Chunk(chunk)) => {
                            for event in accumulator.apply(&chunk) {
                                yield event;
                            }
                            if accumulator.tool_calls_finished() {
                                return;
                            }
                        }
                        None => {}
                    }
                }
            }

            match lines.finish().as_deref().and_then(parse_line) {
                Some(SseLine::Done) => yield StreamEvent::Done,
                Some(SseLine::Chunk(chunk)) => {
                    for event in accumulator.apply(&chunk) {
                        yield event;
                    }
                }
                None => {}
            }
        };

        stream.boxed()
    }

    async fn validate_key(&self) -> KeyStatus {
        let payload = json!({
            "model": self.config.model,
            "messages": [Message::user("Hi")],
            "max_tokens": 1
        });

        let result = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .timeout(self.config.validation_timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => KeyStatus::Valid,
            Ok(response) => {
                let status = response.status().as_u16();
                let message = response
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|body| provider_error_message(&body))
                    .unwrap_or_else(|| format!("API request failed with status {}", status));
                KeyStatus::Rejected { status, message }
            }
            Err(e) if e.is_timeout() => KeyStatus::TimedOut,
            Err(e) => KeyStatus::Unreachable(e.to_string()),
        }
    }
}
