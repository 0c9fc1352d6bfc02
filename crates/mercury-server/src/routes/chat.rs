use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use futures::{stream::BoxStream, Stream};
use mercury::models::event::{ChatMode, StreamEvent};
use mercury::models::message::Message;
use mercury::orchestrator::{ChatOptions, Orchestrator};
use mercury::providers::configs::DEFAULT_MAX_TOKENS;
use serde::Deserialize;
use std::{
    convert::Infallible,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

#[derive(Debug, Deserialize)]
struct ChatRequest {
    messages: Vec<Message>,
    mode: ChatMode,
    inception_api_key: String,
    #[serde(default)]
    tavily_api_key: Option<String>,
    #[serde(default)]
    tools_enabled: bool,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

/// Streams `data: ...` lines as plain text, mirroring the upstream framing
pub struct SseResponse {
    events: BoxStream<'static, StreamEvent>,
}

impl SseResponse {
    fn new(events: BoxStream<'static, StreamEvent>) -> Self {
        Self { events }
    }
}

impl Stream for SseResponse {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match self.events.as_mut().poll_next(cx) {
                Poll::Ready(Some(event)) => {
                    // Tool call markers have no wire form
                    if let Some(line) = event.to_sse_line() {
                        return Poll::Ready(Some(Ok(Bytes::from(line))));
                    }
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl IntoResponse for SseResponse {
    fn into_response(self) -> axum::response::Response {
        let body = axum::body::Body::from_stream(self);

        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::CACHE_CONTROL, "no-cache"),
                (header::CONNECTION, "keep-alive"),
            ],
            body,
        )
            .into_response()
    }
}

async fn handler(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> SseResponse {
    let provider = state.inception(&request.inception_api_key, request.max_tokens);
    let mut orchestrator = Orchestrator::new(Arc::new(provider));
    if let Some(search) = state.tavily(request.tavily_api_key.as_deref()) {
        orchestrator = orchestrator.with_search(Arc::new(search));
    }

    tracing::info!(
        mode = %request.mode,
        tools_enabled = request.tools_enabled,
        messages = request.messages.len(),
        "Chat request"
    );

    let options = ChatOptions::new(request.mode, request.tools_enabled);
    SseResponse::new(orchestrator.reply(request.messages, options))
}

pub fn routes(state: AppState) -> Router {
    Router::new().route("/chat", post(handler)).with_state(state)
}
