use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use mercury::providers::base::{ChatProvider, KeyStatus};
use mercury::providers::configs::DEFAULT_MAX_TOKENS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct ValidateRequest {
    api_key: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct ValidateResponse {
    valid: bool,
    error: Option<String>,
}

impl From<KeyStatus> for ValidateResponse {
    fn from(status: KeyStatus) -> Self {
        Self {
            valid: status.is_valid(),
            error: status.error_message(),
        }
    }
}

async fn handler(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Json<ValidateResponse> {
    let provider = state.inception(&request.api_key, DEFAULT_MAX_TOKENS);
    let status = provider.validate_key().await;

    if let Some(error) = status.error_message() {
        tracing::info!("API key rejected: {}", error);
    }
    Json(status.into())
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/validate-api-key", post(handler))
        .with_state(state)
}
