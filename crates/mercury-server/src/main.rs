mod configuration;
mod error;
mod routes;
mod state;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let settings = configuration::Settings::new()?;

    let origins = settings
        .cors
        .origins()
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let state = state::AppState::new(settings.upstream.clone());
    let app = routes::configure(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(settings.server.socket_addr()?).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
