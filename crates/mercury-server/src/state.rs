use mercury::providers::configs::InceptionProviderConfig;
use mercury::providers::inception::InceptionProvider;
use mercury::search::tavily::{TavilyConfig, TavilySearch};

use crate::configuration::UpstreamSettings;

/// Shared application state.
///
/// Credentials arrive with each request, so only the connection pool and the upstream locations are shared.
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub upstream: UpstreamSettings,
}

impl AppState {
    pub fn new(upstream: UpstreamSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            upstream,
        }
    }

    pub fn inception(&self, api_key: &str, max_tokens: u32) -> InceptionProvider {
        let config = InceptionProviderConfig::new(api_key)
            .with_host(&self.upstream.inception_host)
            .with_model(&self.upstream.model)
            .with_max_tokens(max_tokens);
        InceptionProvider::with_client(self.client.clone(), config)
    }

    /// A search adapter when the caller sent a usable key
    pub fn tavily(&self, api_key: Option<&str>) -> Option<TavilySearch> {
        let api_key = api_key.map(str::trim).filter(|key| !key.is_empty())?;
        let config = TavilyConfig::new(api_key).with_host(&self.upstream.tavily_host);
        Some(TavilySearch::with_client(self.client.clone(), config))
    }
}
