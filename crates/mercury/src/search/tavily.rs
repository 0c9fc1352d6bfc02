use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::SearchProvider;
use crate::errors::RelayResult;
use crate::models::search::{SearchHit, SearchOutcome, SearchResult};

pub const TAVILY_HOST: &str = "https://api.tavily.com";
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct TavilyConfig {
    pub host: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl TavilyConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            host: TAVILY_HOST.to_string(),
            api_key: api_key.into(),
            timeout: SEARCH_TIMEOUT,
        }
    }

    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.host.trim_end_matches('/'))
    }
}

#[derive(Debug, Default, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<SearchHit>,
}

impl TavilyResponse {
    fn into_result(self, query: &str) -> SearchResult {
        SearchResult {
            answer: self.answer.filter(|answer| !answer.is_empty()),
            results: self.results,
            query: query.to_string(),
        }
    }
}

/// Search adapter for the Tavily API
#[derive(Clone)]
pub struct TavilySearch {
    client: Client,
    config: TavilyConfig,
}

impl TavilySearch {
    pub fn new(config: TavilyConfig) -> RelayResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn with_client(client: Client, config: TavilyConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str, max_results: u32) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::failed("Search error: query cannot be empty");
        }

        let payload = json!({
            "api_key": self.config.api_key,
            "query": query,
            "search_depth": "basic",
            "include_answer": true,
            "max_results": max_results,
            "include_raw_content": false
        });
        tracing::debug!(query = %query, max_results, "Searching the web");

        let response = match self
            .client
            .post(self.config.search_url())
            .json(&payload)
            .timeout(self.config.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Search request failed: {}", e);
                return SearchOutcome::failed(format!("Search error: {}", e));
            }
        };

        match response.status() {
            StatusCode::OK => match response.json::<TavilyResponse>().await {
                Ok(body) => SearchOutcome::Found(body.into_result(query)),
                Err(e) => SearchOutcome::failed(format!("Search error: {}", e)),
            },
            status => {
                tracing::warn!(status = status.as_u16(), "Search rejected");
                SearchOutcome::failed(format!("Search failed with status: {}", status.as_u16()))
            }
        }
    }
}
