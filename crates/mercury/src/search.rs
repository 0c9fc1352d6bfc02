use async_trait::async_trait;

use crate::models::search::SearchOutcome;

pub mod tavily;

#[cfg(test)]
pub mod mock;

pub const DEFAULT_MAX_RESULTS: u32 = 3;
pub const MAX_RESULTS_LIMIT: u32 = 10;

/// A web search backend.
///
/// Implementations never fail past this boundary, problems come back as `SearchOutcome::Failed`.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> SearchOutcome;
}
