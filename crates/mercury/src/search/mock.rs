use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::SearchProvider;
use crate::models::search::SearchOutcome;

/// Replays canned outcomes and records the queries it was asked
pub struct MockSearch {
    outcomes: Arc<Mutex<Vec<SearchOutcome>>>,
    queries: Arc<Mutex<Vec<(String, u32)>>>,
}

impl MockSearch {
    pub fn new(outcomes: Vec<SearchOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(outcomes)),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn queries(&self) -> Vec<(String, u32)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(&self, query: &str, max_results: u32) -> SearchOutcome {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            SearchOutcome::failed("Search error: no canned result")
        } else {
            outcomes.remove(0)
        }
    }
}
