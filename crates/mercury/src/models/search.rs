use serde::{Deserialize, Serialize};

/// One hit returned by the search API, reduced to the fields we show and forward
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub answer: Option<String>,
    pub results: Vec<SearchHit>,
    pub query: String,
}

/// What a search call produced. A failure replaces the whole result with its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    Found(SearchResult),
    Failed { error: String },
}

impl SearchOutcome {
    pub fn failed<S: Into<String>>(error: S) -> Self {
        SearchOutcome::Failed {
            error: error.into(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SearchOutcome::Found(_) => None,
            SearchOutcome::Failed { error } => Some(error),
        }
    }

    /// Serialized form appended to the conversation as the tool result
    pub fn to_tool_content(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }
}
