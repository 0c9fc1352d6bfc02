use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{RelayError, RelayResult};
use crate::models::tool::{Tool, ToolCallFragment};
use crate::search::{DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT};

pub const WEB_SEARCH: &str = "web_search";

/// The only tool offered to the model
pub fn web_search_tool() -> Tool {
    Tool::new(
        WEB_SEARCH,
        "Search the web for current information on any topic",
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "The search query"},
                "max_results": {
                    "type": "integer",
                    "description": "Max results (default: 3)",
                    "default": DEFAULT_MAX_RESULTS
                }
            },
            "required": ["query"]
        }),
    )
}

/// Arguments the model passes to `web_search`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebSearchArgs {
    #[serde(default)]
    pub query: String,
    // Models occasionally send numbers as strings or floats
    #[serde(default)]
    max_results: Option<Value>,
}

impl WebSearchArgs {
    pub fn from_call(call: &ToolCallFragment) -> RelayResult<Self> {
        let args: WebSearchArgs = call.parse_arguments()?;
        if args.query.trim().is_empty() {
            return Err(RelayError::Parse(format!(
                "arguments of tool call '{}': missing query",
                call.id
            )));
        }
        Ok(args)
    }

    pub fn max_results(&self) -> u32 {
        let requested = match &self.max_results {
            Some(Value::Number(n)) => n.as_f64().map(|n| n as i64),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        requested
            .map(|n| n.clamp(1, MAX_RESULTS_LIMIT as i64) as u32)
            .unwrap_or(DEFAULT_MAX_RESULTS)
    }
}
