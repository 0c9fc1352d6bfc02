use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{RelayError, RelayResult};

/// A tool that can be offered to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// JSON schema of the arguments the tool accepts
    pub parameters: Value,
}

impl Tool {
    /// Create a new tool with the given name and description
    pub fn new<N, D>(name: N, description: D, parameters: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Tool {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A tool call assembled from streamed deltas.
///
/// `arguments` is a JSON document in progress and is only complete once the stream has ended.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "WireToolCall", from = "WireToolCall")]
pub struct ToolCallFragment {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl ToolCallFragment {
    pub fn new<I, N, A>(id: I, name: N, arguments: A) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        A: Into<String>,
    {
        ToolCallFragment {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parse the accumulated arguments into a typed payload
    pub fn parse_arguments<T: DeserializeOwned>(&self) -> RelayResult<T> {
        serde_json::from_str(&self.arguments).map_err(|e| {
            RelayError::Parse(format!("arguments of tool call '{}': {}", self.id, e))
        })
    }
}

// The openai-compatible encoding of a tool call inside an assistant message
#[derive(Serialize, Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: WireFunction,
}

#[derive(Serialize, Deserialize)]
struct WireFunction {
    #[serde(default)]
    name: String,
    #[serde(default)]
    arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

impl From<ToolCallFragment> for WireToolCall {
    fn from(fragment: ToolCallFragment) -> Self {
        WireToolCall {
            id: fragment.id,
            kind: function_type(),
            function: WireFunction {
                name: fragment.name,
                arguments: fragment.arguments,
            },
        }
    }
}

impl From<WireToolCall> for ToolCallFragment {
    fn from(wire: WireToolCall) -> Self {
        ToolCallFragment {
            id: wire.id,
            name: wire.function.name,
            arguments: wire.function.arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Args {
        query: String,
    }

    #[test]
    fn test_parse_arguments() {
        let fragment = ToolCallFragment::new("call_1", "web_search", "{\"query\":\"weather\"}");
        let args: Args = fragment.parse_arguments().unwrap();
        assert_eq!(args.query, "weather");
    }

    #[test]
    fn test_parse_incomplete_arguments() {
        let fragment = ToolCallFragment::new("call_1", "web_search", "{\"query\":\"wea");
        let err = fragment.parse_arguments::<Args>().unwrap_err();
        assert!(matches!(err, RelayError::Parse(_)));
    }

    #[test]
    fn test_deserialize_from_openai_shape() {
        let fragment: ToolCallFragment = serde_json::from_value(json!({
            "id": "call_9",
            "type": "function",
            "function": {"name": "web_search", "arguments": "{}"}
        }))
        .unwrap();
        assert_eq!(fragment, ToolCallFragment::new("call_9", "web_search", "{}"));
    }
}
