use serde::{Deserialize, Serialize};
use serde_json::json;
use strum_macros::{Display, EnumString};

use super::tool::ToolCallFragment;

/// How the model renders its answer while it is being generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ChatMode {
    /// Text grows tick by tick and is accumulated locally
    #[default]
    Streaming,
    /// Every tick carries a complete rewritten candidate
    Diffusing,
}

impl ChatMode {
    pub fn diffusing(&self) -> bool {
        matches!(self, ChatMode::Diffusing)
    }

    pub fn toggled(&self) -> Self {
        match self {
            ChatMode::Streaming => ChatMode::Diffusing,
            ChatMode::Diffusing => ChatMode::Streaming,
        }
    }
}

/// One item of a display sequence
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A snapshot of the text to show
    Content { content: String, mode: ChatMode },
    /// A terminal failure for this exchange
    Error { error: String },
    /// The model finished by requesting tools; carries the text so far and the merged calls
    ToolCalls {
        content: String,
        calls: Vec<ToolCallFragment>,
    },
    /// The upstream terminator
    Done,
}

impl StreamEvent {
    pub fn content<S: Into<String>>(content: S, mode: ChatMode) -> Self {
        StreamEvent::Content {
            content: content.into(),
            mode,
        }
    }

    pub fn error<S: Into<String>>(error: S) -> Self {
        StreamEvent::Error {
            error: error.into(),
        }
    }

    /// Encode as a `data: ...` line for callers of the relay.
    ///
    /// Tool call markers are internal to the orchestrator and have no wire form.
    pub fn to_sse_line(&self) -> Option<String> {
        let payload = match self {
            StreamEvent::Content { content, mode } => json!({ "content": content, "mode": mode }),
            StreamEvent::Error { error } => json!({ "error": error }),
            StreamEvent::Done => return Some("data: [DONE]\n\n".to_string()),
            StreamEvent::ToolCalls { .. } => return None,
        };
        Some(format!("data: {}\n\n", payload))
    }
}
