use serde::{Deserialize, Serialize};

use super::tool::ToolCallFragment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// A single entry in the conversation sent to the model API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallFragment>>,
}

impl Message {
    fn new<S: Into<String>>(role: Role, content: S) -> Self {
        Message {
            role,
            content: content.into(),
            tool_call_id: None,
            name: None,
            tool_calls: None,
        }
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Message::new(Role::User, content)
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Message::new(Role::Assistant, content)
    }

    /// The assistant turn that requested tools, needed so the model can correlate the results
    pub fn assistant_tool_calls<S: Into<String>>(
        content: S,
        tool_calls: Vec<ToolCallFragment>,
    ) -> Self {
        Message {
            tool_calls: Some(tool_calls),
            ..Message::new(Role::Assistant, content)
        }
    }

    pub fn tool_result<I, N, C>(tool_call_id: I, name: N, content: C) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        C: Into<String>,
    {
        Message {
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
            ..Message::new(Role::Tool, content)
        }
    }
}
