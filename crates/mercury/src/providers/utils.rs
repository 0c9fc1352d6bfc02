use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::base::ProbeOutcome;
use super::sse::{StreamChunk, ToolCallDelta};
use crate::models::event::{ChatMode, StreamEvent};
use crate::models::message::Message;
use crate::models::tool::{Tool, ToolCallFragment};

pub const TOOL_CALLS_FINISH_REASON: &str = "tool_calls";

/// Convert internal Tool format to OpenAI's API tool specification
pub fn tools_to_openai_spec(tools: &[Tool]) -> Result<Vec<Value>> {
    let mut tool_names = std::collections::HashSet::new();
    let mut result = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(anyhow!("Duplicate tool name: {}", tool.name));
        }

        result.push(json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.parameters,
            }
        }));
    }

    Ok(result)
}

/// Build the streaming completion request body
pub fn completion_payload(
    model: &str,
    max_tokens: u32,
    messages: &[Message],
    mode: ChatMode,
    tools: &[Tool],
) -> Result<Value> {
    let mut payload = json!({
        "model": model,
        "messages": messages,
        "max_tokens": max_tokens,
        "stream": true,
        "diffusing": mode.diffusing(),
    });

    if !tools.is_empty() {
        payload
            .as_object_mut()
            .ok_or_else(|| anyhow!("Payload is not an object"))?
            .insert("tools".to_string(), json!(tools_to_openai_spec(tools)?));
    }

    Ok(payload)
}

/// Pull a readable message out of an error body returned by the model API
pub fn provider_error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        error => Some(
            error
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string()),
        ),
    }
}

/// Merges streamed tool call pieces by their index
#[derive(Debug, Default, Clone)]
pub struct ToolCallAccumulator {
    slots: BTreeMap<usize, ToolCallFragment>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, delta: &ToolCallDelta) {
        let slot = self.slots.entry(delta.index).or_default();

        if let Some(id) = delta.id.as_deref().filter(|id| !id.is_empty()) {
            slot.id = id.to_string();
        }
        if let Some(function) = &delta.function {
            if let Some(name) = function.name.as_deref().filter(|name| !name.is_empty()) {
                slot.name = name.to_string();
            }
            if let Some(arguments) = &function.arguments {
                slot.arguments.push_str(arguments);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The calls seen so far, ordered by index
    pub fn snapshot(&self) -> Vec<ToolCallFragment> {
        self.slots.values().cloned().collect()
    }

    pub fn finish(self) -> Vec<ToolCallFragment> {
        self.slots.into_values().collect()
    }
}

/// Folds stream chunks into display snapshots, remembering text and tool calls along the way
#[derive(Debug, Clone)]
pub struct ChunkAccumulator {
    mode: ChatMode,
    text: String,
    tool_calls: ToolCallAccumulator,
    tool_calls_finished: bool,
}

impl ChunkAccumulator {
    pub fn new(mode: ChatMode) -> Self {
        Self {
            mode,
            text: String::new(),
            tool_calls: ToolCallAccumulator::new(),
            tool_calls_finished: false,
        }
    }

    /// Apply one chunk and return the events it produces, in order
    pub fn apply(&mut self, chunk: &StreamChunk) -> Vec<StreamEvent> {
        let Some(choice) = chunk.first_choice() else {
            return Vec::new();
        };
        let mut events = Vec::new();

        if let Some(content) = &choice.delta.content {
            match self.mode {
                ChatMode::Streaming => {
                    if !content.is_empty() {
                        self.text.push_str(content);
                        events.push(StreamEvent::content(self.text.clone(), self.mode));
                    }
                }
                // Each tick is a full candidate, accumulating would duplicate it
                ChatMode::Diffusing => {
                    self.text = content.clone();
                    events.push(StreamEvent::content(content.clone(), self.mode));
                }
            }
        }

        if let Some(deltas) = &choice.delta.tool_calls {
            for delta in deltas {
                self.tool_calls.apply(delta);
            }
        }

        if choice.finish_reason.as_deref() == Some(TOOL_CALLS_FINISH_REASON)
            && !self.tool_calls.is_empty()
        {
            self.tool_calls_finished = true;
            events.push(StreamEvent::ToolCalls {
                content: self.text.clone(),
                calls: self.tool_calls.snapshot(),
            });
        }

        events
    }

    pub fn tool_calls_finished(&self) -> bool {
        self.tool_calls_finished
    }

    pub fn into_probe(self) -> ProbeOutcome {
        ProbeOutcome {
            text: self.text,
            tool_calls: self.tool_calls.finish(),
        }
    }
}
