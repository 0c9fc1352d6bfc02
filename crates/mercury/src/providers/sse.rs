//! Decoding of the Server-Sent-Event stream returned by the completions endpoint.
//!
//! Only `data: ` lines matter. Their payload is either the `[DONE]` terminator or a json chunk;
//! anything else, including chunks that fail to parse, is skipped.
use serde::Deserialize;

pub const DONE_SENTINEL: &str = "[DONE]";

/// Splits arbitrary byte chunks into complete lines
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add bytes and return every line completed by them, without the line terminator
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            let line = String::from_utf8_lossy(&line);
            lines.push(line.trim_end_matches(['\n', '\r']).to_string());
        }
        lines
    }

    /// Whatever is left once the connection closed
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest: Vec<u8> = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).trim_end().to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    Done,
    Chunk(StreamChunk),
}

/// Interpret one line of the stream, `None` when it carries nothing we use
pub fn parse_line(line: &str) -> Option<SseLine> {
    let data = line.strip_prefix("data: ")?;
    if data.trim() == DONE_SENTINEL {
        return Some(SseLine::Done);
    }
    if !data.starts_with('{') {
        return None;
    }
    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => Some(SseLine::Chunk(chunk)),
        Err(e) => {
            tracing::warn!("Skipping malformed stream chunk: {}", e);
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

impl StreamChunk {
    pub fn first_choice(&self) -> Option<&ChunkChoice> {
        self.choices.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

/// A piece of a tool call as streamed, keyed by `index`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub function: Option<FunctionDelta>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FunctionDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}
