//! Markdown shown to the user while tools run, and the digest of each search
use crate::models::search::SearchResult;

pub const CHECKING_TOOLS: &str = "🔧 **Step 1: Checking if tools are needed...**\n\n";
pub const NO_TOOLS_NEEDED: &str =
    "ℹ️ **No tools needed. Getting direct response with diffusing...**\n\n";
pub const GENERATING_FINAL: &str = "✨ **Step 2: Generating diffused response...**\n\n";
pub const SEARCHING: &str = "\n\n🔍 **Searching...**\n\n";
pub const AI_RESPONSE: &str = "**AI Response:**\n\n";

const SOURCES_SHOWN: usize = 3;
const SNIPPET_CHARS: usize = 150;

pub fn found_tool_calls(count: usize) -> String {
    format!("🔍 **Found {} tool call(s). Executing...**\n\n", count)
}

pub fn searching_for(query: &str) -> String {
    format!("🔍 **Searching for: {}**\n\n", query)
}

pub fn error_line(error: &str) -> String {
    format!("❌ Error: {}", error)
}

/// Cut `content` to a fixed number of characters, marking the cut with `...`
pub fn snippet(content: &str) -> String {
    match content.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

pub fn search_digest(result: &SearchResult) -> String {
    let mut digest = format!("**Search Results for: {}**\n\n", result.query);

    if let Some(answer) = &result.answer {
        digest.push_str(&format!("**Quick Answer:** {}\n\n", answer));
    }

    if !result.results.is_empty() {
        digest.push_str("**Sources:**\n");
        for (i, hit) in result.results.iter().take(SOURCES_SHOWN).enumerate() {
            let title = if hit.title.is_empty() {
                "No title"
            } else {
                &hit.title
            };
            digest.push_str(&format!(
                "{}. **{}**\n   {}\n   🔗 {}\n\n",
                i + 1,
                title,
                snippet(&hit.content),
                hit.url
            ));
        }
    }

    digest
}

/// What precedes the final answer once searches ran; empty when nothing was found
pub fn response_prefix(digests: &[String]) -> String {
    if digests.is_empty() {
        return String::new();
    }
    let mut prefix = digests.concat();
    prefix.push_str(AI_RESPONSE);
    prefix
}

/// A streamed reply after its searches, the digests standing where the searching banner was
pub fn searched(text: &str, digests: &[String]) -> String {
    format!("{}\n\n{}", text, digests.concat())
}
