use serde::Deserialize;
use serde_json::Value;

use crate::stream::{lenient, lenient_seq};

/// One line of a Claude Code session transcript.
///
/// Only the fields needed to rebuild tool calls are modelled; everything else
/// (thinking blocks, snapshots, usage) is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClaudeRecord {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub record_type: String,
    #[serde(default, deserialize_with = "lenient")]
    pub cwd: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub timestamp: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<ClaudeMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ClaudeMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentBlock {
    ToolUse {
        #[serde(default, deserialize_with = "lenient")]
        id: String,
        #[serde(default, deserialize_with = "lenient")]
        name: String,
        #[serde(default)]
        input: Value,
    },
    ToolResult {
        #[serde(default, deserialize_with = "lenient")]
        tool_use_id: String,
        #[serde(default)]
        content: Value,
        #[serde(default)]
        is_error: Value,
    },
    #[serde(other)]
    Other,
}
