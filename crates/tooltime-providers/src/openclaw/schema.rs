use serde::Deserialize;
use serde_json::Value;

use crate::stream::lenient;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum OpenClawRecord {
    Session {
        #[serde(default, deserialize_with = "lenient")]
        id: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        cwd: Option<String>,
    },
    ModelChange {
        #[serde(rename = "modelId", default, deserialize_with = "lenient")]
        model_id: Option<String>,
    },
    Message {
        #[serde(default)]
        timestamp: Value,
        #[serde(default, deserialize_with = "lenient")]
        message: Option<OpenClawMessage>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OpenClawMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub role: String,
    /// Kept raw: result text is gathered from every block, typed or not
    #[serde(default)]
    pub content: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub tool_call_id: String,
    #[serde(default)]
    pub is_error: Value,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum OpenClawBlock {
    #[serde(rename = "toolCall")]
    ToolCall {
        #[serde(default, deserialize_with = "lenient")]
        id: String,
        #[serde(default, deserialize_with = "lenient")]
        name: String,
        #[serde(default)]
        arguments: Value,
    },
    #[serde(other)]
    Other,
}
