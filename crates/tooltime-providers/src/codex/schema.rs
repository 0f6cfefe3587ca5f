use serde::Deserialize;
use serde_json::Value;

use crate::stream::lenient;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum CodexRecord {
    SessionMeta {
        #[serde(default, deserialize_with = "lenient")]
        payload: SessionMetaPayload,
    },
    TurnContext {
        #[serde(default, deserialize_with = "lenient")]
        payload: TurnContextPayload,
    },
    ResponseItem {
        #[serde(default)]
        timestamp: Value,
        #[serde(default, deserialize_with = "lenient")]
        payload: ResponseItem,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SessionMetaPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub cwd: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TurnContextPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub cwd: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ResponseItem {
    FunctionCall {
        #[serde(default, deserialize_with = "lenient")]
        name: String,
        /// JSON-encoded string in current rollouts, an object in some older ones
        #[serde(default)]
        arguments: Value,
        #[serde(default, deserialize_with = "lenient")]
        call_id: String,
    },
    FunctionCallOutput {
        #[serde(default, deserialize_with = "lenient")]
        call_id: String,
        #[serde(default)]
        output: Value,
    },
    CustomToolCall {
        #[serde(default, deserialize_with = "lenient")]
        name: String,
        #[serde(default, deserialize_with = "lenient")]
        call_id: String,
    },
    CustomToolCallOutput {
        #[serde(default, deserialize_with = "lenient")]
        call_id: String,
        #[serde(default)]
        output: Value,
    },
    #[default]
    #[serde(other)]
    Other,
}
