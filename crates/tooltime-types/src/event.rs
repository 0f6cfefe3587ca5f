use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::session::extract_session_id;

// NOTE: Schema Design
//
// One line of events.jsonl == one UnifiedEvent. Two writers produce these lines:
// - Live hooks append PreToolUse / PostToolUse / SessionEnd records as they happen
// - Transcript parsers append a single ToolUse record per completed call
//
// Both shapes must coexist in the same log, so `event` keeps the hook kinds
// distinguishable instead of collapsing them into ToolUse.

/// Current schema version written to the `v` field
pub const SCHEMA_VERSION: u32 = 1;

fn schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Kind of record in the event log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EventKind {
    /// Completed call emitted by a transcript parser
    ToolUse,
    /// Hook record: call about to run
    PreToolUse,
    /// Hook record: call finished, carries the outcome
    PostToolUse,
    SessionEnd,
    #[default]
    #[serde(other)]
    Other,
}

impl EventKind {
    /// Call-kind: represents the start of a tool invocation
    pub fn is_call(self) -> bool {
        matches!(self, EventKind::ToolUse | EventKind::PreToolUse)
    }

    /// Result-kind: may carry the outcome of an invocation
    pub fn is_result(self) -> bool {
        matches!(self, EventKind::ToolUse | EventKind::PostToolUse)
    }
}

/// Transcript dialect that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "claude-code")]
    ClaudeCode,
    #[serde(rename = "codex")]
    Codex,
    #[serde(rename = "openclaw")]
    OpenClaw,
    /// Any source name this build does not know about
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl Source {
    /// Every source with a transcript parser
    pub const ALL: [Source; 3] = [Source::ClaudeCode, Source::Codex, Source::OpenClaw];

    pub fn as_str(self) -> &'static str {
        match self {
            Source::ClaudeCode => "claude-code",
            Source::Codex => "codex",
            Source::OpenClaw => "openclaw",
            Source::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude-code" | "claude_code" | "claude" => Ok(Source::ClaudeCode),
            "codex" => Ok(Source::Codex),
            "openclaw" | "moltbot" | "clawdbot" => Ok(Source::OpenClaw),
            other => Err(format!("unknown source: {}", other)),
        }
    }
}

/// Canonical record of one tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedEvent {
    #[serde(default = "schema_version")]
    pub v: u32,

    /// `<session-id>-<seq>`; unique within the log
    pub id: String,

    /// Accepts ISO-8601 text or epoch milliseconds on read, always writes text
    #[serde(with = "crate::time::serde_ts")]
    pub ts: DateTime<Utc>,

    #[serde(rename = "event", default)]
    pub kind: EventKind,

    /// Raw tool name as reported by the source
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tool: String,

    /// Working directory of the session
    #[serde(default, deserialize_with = "null_as_empty")]
    pub project: String,

    /// Truncated failure text; None for successful or unresolved calls
    #[serde(default, deserialize_with = "loose_text")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "loose_text")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "loose_text")]
    pub skill: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "loose_text")]
    pub model: Option<String>,
}

impl UnifiedEvent {
    /// Completed call with no outcome attached yet
    pub fn tool_use(
        id: impl Into<String>,
        ts: DateTime<Utc>,
        tool: impl Into<String>,
        project: impl Into<String>,
        source: Source,
    ) -> Self {
        Self {
            v: SCHEMA_VERSION,
            id: id.into(),
            ts,
            kind: EventKind::ToolUse,
            tool: tool.into(),
            project: project.into(),
            error: None,
            source: Some(source),
            file: None,
            skill: None,
            model: None,
        }
    }

    /// Session identifier derived from the id suffix
    pub fn session_id(&self) -> &str {
        extract_session_id(&self.id)
    }

    pub fn is_call(&self) -> bool {
        self.kind.is_call()
    }

    /// Result-kind event carrying a non-null error
    pub fn is_error(&self) -> bool {
        self.kind.is_result() && self.error.is_some()
    }

    /// Source name used for bucketing; unset sources fall into "unknown"
    pub fn source_name(&self) -> &'static str {
        self.source.unwrap_or(Source::Unknown).as_str()
    }
}

/// Hook writers are loosely typed: any non-null scalar or structure is kept
/// as text rather than costing the whole line
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_text(deserializer)?.unwrap_or_default())
}
