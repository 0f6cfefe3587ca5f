//! Fixtures for event and transcript generation.
//!
//! Timestamps are relative to 2026-01-15 (a Thursday, ISO week 3) so tests
//! can reason about weeks and weekdays without a calendar.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use tooltime_types::{EventKind, Source, UnifiedEvent, event_id, format_timestamp};

/// UTC instant `day_offset` days after 2026-01-15 at `hour`:00
pub fn ts(day_offset: i64, hour: u32) -> DateTime<Utc> {
    let base = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
    base + Duration::days(day_offset) + Duration::hours(i64::from(hour))
}

/// Same as `ts`, rendered the way transcripts write it
pub fn ts_str(day_offset: i64, hour: u32) -> String {
    format_timestamp(&ts(day_offset, hour))
}

/// Builder for a single unified event.
///
/// Defaults: `PreToolUse` in session `abc-def-ghi`, seq 1, at noon on the base
/// day, from claude-code in `/root/projects/test`.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    tool: String,
    kind: EventKind,
    error: Option<String>,
    session: String,
    seq: u64,
    at: DateTime<Utc>,
    source: Option<Source>,
    project: String,
    skill: Option<String>,
    file: Option<String>,
}

/// Start building an event for `tool`
pub fn ev(tool: &str) -> EventBuilder {
    EventBuilder {
        tool: tool.to_string(),
        kind: EventKind::PreToolUse,
        error: None,
        session: "abc-def-ghi".to_string(),
        seq: 1,
        at: ts(0, 12),
        source: Some(Source::ClaudeCode),
        project: "/root/projects/test".to_string(),
        skill: None,
        file: None,
    }
}

impl EventBuilder {
    pub fn kind(mut self, kind: EventKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn session(mut self, session: &str, seq: u64) -> Self {
        self.session = session.to_string();
        self.seq = seq;
        self
    }

    pub fn seq(mut self, seq: u64) -> Self {
        self.seq = seq;
        self
    }

    pub fn at(mut self, day_offset: i64, hour: u32) -> Self {
        self.at = ts(day_offset, hour);
        self
    }

    pub fn at_time(mut self, at: DateTime<Utc>) -> Self {
        self.at = at;
        self
    }

    pub fn source(mut self, source: Option<Source>) -> Self {
        self.source = source;
        self
    }

    pub fn project(mut self, project: &str) -> Self {
        self.project = project.to_string();
        self
    }

    pub fn skill(mut self, skill: &str) -> Self {
        self.skill = Some(skill.to_string());
        self
    }

    pub fn file(mut self, file: &str) -> Self {
        self.file = Some(file.to_string());
        self
    }

    pub fn build(self) -> UnifiedEvent {
        let mut event = UnifiedEvent::tool_use(
            event_id(&self.session, self.seq),
            self.at,
            self.tool,
            self.project,
            Source::Unknown,
        );
        event.kind = self.kind;
        event.error = self.error;
        event.source = self.source;
        event.skill = self.skill;
        event.file = self.file;
        event
    }
}

/// Consecutive `PreToolUse` calls in one session, seq 1..=n, one minute apart
pub fn call_run(session: &str, tools: &[&str]) -> Vec<UnifiedEvent> {
    tools
        .iter()
        .enumerate()
        .map(|(i, tool)| {
            ev(tool)
                .session(session, i as u64 + 1)
                .at_time(ts(0, 12) + Duration::minutes(i as i64))
                .build()
        })
        .collect()
}

/// Serialize events as event-log lines
pub fn to_jsonl(events: &[UnifiedEvent]) -> String {
    events
        .iter()
        .map(|e| serde_json::to_string(e).unwrap() + "\n")
        .collect()
}

// --- Transcript lines ---

pub mod claude {
    use super::*;

    pub fn tool_use(session: &str, cwd: &str, at: &str, id: &str, tool: &str, input: Value) -> String {
        json!({
            "type": "assistant",
            "sessionId": session,
            "cwd": cwd,
            "timestamp": at,
            "message": {
                "model": "claude-sonnet-4",
                "content": [{"type": "tool_use", "id": id, "name": tool, "input": input}]
            }
        })
        .to_string()
    }

    pub fn tool_result(session: &str, id: &str, is_error: bool, content: &str) -> String {
        json!({
            "type": "user",
            "sessionId": session,
            "message": {
                "content": [{"type": "tool_result", "tool_use_id": id, "is_error": is_error, "content": content}]
            }
        })
        .to_string()
    }
}

pub mod codex {
    use super::*;

    pub fn session_meta(cwd: &str) -> String {
        json!({"type": "session_meta", "payload": {"cwd": cwd}}).to_string()
    }

    pub fn function_call(at: &str, call_id: &str, name: &str, args: Value) -> String {
        json!({
            "type": "response_item",
            "timestamp": at,
            "payload": {"type": "function_call", "name": name, "arguments": args.to_string(), "call_id": call_id}
        })
        .to_string()
    }

    pub fn function_output(at: &str, call_id: &str, output: &str) -> String {
        json!({
            "type": "response_item",
            "timestamp": at,
            "payload": {"type": "function_call_output", "call_id": call_id, "output": output}
        })
        .to_string()
    }
}

pub mod openclaw {
    use super::*;

    pub fn session(id: &str, cwd: &str) -> String {
        json!({"type": "session", "id": id, "cwd": cwd}).to_string()
    }

    pub fn tool_call(at: &str, id: &str, tool: &str, args: Value) -> String {
        json!({
            "type": "message",
            "timestamp": at,
            "message": {
                "role": "assistant",
                "content": [{"type": "toolCall", "id": id, "name": tool, "arguments": args}]
            }
        })
        .to_string()
    }

    pub fn tool_result(id: &str, is_error: bool, text: &str) -> String {
        json!({
            "type": "message",
            "message": {
                "role": "toolResult",
                "toolCallId": id,
                "isError": is_error,
                "content": [{"type": "text", "text": text}]
            }
        })
        .to_string()
    }
}
