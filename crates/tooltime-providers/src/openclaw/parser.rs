use serde::Deserialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::path::Path;
use tooltime_types::{Source, UnifiedEvent, error_text, event_id, parse_timestamp};

use super::schema::{OpenClawBlock, OpenClawMessage, OpenClawRecord};
use crate::Result;
use crate::args::{content_text, file_argument, non_empty, skill_argument, truthy};
use crate::correlation::PendingCalls;
use crate::stream::{RecordHandler, RecordStream};
use crate::traits::{EventStream, TranscriptParser};

const FILE_KEYS: &[&str] = &["path", "file_path"];

/// OpenClaw (Moltbot, Clawdbot) transcript parser.
///
/// Calls are `toolCall` blocks of assistant messages; each result is a
/// separate `toolResult` message naming its `toolCallId`.
pub struct OpenClawParser;

impl TranscriptParser for OpenClawParser {
    fn source(&self) -> Source {
        Source::OpenClaw
    }

    fn parse_file(&self, path: &Path) -> Result<EventStream> {
        let session_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stream = RecordStream::open(path, OpenClawHandler::new(session_id))?;
        Ok(Box::new(stream))
    }
}

struct OpenClawHandler {
    session_id: String,
    cwd: String,
    model: Option<String>,
    pending: PendingCalls,
}

impl OpenClawHandler {
    fn new(session_id: String) -> Self {
        Self {
            session_id,
            cwd: String::new(),
            model: None,
            pending: PendingCalls::default(),
        }
    }

    fn open_calls(&mut self, blocks: &[Value], raw_ts: &Value, out: &mut VecDeque<UnifiedEvent>) {
        for block in blocks {
            let Ok(OpenClawBlock::ToolCall { id, name, arguments }) = OpenClawBlock::deserialize(block)
            else {
                continue;
            };
            let Some(ts) = parse_timestamp(raw_ts) else {
                continue;
            };

            let args = if arguments.is_object() { arguments } else { Value::Null };
            let seq = self.pending.next_seq();
            let mut event = UnifiedEvent::tool_use(
                event_id(&self.session_id, seq),
                ts,
                &name,
                &self.cwd,
                Source::OpenClaw,
            );
            event.model = self.model.clone();
            event.file = file_argument(&args, FILE_KEYS);
            event.skill = skill_argument(&name, &args);
            self.pending.open(id, seq, event, out);
        }
    }

    fn close_call(&mut self, message: &OpenClawMessage, out: &mut VecDeque<UnifiedEvent>) {
        let error = truthy(&message.is_error).then(|| error_text(&content_text(&message.content, "")));
        if let Some(event) = self.pending.resolve(&message.tool_call_id, error) {
            out.push_back(event);
        }
    }
}

impl RecordHandler for OpenClawHandler {
    type Record = OpenClawRecord;

    fn handle(&mut self, record: OpenClawRecord, out: &mut VecDeque<UnifiedEvent>) {
        match record {
            OpenClawRecord::Session { id, cwd } => {
                self.cwd = cwd.unwrap_or_default();
                if let Some(id) = non_empty(id.as_deref()) {
                    self.session_id = id;
                }
            }
            OpenClawRecord::ModelChange { model_id } => {
                self.model = non_empty(model_id.as_deref());
            }
            OpenClawRecord::Message { timestamp, message } => {
                let Some(message) = message else {
                    return;
                };
                let Some(blocks) = message.content.as_array() else {
                    return;
                };
                match message.role.as_str() {
                    "assistant" => self.open_calls(blocks, &timestamp, out),
                    "toolResult" => self.close_call(&message, out),
                    _ => {}
                }
            }
            OpenClawRecord::Unknown => {}
        }
    }

    fn finish(&mut self, out: &mut VecDeque<UnifiedEvent>) {
        self.pending.drain_into(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(lines: &[&str]) -> Vec<UnifiedEvent> {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("stem-session.jsonl");
        std::fs::write(&path, lines.join("\n")).unwrap();
        OpenClawParser.parse_file(&path).unwrap().collect()
    }

    const SESSION: &str = r#"{"type":"session","id":"oc-abc","cwd":"/home/u/bot","timestamp":"2026-01-15T10:00:00Z"}"#;
    const MODEL: &str = r#"{"type":"model_change","modelId":"claude-opus-4"}"#;
    const CALL: &str = r#"{"type":"message","timestamp":"2026-01-15T10:00:01Z","message":{"role":"assistant","content":[{"type":"text","text":"reading"},{"type":"toolCall","id":"tc1","name":"read","arguments":{"path":"/home/u/bot/notes.md"}}]}}"#;

    #[test]
    fn test_call_and_result() {
        let events = parse(&[
            SESSION,
            MODEL,
            CALL,
            r##"{"type":"message","timestamp":"2026-01-15T10:00:02Z","message":{"role":"toolResult","toolCallId":"tc1","toolName":"read","isError":false,"content":[{"type":"text","text":"# notes"}]}}"##,
        ]);
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.id, "oc-abc-1");
        assert_eq!(event.tool, "read");
        assert_eq!(event.project, "/home/u/bot");
        assert_eq!(event.model.as_deref(), Some("claude-opus-4"));
        assert_eq!(event.file.as_deref(), Some("/home/u/bot/notes.md"));
        assert_eq!(event.source, Some(Source::OpenClaw));
        assert_eq!(event.error, None);
    }

    #[test]
    fn test_error_text_concatenated() {
        let events = parse(&[
            SESSION,
            CALL,
            r#"{"type":"message","message":{"role":"toolResult","toolCallId":"tc1","isError":true,"content":[{"type":"text","text":"ENOENT: "},{"type":"text","text":"no such file"}]}}"#,
        ]);
        assert_eq!(events[0].error.as_deref(), Some("ENOENT: no such file"));
    }

    #[test]
    fn test_error_without_text() {
        let events = parse(&[
            SESSION,
            CALL,
            r#"{"type":"message","message":{"role":"toolResult","toolCallId":"tc1","isError":true,"content":[]}}"#,
        ]);
        assert_eq!(events[0].error.as_deref(), Some("error"));
    }

    #[test]
    fn test_session_defaults_to_file_stem() {
        let events = parse(&[CALL]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "stem-session-1");
        assert_eq!(events[0].project, "");
        assert_eq!(events[0].model, None);
    }

    #[test]
    fn test_results_matched_by_id_not_arrival() {
        let events = parse(&[
            SESSION,
            CALL,
            r#"{"type":"message","timestamp":"2026-01-15T10:00:02Z","message":{"role":"assistant","content":[{"type":"toolCall","id":"tc2","name":"exec","arguments":{"command":"make"}}]}}"#,
            r#"{"type":"message","message":{"role":"toolResult","toolCallId":"tc2","isError":true,"content":[{"type":"text","text":"make: *** no targets"}]}}"#,
            r##"{"type":"message","message":{"role":"toolResult","toolCallId":"tc1","isError":false,"content":[{"type":"text","text":"# notes"}]}}"##,
        ]);
        assert_eq!(events.len(), 2);

        let read = events.iter().find(|e| e.tool == "read").unwrap();
        let exec = events.iter().find(|e| e.tool == "exec").unwrap();
        assert_eq!(read.id, "oc-abc-1");
        assert_eq!(read.error, None);
        assert_eq!(exec.id, "oc-abc-2");
        assert_eq!(exec.error.as_deref(), Some("make: *** no targets"));
    }
}
