use std::collections::VecDeque;
use std::path::Path;
use tooltime_types::{Source, UnifiedEvent, error_text, event_id, parse_timestamp};

use super::schema::{ClaudeMessage, ClaudeRecord, ContentBlock};
use crate::Result;
use crate::args::{content_text, file_argument, non_empty, skill_argument, truthy};
use crate::correlation::PendingCalls;
use crate::stream::{RecordHandler, RecordStream};
use crate::traits::{EventStream, TranscriptParser};

const FILE_KEYS: &[&str] = &["file_path", "path"];

/// Claude Code transcript parser.
///
/// Calls are `tool_use` blocks of assistant records; results are
/// `tool_result` blocks of the following user records.
pub struct ClaudeParser;

impl TranscriptParser for ClaudeParser {
    fn source(&self) -> Source {
        Source::ClaudeCode
    }

    fn parse_file(&self, path: &Path) -> Result<EventStream> {
        let fallback = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stream = RecordStream::open(path, ClaudeHandler::new(fallback))?;
        Ok(Box::new(stream))
    }
}

struct ClaudeHandler {
    fallback_session: String,
    session_id: Option<String>,
    cwd: String,
    pending: PendingCalls,
}

impl ClaudeHandler {
    fn new(fallback_session: String) -> Self {
        Self {
            fallback_session,
            session_id: None,
            cwd: String::new(),
            pending: PendingCalls::default(),
        }
    }

    fn open_calls(
        &mut self,
        message: ClaudeMessage,
        raw_ts: &serde_json::Value,
        out: &mut VecDeque<UnifiedEvent>,
    ) {
        let model = non_empty(message.model.as_deref());
        for block in message.content {
            let ContentBlock::ToolUse { id, name, input } = block else {
                continue;
            };
            let Some(ts) = parse_timestamp(raw_ts) else {
                continue;
            };

            let seq = self.pending.next_seq();
            let session = self.session_id.as_deref().unwrap_or(&self.fallback_session);
            let mut event =
                UnifiedEvent::tool_use(event_id(session, seq), ts, &name, &self.cwd, Source::ClaudeCode);
            event.model = model.clone();
            event.file = file_argument(&input, FILE_KEYS);
            event.skill = skill_argument(&name, &input);
            self.pending.open(id, seq, event, out);
        }
    }

    fn close_calls(&mut self, message: ClaudeMessage, out: &mut VecDeque<UnifiedEvent>) {
        for block in message.content {
            let ContentBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            } = block
            else {
                continue;
            };

            let error = truthy(&is_error).then(|| error_text(&content_text(&content, " ")));
            if let Some(event) = self.pending.resolve(&tool_use_id, error) {
                out.push_back(event);
            }
        }
    }
}

impl RecordHandler for ClaudeHandler {
    type Record = ClaudeRecord;

    fn handle(&mut self, record: ClaudeRecord, out: &mut VecDeque<UnifiedEvent>) {
        if self.cwd.is_empty()
            && let Some(cwd) = non_empty(record.cwd.as_deref())
        {
            self.cwd = cwd;
        }
        if self.session_id.is_none() {
            self.session_id = Some(
                non_empty(record.session_id.as_deref())
                    .unwrap_or_else(|| self.fallback_session.clone()),
            );
        }

        let Some(message) = record.message else {
            return;
        };
        match record.record_type.as_str() {
            "assistant" => self.open_calls(message, &record.timestamp, out),
            "user" => self.close_calls(message, out),
            _ => {}
        }
    }

    fn finish(&mut self, out: &mut VecDeque<UnifiedEvent>) {
        self.pending.drain_into(out);
    }
}
