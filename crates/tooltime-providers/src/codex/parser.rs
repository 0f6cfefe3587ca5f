use regex::Regex;
use serde_json::Value;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::LazyLock;
use tooltime_types::{Source, UnifiedEvent, error_text, event_id, parse_timestamp};

use super::schema::{CodexRecord, ResponseItem};
use crate::Result;
use crate::args::{file_argument, non_empty, skill_argument};
use crate::correlation::PendingCalls;
use crate::stream::{RecordHandler, RecordStream};
use crate::traits::{EventStream, TranscriptParser};

const FILE_KEYS: &[&str] = &["file_path", "path"];

/// Shell outputs carry `Exit code: N`; anything other than `0` is a failure
static EXIT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Exit code: ([^\n]*)").unwrap());

/// Codex CLI rollout parser.
///
/// Session id is the rollout file stem. Calls are `function_call` and
/// `custom_tool_call` response items, matched to their outputs by `call_id`.
pub struct CodexParser;

impl TranscriptParser for CodexParser {
    fn source(&self) -> Source {
        Source::Codex
    }

    fn parse_file(&self, path: &Path) -> Result<EventStream> {
        let session_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stream = RecordStream::open(path, CodexHandler::new(session_id))?;
        Ok(Box::new(stream))
    }
}

/// Arguments arrive JSON-encoded; an object is taken as-is
fn decode_arguments(raw: Value) -> Value {
    match raw {
        Value::String(s) => serde_json::from_str(&s).unwrap_or(Value::Null),
        other => other,
    }
}

fn output_text(output: &Value) -> String {
    match output {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("content").or_else(|| map.get("output")) {
            Some(Value::String(s)) => s.clone(),
            _ => output.to_string(),
        },
        other => other.to_string(),
    }
}

/// Failure text for an output whose exit code is non-zero
pub(crate) fn exit_code_error(output: &str) -> Option<String> {
    let code = EXIT_CODE.captures(output)?.get(1)?.as_str().trim();
    (code != "0").then(|| error_text(output))
}

struct CodexHandler {
    session_id: String,
    cwd: String,
    model: Option<String>,
    pending: PendingCalls,
}

impl CodexHandler {
    fn new(session_id: String) -> Self {
        Self {
            session_id,
            cwd: String::new(),
            model: None,
            pending: PendingCalls::default(),
        }
    }

    fn open_call(
        &mut self,
        raw_ts: &Value,
        name: String,
        call_id: String,
        args: Value,
        out: &mut VecDeque<UnifiedEvent>,
    ) {
        let Some(ts) = parse_timestamp(raw_ts) else {
            return;
        };
        let seq = self.pending.next_seq();
        let mut event = UnifiedEvent::tool_use(
            event_id(&self.session_id, seq),
            ts,
            &name,
            &self.cwd,
            Source::Codex,
        );
        event.model = self.model.clone();
        event.file = file_argument(&args, FILE_KEYS);
        event.skill = skill_argument(&name, &args);
        self.pending.open(call_id, seq, event, out);
    }

    fn close_call(&mut self, call_id: &str, output: &Value, out: &mut VecDeque<UnifiedEvent>) {
        let error = exit_code_error(&output_text(output));
        if let Some(event) = self.pending.resolve(call_id, error) {
            out.push_back(event);
        }
    }
}

impl RecordHandler for CodexHandler {
    type Record = CodexRecord;

    fn handle(&mut self, record: CodexRecord, out: &mut VecDeque<UnifiedEvent>) {
        match record {
            CodexRecord::SessionMeta { payload } => {
                self.cwd = payload.cwd.unwrap_or_default();
            }
            CodexRecord::TurnContext { payload } => {
                if let Some(model) = non_empty(payload.model.as_deref()) {
                    self.model = Some(model);
                }
                if let Some(cwd) = non_empty(payload.cwd.as_deref()) {
                    self.cwd = cwd;
                }
            }
            CodexRecord::ResponseItem { timestamp, payload } => match payload {
                ResponseItem::FunctionCall {
                    name,
                    arguments,
                    call_id,
                } => self.open_call(&timestamp, name, call_id, decode_arguments(arguments), out),
                ResponseItem::CustomToolCall { name, call_id } => {
                    self.open_call(&timestamp, name, call_id, Value::Null, out)
                }
                ResponseItem::FunctionCallOutput { call_id, output }
                | ResponseItem::CustomToolCallOutput { call_id, output } => {
                    self.close_call(&call_id, &output, out)
                }
                ResponseItem::Other => {}
            },
            CodexRecord::Unknown => {}
        }
    }

    fn finish(&mut self, out: &mut VecDeque<UnifiedEvent>) {
        self.pending.drain_into(out);
    }
}
