use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Split};
use std::path::{Path, PathBuf};
use tooltime_types::UnifiedEvent;
use tracing::{debug, warn};

use crate::Result;

/// Field deserializer that falls back to the default on a shape mismatch,
/// so one odd field never costs the whole record
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

/// Sequence deserializer keeping only the elements that decode as `T`
pub(crate) fn lenient_seq<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// Per-dialect state machine fed one decoded record at a time
pub(crate) trait RecordHandler: Send {
    /// Typed shape of one transcript line
    type Record: DeserializeOwned;

    /// Consume a record, pushing any completed events to `out`
    fn handle(&mut self, record: Self::Record, out: &mut VecDeque<UnifiedEvent>);

    /// End of input: push every call still waiting for its result
    fn finish(&mut self, out: &mut VecDeque<UnifiedEvent>);
}

/// JSONL reader driving a `RecordHandler` lazily
pub(crate) struct RecordStream<H: RecordHandler> {
    path: PathBuf,
    lines: Split<BufReader<File>>,
    handler: H,
    ready: VecDeque<UnifiedEvent>,
    finished: bool,
    skipped: usize,
}

impl<H: RecordHandler> RecordStream<H> {
    pub(crate) fn open(path: &Path, handler: H) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).split(b'\n'),
            handler,
            ready: VecDeque::new(),
            finished: false,
            skipped: 0,
        })
    }

    fn finish(&mut self) {
        self.handler.finish(&mut self.ready);
        self.finished = true;
        if self.skipped > 0 {
            debug!(
                path = %self.path.display(),
                skipped = self.skipped,
                "skipped corrupt transcript lines"
            );
        }
    }
}

impl<H: RecordHandler> Iterator for RecordStream<H> {
    type Item = UnifiedEvent;

    fn next(&mut self) -> Option<UnifiedEvent> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                return Some(event);
            }
            if self.finished {
                return None;
            }

            match self.lines.next() {
                Some(Ok(line)) => {
                    if line.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    match serde_json::from_slice::<H::Record>(&line) {
                        Ok(record) => self.handler.handle(record, &mut self.ready),
                        Err(_) => self.skipped += 1,
                    }
                }
                Some(Err(err)) => {
                    warn!(path = %self.path.display(), error = %err, "transcript read aborted");
                    self.finish();
                }
                None => self.finish(),
            }
        }
    }
}
