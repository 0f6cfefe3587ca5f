use serde::Deserialize;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tooltime_engine::EventFilter;
use tooltime_types::UnifiedEvent;
use tracing::{debug, info};

use crate::Result;

pub const EVENTS_FILE: &str = "events.jsonl";

/// Outcome of an append: lines written vs ids already present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    pub written: usize,
    pub skipped: usize,
}

/// Append-only JSONL event log shared with the live hooks.
///
/// Reads are tolerant: blank lines, corrupt JSON, records without an id or
/// with an unparseable timestamp are skipped, and a repeated id keeps its
/// first occurrence.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

#[derive(Deserialize)]
struct IdOnly {
    id: String,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(EVENTS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Raw non-blank lines; a missing log reads as empty
    fn lines(&self) -> Result<Vec<Vec<u8>>> {
        if !self.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let mut lines = Vec::new();
        for line in reader.split(b'\n') {
            let line = line?;
            if !line.iter().all(u8::is_ascii_whitespace) {
                lines.push(line);
            }
        }
        Ok(lines)
    }

    /// Every valid, first-seen event accepted by `filter`, in log order
    pub fn load(&self, filter: &EventFilter) -> Result<Vec<UnifiedEvent>> {
        let mut seen = HashSet::new();
        let mut events = Vec::new();
        let mut corrupt = 0usize;
        let mut duplicates = 0usize;

        for line in self.lines()? {
            let event = match serde_json::from_slice::<UnifiedEvent>(&line) {
                Ok(event) if !event.id.is_empty() => event,
                _ => {
                    corrupt += 1;
                    continue;
                }
            };
            if !seen.insert(event.id.clone()) {
                duplicates += 1;
                continue;
            }
            if filter.matches(&event) {
                events.push(event);
            }
        }

        if corrupt > 0 || duplicates > 0 {
            debug!(corrupt, duplicates, path = %self.path.display(), "skipped event log lines");
        }
        info!(events = events.len(), path = %self.path.display(), "loaded events");
        Ok(events)
    }

    /// True for a missing or empty log too
    fn ends_with_newline(&self) -> Result<bool> {
        if !self.exists() {
            return Ok(true);
        }
        let mut file = File::open(&self.path)?;
        if file.metadata()?.len() == 0 {
            return Ok(true);
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        Ok(last[0] == b'\n')
    }

    /// Ids already in the log, including those of records whose other
    /// fields do not parse
    pub fn existing_ids(&self) -> Result<HashSet<String>> {
        Ok(self
            .lines()?
            .iter()
            .filter_map(|line| serde_json::from_slice::<IdOnly>(line).ok())
            .map(|record| record.id)
            .filter(|id| !id.is_empty())
            .collect())
    }

    /// Open for appending, with the ids already present preloaded
    pub fn appender(&self) -> Result<EventAppender> {
        let seen = self.existing_ids()?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        // Hook writers may leave the last record unterminated
        if !self.ends_with_newline()? {
            writer.write_all(b"\n")?;
        }
        Ok(EventAppender {
            writer,
            seen,
            outcome: AppendOutcome::default(),
        })
    }

    /// Append events whose id is not yet in the log
    pub fn append<'a>(
        &self,
        events: impl IntoIterator<Item = &'a UnifiedEvent>,
    ) -> Result<AppendOutcome> {
        let mut appender = self.appender()?;
        for event in events {
            appender.push(event)?;
        }
        appender.finish()
    }
}

/// Deduplicating writer over an open event log
pub struct EventAppender {
    writer: BufWriter<File>,
    seen: HashSet<String>,
    outcome: AppendOutcome,
}

impl EventAppender {
    /// Write one event; false when its id was already present
    pub fn push(&mut self, event: &UnifiedEvent) -> Result<bool> {
        if !self.seen.insert(event.id.clone()) {
            self.outcome.skipped += 1;
            return Ok(false);
        }
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.outcome.written += 1;
        Ok(true)
    }

    pub fn finish(mut self) -> Result<AppendOutcome> {
        self.writer.flush()?;
        Ok(self.outcome)
    }
}
