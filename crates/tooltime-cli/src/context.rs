use anyhow::Result;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tooltime_runtime::{Config, EventLog};

pub struct ExecutionContext {
    data_dir: PathBuf,
    config: OnceCell<Config>,
    event_log: EventLog,
}

impl ExecutionContext {
    pub fn new(data_dir: PathBuf) -> Self {
        let event_log = EventLog::in_dir(&data_dir);
        Self {
            data_dir,
            config: OnceCell::new(),
            event_log,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> Result<&Config> {
        self.config
            .get_or_try_init(|| Ok(Config::load_from_dir(&self.data_dir)?))
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }
}
