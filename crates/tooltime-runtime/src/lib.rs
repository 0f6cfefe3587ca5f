//! Storage and orchestration for tooltime.
//!
//! Owns the data directory (`events.jsonl`, `config.toml`, `analysis.json`,
//! `stats.json`), feeds transcripts from the providers into the event log,
//! and runs the engine over what the log holds.

pub mod config;
pub mod error;
pub mod event_log;
pub mod ops;

pub use config::{AnalysisConfig, Config, SourceConfig, resolve_data_dir};
pub use error::{Error, Result};
pub use event_log::{AppendOutcome, EventAppender, EventLog};
pub use ops::{
    AnalyzeRequest, BackfillProgress, BackfillReport, BackfillService, RootStatus, SourceStatus,
    StatsRequest, run_analysis, run_stats, source_statuses, write_json,
};
