use crate::types::{LogLevel, SourceFilter, SourceName};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tooltime")]
#[command(about = "Tool-usage analytics for AI coding-assistant transcripts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory [default: $TOOLTIME_DATA_DIR or ~/.claude/tool-time]
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Ignored when RUST_LOG is set
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write analysis.json: sessions, tool chains, trends, time patterns
    Analyze {
        /// Only events from this project path
        #[arg(long)]
        project: Option<String>,

        #[arg(long)]
        source: Option<SourceName>,

        /// Start date, YYYY-MM-DD [default: lookback_days ago]
        #[arg(long)]
        since: Option<String>,

        /// End date, YYYY-MM-DD
        #[arg(long)]
        until: Option<String>,

        /// IANA zone for time patterns, e.g. America/Los_Angeles
        #[arg(long)]
        timezone: Option<String>,

        /// Print the report instead of writing it
        #[arg(long)]
        stdout: bool,
    },

    /// Import historical transcripts into the event log
    Backfill {
        #[arg(long, default_value = "all")]
        source: SourceFilter,
    },

    /// Write stats.json: per-tool calls, errors and rejections
    Stats {
        /// Lookback window [default: stats_lookback_days]
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
        days: Option<i64>,

        /// Project path [default: current directory]
        #[arg(long, conflicts_with = "all_projects")]
        project: Option<String>,

        #[arg(long)]
        all_projects: bool,

        /// Print the stats instead of writing them
        #[arg(long)]
        stdout: bool,
    },

    /// List transcript sources and where they are read from
    Sources,
}
