//! Analytics over unified tool events.
//!
//! Everything here is a pure function of an in-memory event list: events are
//! grouped into sessions once, then each view (classification, tool chains,
//! weekly trends, time patterns, source and project comparison) is derived
//! from the flat list or the grouped sessions.

pub mod aliases;
pub mod chains;
pub mod classify;
pub mod compare;
pub mod filter;
pub mod metrics;
pub mod report;
pub mod session;
pub mod tally;
pub mod time_patterns;
pub mod timezone;
pub mod trends;
pub mod usage;

mod numeric;

pub use aliases::ToolAliases;
pub use chains::{Bigram, RetryPattern, ToolChains, Trigram, tool_chains};
pub use classify::{Classifier, ClassifierThresholds, SessionClass};
pub use compare::{ProjectStats, SourceStats, compare_projects, compare_sources};
pub use filter::EventFilter;
pub use metrics::{SessionMetrics, session_metrics};
pub use report::{AnalysisOptions, AnalysisReport, Period, ReportFilters, analyze};
pub use session::{Sessions, group_by_session};
pub use tally::Tally;
pub use time_patterns::{DayBucket, HourBucket, TimePatterns, time_patterns};
pub use timezone::ReportTimezone;
pub use trends::{WeeklyTrend, weekly_trends};
pub use usage::{CallStats, ToolStats, USER_REJECTION_PREFIXES, UsageStats, usage_stats};
