use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tooltime_engine::{
    AnalysisOptions, AnalysisReport, Classifier, EventFilter, ReportFilters, ReportTimezone,
    ToolAliases, UsageStats, analyze, usage_stats,
};
use tooltime_types::Source;
use tracing::warn;

use crate::{Error, Result};
use crate::config::Config;
use crate::event_log::EventLog;

pub const ANALYSIS_FILE: &str = "analysis.json";
pub const STATS_FILE: &str = "stats.json";

#[derive(Debug, Clone, Default)]
pub struct AnalyzeRequest {
    /// Defaults to `analysis.lookback_days` before now
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub project: Option<String>,
    pub source: Option<Source>,
    /// Overrides `analysis.timezone`
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StatsRequest {
    /// Defaults to `analysis.stats_lookback_days`
    pub days: Option<i64>,
    pub project: Option<String>,
}

/// Zone for time patterns: the requested name, then the configured one,
/// then the system zone. Unknown names are reported and skipped.
pub fn resolve_timezone(requested: Option<&str>, configured: Option<&str>) -> ReportTimezone {
    for name in [requested, configured].into_iter().flatten() {
        match ReportTimezone::named(name) {
            Some(zone) => return zone,
            None => warn!("Unknown timezone '{}', using system default", name),
        }
    }
    ReportTimezone::system_default()
}

/// `now` minus `days`; negative or out-of-range windows are config errors
fn window_start(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>> {
    if days < 0 {
        return Err(Error::Config(format!("lookback of {} days is negative", days)));
    }
    TimeDelta::try_days(days)
        .and_then(|delta| now.checked_sub_signed(delta))
        .ok_or_else(|| Error::Config(format!("lookback of {} days is out of range", days)))
}

pub fn run_analysis(
    log: &EventLog,
    config: &Config,
    request: &AnalyzeRequest,
    now: DateTime<Utc>,
) -> Result<AnalysisReport> {
    let since = match request.since {
        Some(since) => since,
        None => window_start(now, config.analysis.lookback_days)?,
    };
    let filter = EventFilter {
        since: Some(since),
        until: request.until,
        project: request.project.clone(),
        source: request.source,
    };
    let events = log.load(&filter)?;

    let options = AnalysisOptions {
        filters: ReportFilters {
            project: request.project.clone(),
            source: request.source.map(|s| s.to_string()),
        },
        timezone: resolve_timezone(
            request.timezone.as_deref(),
            config.analysis.timezone.as_deref(),
        ),
        classifier: Classifier::new(config.classifier.clone()),
        aliases: ToolAliases::default(),
    };
    Ok(analyze(&events, &options, now))
}

pub fn run_stats(
    log: &EventLog,
    config: &Config,
    request: &StatsRequest,
    now: DateTime<Utc>,
) -> Result<UsageStats> {
    let days = request.days.unwrap_or(config.analysis.stats_lookback_days);
    let filter = EventFilter {
        since: Some(window_start(now, days)?),
        project: request.project.clone(),
        ..Default::default()
    };
    let events = log.load(&filter)?;
    Ok(usage_stats(&events, now))
}

/// Pretty JSON plus trailing newline; creates the data dir if needed
pub fn write_json<T: Serialize>(data_dir: &Path, file_name: &str, value: &T) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir)?;
    let path = data_dir.join(file_name);
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    std::fs::write(&path, content)?;
    Ok(path)
}
