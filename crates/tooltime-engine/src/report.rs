use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tooltime_types::UnifiedEvent;
use tracing::debug;

use crate::aliases::ToolAliases;
use crate::chains::{ToolChains, tool_chains};
use crate::classify::Classifier;
use crate::compare::{ProjectStats, SourceStats, compare_projects, compare_sources};
use crate::metrics::{SessionMetrics, session_metrics};
use crate::session::group_by_session;
use crate::time_patterns::{TimePatterns, time_patterns};
use crate::timezone::ReportTimezone;
use crate::trends::{WeeklyTrend, weekly_trends};

const DATE_FORMAT: &str = "%Y-%m-%d";
const GENERATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Filters the events were loaded with, echoed into the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilters {
    pub project: Option<String>,
    pub source: Option<String>,
}

/// Contents of `analysis.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated: String,
    pub period: Period,
    pub filters: ReportFilters,
    pub event_count: usize,
    pub sessions: SessionMetrics,
    pub tool_chains: ToolChains,
    pub trends: Vec<WeeklyTrend>,
    pub time_patterns: TimePatterns,
    pub by_source: BTreeMap<String, SourceStats>,
    pub projects: IndexMap<String, ProjectStats>,
}

/// Knobs for one analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub filters: ReportFilters,
    pub timezone: ReportTimezone,
    pub classifier: Classifier,
    pub aliases: ToolAliases,
}

/// Full report over an already-filtered event list.
/// No events yields the zero report, never an error.
pub fn analyze(
    events: &[UnifiedEvent],
    options: &AnalysisOptions,
    generated: DateTime<Utc>,
) -> AnalysisReport {
    let generated = generated.format(GENERATED_FORMAT).to_string();
    let filters = options.filters.clone();

    if events.is_empty() {
        return AnalysisReport {
            generated,
            period: Period::default(),
            filters,
            event_count: 0,
            sessions: SessionMetrics::default(),
            tool_chains: ToolChains::default(),
            trends: Vec::new(),
            time_patterns: TimePatterns::default(),
            by_source: BTreeMap::new(),
            projects: IndexMap::new(),
        };
    }

    let sessions = group_by_session(events);
    debug!(
        events = events.len(),
        sessions = sessions.len(),
        "analyzing events"
    );

    let first = events.iter().map(|e| e.ts).min();
    let last = events.iter().map(|e| e.ts).max();
    let period = Period {
        start: first.map(|ts| ts.format(DATE_FORMAT).to_string()),
        end: last.map(|ts| ts.format(DATE_FORMAT).to_string()),
    };

    AnalysisReport {
        generated,
        period,
        filters,
        event_count: events.len(),
        sessions: session_metrics(&sessions, &options.classifier),
        tool_chains: tool_chains(&sessions),
        trends: weekly_trends(events, &options.aliases),
        time_patterns: time_patterns(events, &options.timezone),
        by_source: compare_sources(events, &sessions, &options.classifier, &options.aliases),
        projects: compare_projects(events, &sessions, &options.classifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tooltime_testing::{ev, ts};

    #[test]
    fn test_empty_report() {
        let options = AnalysisOptions {
            filters: ReportFilters {
                project: Some("/p".to_string()),
                source: None,
            },
            ..Default::default()
        };
        let report = analyze(&[], &options, ts(0, 12));
        assert_eq!(report.generated, "2026-01-15T12:00:00Z");
        assert_eq!(report.event_count, 0);
        assert_eq!(report.period, Period::default());
        assert_eq!(report.filters.project.as_deref(), Some("/p"));
        assert_eq!(report.time_patterns.peak_day, "Monday");
        assert!(report.time_patterns.by_hour.is_empty());
        assert!(report.by_source.is_empty());
    }

    #[test]
    fn test_period_spans_first_to_last() {
        let events = vec![
            ev("Read").seq(2).at(3, 23).build(),
            ev("Read").seq(1).at(0, 0).build(),
        ];
        let report = analyze(&events, &AnalysisOptions::default(), ts(4, 0));
        assert_eq!(report.period.start.as_deref(), Some("2026-01-15"));
        assert_eq!(report.period.end.as_deref(), Some("2026-01-18"));
        assert_eq!(report.sessions.total, 1);
        assert_eq!(report.time_patterns.by_hour.len(), 24);
    }
}
