use chrono::Datelike;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tooltime_types::UnifiedEvent;

use crate::aliases::ToolAliases;
use crate::numeric::rate;
use crate::tally::Tally;

pub const WEEKLY_TOP_TOOLS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrend {
    /// `YYYY-Www`
    pub week: String,
    pub iso_year: i32,
    pub iso_week: u32,
    pub events: usize,
    pub sessions: usize,
    pub call_events: usize,
    pub errors: usize,
    /// errors / call_events
    pub error_rate: f64,
    /// Normalized tool names, most used first
    pub tools: IndexMap<String, usize>,
}

#[derive(Default)]
struct WeekAcc<'a> {
    events: usize,
    calls: usize,
    errors: usize,
    sessions: HashSet<&'a str>,
    tools: Tally<&'a str>,
}

/// Time series keyed by ISO (year, week), so late-December days that belong
/// to week 1 of the next year are attributed there.
pub fn weekly_trends(events: &[UnifiedEvent], aliases: &ToolAliases) -> Vec<WeeklyTrend> {
    let mut weeks: BTreeMap<(i32, u32), WeekAcc<'_>> = BTreeMap::new();

    for event in events {
        let iso = event.ts.iso_week();
        let acc = weeks.entry((iso.year(), iso.week())).or_default();
        acc.events += 1;
        acc.sessions.insert(event.session_id());
        if event.is_call() {
            acc.calls += 1;
            acc.tools.add(aliases.normalize(&event.tool));
        }
        if event.is_error() {
            acc.errors += 1;
        }
    }

    weeks
        .into_iter()
        .map(|((year, week), acc)| WeeklyTrend {
            week: format!("{}-W{:02}", year, week),
            iso_year: year,
            iso_week: week,
            events: acc.events,
            sessions: acc.sessions.len(),
            call_events: acc.calls,
            errors: acc.errors,
            error_rate: rate(acc.errors, acc.calls),
            tools: acc.tools.to_ranked_map(Some(WEEKLY_TOP_TOOLS)),
        })
        .collect()
}
