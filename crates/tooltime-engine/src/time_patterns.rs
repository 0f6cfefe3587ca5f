use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tooltime_types::UnifiedEvent;

use crate::numeric::{rate, share};
use crate::timezone::ReportTimezone;

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourBucket {
    pub hour: u32,
    pub events: usize,
    /// errors / call events in this hour
    pub error_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    pub day: String,
    pub events: usize,
    pub sessions: usize,
    /// errors / all events on this day
    pub error_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePatterns {
    pub by_hour: Vec<HourBucket>,
    pub by_day_of_week: Vec<DayBucket>,
    pub peak_hour: u32,
    pub peak_day: String,
    pub most_error_prone_hour: u32,
    pub timezone: String,
}

impl Default for TimePatterns {
    /// Result for an empty event set
    fn default() -> Self {
        Self {
            by_hour: Vec::new(),
            by_day_of_week: Vec::new(),
            peak_hour: 0,
            peak_day: DAY_NAMES[0].to_string(),
            most_error_prone_hour: 0,
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Default, Clone, Copy)]
struct HourAcc {
    events: usize,
    calls: usize,
    errors: usize,
}

#[derive(Default)]
struct DayAcc<'a> {
    events: usize,
    errors: usize,
    sessions: HashSet<&'a str>,
}

/// Index of the first maximum; None when every key is zero
fn first_max<T: PartialOrd + Default>(keys: impl IntoIterator<Item = T>) -> Option<usize> {
    let mut best: Option<(usize, T)> = None;
    for (idx, key) in keys.into_iter().enumerate() {
        if key <= T::default() {
            continue;
        }
        if best.as_ref().is_none_or(|(_, b)| key > *b) {
            best = Some((idx, key));
        }
    }
    best.map(|(idx, _)| idx)
}

pub fn time_patterns(events: &[UnifiedEvent], tz: &ReportTimezone) -> TimePatterns {
    let mut hours = [HourAcc::default(); 24];
    let mut days: [DayAcc<'_>; 7] = Default::default();

    for event in events {
        let (hour, weekday) = tz.hour_and_weekday(&event.ts);
        let h = &mut hours[hour as usize];
        let d = &mut days[weekday.num_days_from_monday() as usize];

        h.events += 1;
        d.events += 1;
        d.sessions.insert(event.session_id());
        if event.is_call() {
            h.calls += 1;
        }
        if event.is_error() {
            h.errors += 1;
            d.errors += 1;
        }
    }

    let by_hour = hours
        .iter()
        .zip(0u32..)
        .map(|(acc, hour)| HourBucket {
            hour,
            events: acc.events,
            error_rate: rate(acc.errors, acc.calls),
        })
        .collect();

    let by_day_of_week = days
        .iter()
        .zip(DAY_NAMES)
        .map(|(acc, day)| DayBucket {
            day: day.to_string(),
            events: acc.events,
            sessions: acc.sessions.len(),
            error_rate: rate(acc.errors, acc.events),
        })
        .collect();

    let peak_hour = first_max(hours.iter().map(|h| h.events)).unwrap_or(0);
    let peak_day = first_max(days.iter().map(|d| d.events)).unwrap_or(0);
    let error_prone = first_max(hours.iter().map(|h| share(h.errors, h.calls))).unwrap_or(0);

    TimePatterns {
        by_hour,
        by_day_of_week,
        peak_hour: peak_hour as u32,
        peak_day: DAY_NAMES[peak_day].to_string(),
        most_error_prone_hour: error_prone as u32,
        timezone: tz.name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tooltime_testing::ev;
    use tooltime_types::EventKind;

    fn utc() -> ReportTimezone {
        ReportTimezone::default()
    }

    #[test]
    fn test_hour_bucketing() {
        let events = vec![
            ev("Read").seq(1).at(0, 9).build(),
            ev("Read").seq(2).at(0, 9).build(),
            ev("Read").seq(3).at(0, 14).build(),
        ];
        let patterns = time_patterns(&events, &utc());
        assert_eq!(patterns.by_hour.len(), 24);
        assert_eq!(patterns.by_hour[9].events, 2);
        assert_eq!(patterns.by_hour[14].events, 1);
        assert_eq!(patterns.peak_hour, 9);
        assert_eq!(patterns.timezone, "UTC");
    }

    #[test]
    fn test_day_bucketing() {
        // Base day 2026-01-15 is a Thursday
        let events = vec![
            ev("Read").session("s1", 1).at(0, 9).build(),
            ev("Read").session("s2", 1).at(0, 10).build(),
            ev("Read").session("s2", 2).at(1, 10).kind(EventKind::PostToolUse).error("x").build(),
        ];
        let patterns = time_patterns(&events, &utc());
        assert_eq!(patterns.by_day_of_week.len(), 7);
        assert_eq!(patterns.by_day_of_week[0].day, "Monday");
        let thursday = &patterns.by_day_of_week[3];
        assert_eq!((thursday.day.as_str(), thursday.events, thursday.sessions), ("Thursday", 2, 2));
        let friday = &patterns.by_day_of_week[4];
        assert_eq!(friday.error_rate, 1.0);
        assert_eq!(patterns.peak_day, "Thursday");
    }

    #[test]
    fn test_error_prone_hour_uses_call_rate() {
        let events = vec![
            ev("Edit").seq(1).at(0, 8).build(),
            ev("Edit").seq(2).at(0, 8).kind(EventKind::ToolUse).error("x").build(),
            ev("Edit").seq(3).at(0, 20).kind(EventKind::ToolUse).error("x").build(),
        ];
        let patterns = time_patterns(&events, &utc());
        assert_eq!(patterns.by_hour[8].error_rate, 0.5);
        assert_eq!(patterns.by_hour[20].error_rate, 1.0);
        assert_eq!(patterns.most_error_prone_hour, 20);
    }

    #[test]
    fn test_ties_pick_lowest_index() {
        let events = vec![
            ev("Read").seq(1).at(0, 15).build(),
            ev("Read").seq(2).at(0, 3).build(),
        ];
        assert_eq!(time_patterns(&events, &utc()).peak_hour, 3);
    }

    #[test]
    fn test_timezone_shifts_buckets() {
        let events = vec![ev("Read").at(0, 2).build()];
        let la = ReportTimezone::named("America/Los_Angeles").unwrap();
        let patterns = time_patterns(&events, &la);
        assert_eq!(patterns.peak_hour, 18);
        assert_eq!(patterns.peak_day, "Wednesday");
        assert_eq!(patterns.timezone, "America/Los_Angeles");
    }

    #[test]
    fn test_no_errors_means_hour_zero() {
        let events = vec![ev("Read").at(0, 7).build()];
        assert_eq!(time_patterns(&events, &utc()).most_error_prone_hour, 0);
    }
}
