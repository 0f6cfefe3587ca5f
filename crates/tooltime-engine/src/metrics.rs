use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::classify::Classifier;
use crate::numeric::{mean, median, round_to};
use crate::session::{Sessions, calls};
use crate::tally::Tally;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub total: usize,
    /// Over sessions with at least two events
    pub avg_duration_minutes: f64,
    /// Over sessions with at least two calls
    pub avg_tools_per_session: f64,
    pub median_tools_per_session: f64,
    /// Class name to session count, most common first
    pub classifications: IndexMap<String, usize>,
}

pub fn session_metrics(sessions: &Sessions<'_>, classifier: &Classifier) -> SessionMetrics {
    if sessions.is_empty() {
        return SessionMetrics::default();
    }

    let mut durations = Vec::new();
    let mut tools_per_session = Vec::new();
    let mut classes = Tally::new();

    for events in sessions.values() {
        let first = events.iter().map(|e| e.ts).min();
        let last = events.iter().map(|e| e.ts).max();
        if events.len() >= 2
            && let (Some(first), Some(last)) = (first, last)
        {
            durations.push((last - first).num_milliseconds() as f64 / 60_000.0);
        }

        let call_count = calls(events).count();
        if call_count >= 2 {
            tools_per_session.push(call_count as f64);
        }

        classes.add(classifier.classify(events).as_str());
    }

    SessionMetrics {
        total: sessions.len(),
        avg_duration_minutes: round_to(mean(&durations), 1),
        avg_tools_per_session: round_to(mean(&tools_per_session), 1),
        median_tools_per_session: round_to(median(&tools_per_session), 1),
        classifications: classes.to_ranked_map(None),
    }
}
