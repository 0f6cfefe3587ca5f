use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tooltime_types::UnifiedEvent;

use crate::numeric::round_to;
use crate::session::{Sessions, calls};
use crate::tally::Tally;

pub const BIGRAM_LIMIT: usize = 50;
pub const TRIGRAM_LIMIT: usize = 30;
pub const TRIGRAM_MIN_COUNT: usize = 3;

/// Tools whose `file` argument identifies the target reliably
const FILE_TOOLS: &[&str] = &["Read", "Edit", "Write"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bigram {
    pub from: String,
    pub to: String,
    pub count: usize,
    /// Share of all bigrams, in percent
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigram {
    pub sequence: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPattern {
    pub tool: String,
    pub total_retries: usize,
    /// Per affected session
    pub avg_retries: f64,
    /// Highest count in a single session
    pub max_retries: usize,
    pub sessions_with_retries: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolChains {
    pub bigrams: Vec<Bigram>,
    pub trigrams: Vec<Trigram>,
    pub retry_patterns: Vec<RetryPattern>,
}

/// Named call tools per session. Result-kind events are left out so a call
/// followed by its own result never reads as a self-loop.
fn call_sequences<'a>(sessions: &'a Sessions<'a>) -> impl Iterator<Item = Vec<&'a str>> + 'a {
    sessions.values().map(|events| {
        calls(events)
            .map(|e| e.tool.as_str())
            .filter(|tool| !tool.is_empty())
            .collect()
    })
}

/// Default floor for bigrams: scales with corpus size, never below 3
pub fn default_bigram_floor(total: usize) -> usize {
    if total == 0 { 1 } else { (total / 200).max(3) }
}

/// Ranked tool transitions. Ranking stops at the first entry under the floor.
pub fn bigrams(sessions: &Sessions<'_>, min_count: Option<usize>) -> Vec<Bigram> {
    let mut tally: Tally<(&str, &str)> = Tally::new();
    for tools in call_sequences(sessions) {
        for pair in tools.windows(2) {
            tally.add((pair[0], pair[1]));
        }
    }

    let total = tally.total();
    let floor = min_count.unwrap_or_else(|| default_bigram_floor(total));

    tally
        .most_common(Some(BIGRAM_LIMIT))
        .into_iter()
        .take_while(|(_, count)| *count >= floor)
        .map(|((from, to), count)| Bigram {
            from: from.to_string(),
            to: to.to_string(),
            count,
            pct: round_to(count as f64 / total as f64 * 100.0, 1),
        })
        .collect()
}

pub fn trigrams(sessions: &Sessions<'_>, min_count: usize) -> Vec<Trigram> {
    let mut tally: Tally<(&str, &str, &str)> = Tally::new();
    for tools in call_sequences(sessions) {
        for triple in tools.windows(3) {
            tally.add((triple[0], triple[1], triple[2]));
        }
    }

    tally
        .most_common(Some(TRIGRAM_LIMIT))
        .into_iter()
        .take_while(|(_, count)| *count >= min_count)
        .map(|((a, b, c), count)| Trigram {
            sequence: vec![a.to_string(), b.to_string(), c.to_string()],
            count,
        })
        .collect()
}

/// Failed call on a file immediately followed by the same tool on the same file
fn is_retry(current: &UnifiedEvent, next: &UnifiedEvent) -> bool {
    FILE_TOOLS.contains(&current.tool.as_str())
        && current.is_error()
        && next.is_call()
        && next.tool == current.tool
        && current.file.is_some()
        && current.file == next.file
}

#[derive(Default)]
struct RetryAcc {
    total: usize,
    max: usize,
    sessions: usize,
}

pub fn retry_patterns(sessions: &Sessions<'_>) -> Vec<RetryPattern> {
    let mut by_tool: IndexMap<&str, RetryAcc> = IndexMap::new();

    for events in sessions.values() {
        let per_session: Tally<&str> = events
            .windows(2)
            .filter(|pair| is_retry(pair[0], pair[1]))
            .map(|pair| pair[0].tool.as_str())
            .collect();

        for (tool, count) in per_session.most_common(None) {
            let acc = by_tool.entry(*tool).or_default();
            acc.total += count;
            acc.max = acc.max.max(count);
            acc.sessions += 1;
        }
    }

    let mut patterns: Vec<RetryPattern> = by_tool
        .into_iter()
        .filter(|(_, acc)| acc.sessions > 0)
        .map(|(tool, acc)| RetryPattern {
            tool: tool.to_string(),
            total_retries: acc.total,
            avg_retries: round_to(acc.total as f64 / acc.sessions as f64, 1),
            max_retries: acc.max,
            sessions_with_retries: acc.sessions,
        })
        .collect();
    patterns.sort_by(|a, b| b.total_retries.cmp(&a.total_retries));
    patterns
}

pub fn tool_chains(sessions: &Sessions<'_>) -> ToolChains {
    ToolChains {
        bigrams: bigrams(sessions, None),
        trigrams: trigrams(sessions, TRIGRAM_MIN_COUNT),
        retry_patterns: retry_patterns(sessions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::group_by_session;
    use tooltime_testing::ev;
    use tooltime_testing::fixtures::call_run;
    use tooltime_types::EventKind;

    #[test]
    fn test_basic() {
        let events = call_run("s", &["Read", "Edit", "Read", "Edit", "Read", "Edit", "Read", "Edit"]);
        let sessions = group_by_session(&events);
        let result = bigrams(&sessions, None);
        assert_eq!(result.len(), 2);
        assert_eq!((result[0].from.as_str(), result[0].to.as_str()), ("Read", "Edit"));
        assert_eq!(result[0].count, 4);
        assert_eq!(result[0].pct, 57.1);
        assert_eq!((result[1].from.as_str(), result[1].to.as_str(), result[1].count), ("Edit", "Read", 3));
    }

    #[test]
    fn test_no_self_loops_from_pre_post() {
        let events = vec![
            ev("Read").seq(1).at(0, 10).build(),
            ev("Read").seq(2).at(0, 11).kind(EventKind::PostToolUse).build(),
            ev("Edit").seq(3).at(0, 12).build(),
            ev("Edit").seq(4).at(0, 13).kind(EventKind::PostToolUse).build(),
        ];
        let sessions = group_by_session(&events);
        let result = bigrams(&sessions, Some(1));
        assert_eq!(result.len(), 1);
        assert_eq!((result[0].from.as_str(), result[0].to.as_str()), ("Read", "Edit"));
        assert_eq!(result[0].pct, 100.0);
    }

    #[test]
    fn test_floor_truncates_and_empty_input() {
        let events = call_run("s", &["Read", "Edit", "Bash"]);
        let sessions = group_by_session(&events);
        assert!(bigrams(&sessions, None).is_empty());
        assert_eq!(bigrams(&sessions, Some(1)).len(), 2);
        assert!(bigrams(&Sessions::new(), None).is_empty());
        assert_eq!(default_bigram_floor(0), 1);
        assert_eq!(default_bigram_floor(100), 3);
        assert_eq!(default_bigram_floor(1000), 5);
    }

    #[test]
    fn test_trigrams_across_sessions() {
        let mut events = Vec::new();
        for session in ["a", "b", "c"] {
            events.extend(call_run(session, &["Grep", "Read", "Edit"]));
        }
        let sessions = group_by_session(&events);
        let result = trigrams(&sessions, TRIGRAM_MIN_COUNT);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sequence, vec!["Grep", "Read", "Edit"]);
        assert_eq!(result[0].count, 3);
    }

    fn failed_then_retried(tool: &str, first: Option<&str>, second: Option<&str>) -> Vec<UnifiedEvent> {
        let mut failed = ev(tool).seq(1).at(0, 10).kind(EventKind::ToolUse).error("boom");
        if let Some(f) = first {
            failed = failed.file(f);
        }
        let mut retried = ev(tool).seq(2).at(0, 11);
        if let Some(f) = second {
            retried = retried.file(f);
        }
        vec![failed.build(), retried.build()]
    }

    #[test]
    fn test_file_based_retry_detected() {
        let events = failed_then_retried("Edit", Some("/a.py"), Some("/a.py"));
        let result = retry_patterns(&group_by_session(&events));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].tool, "Edit");
        assert_eq!(result[0].total_retries, 1);
        assert_eq!(result[0].avg_retries, 1.0);
        assert_eq!(result[0].max_retries, 1);
        assert_eq!(result[0].sessions_with_retries, 1);
    }

    #[test]
    fn test_different_file_not_retry() {
        let events = failed_then_retried("Edit", Some("/a.py"), Some("/b.py"));
        assert!(retry_patterns(&group_by_session(&events)).is_empty());
    }

    #[test]
    fn test_non_file_tools_excluded() {
        let events = failed_then_retried("Bash", None, None);
        assert!(retry_patterns(&group_by_session(&events)).is_empty());
        let events = failed_then_retried("Read", None, None);
        assert!(retry_patterns(&group_by_session(&events)).is_empty());
    }

    #[test]
    fn test_retries_aggregate_across_sessions() {
        let mut events = Vec::new();
        for (session, rounds) in [("s1", 2u64), ("s2", 1)] {
            for i in 0..rounds {
                events.push(
                    ev("Read")
                        .session(session, 2 * i + 1)
                        .at_time(tooltime_testing::ts(0, 10) + chrono::Duration::minutes(2 * i as i64))
                        .kind(EventKind::ToolUse)
                        .file("/x")
                        .error("denied")
                        .build(),
                );
                events.push(
                    ev("Read")
                        .session(session, 2 * i + 2)
                        .at_time(tooltime_testing::ts(0, 10) + chrono::Duration::minutes(2 * i as i64 + 1))
                        .file("/x")
                        .build(),
                );
            }
        }
        let result = retry_patterns(&group_by_session(&events));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].total_retries, 3);
        assert_eq!(result[0].max_retries, 2);
        assert_eq!(result[0].sessions_with_retries, 2);
        assert_eq!(result[0].avg_retries, 1.5);
    }
}
