use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tooltime_types::UnifiedEvent;

use crate::aliases::ToolAliases;
use crate::classify::{Classifier, SessionClass};
use crate::numeric::{mean, rate, round_to};
use crate::session::{Sessions, calls};
use crate::tally::Tally;

const TOP_TOOLS: usize = 5;
const UNKNOWN_PROJECT: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStats {
    pub events: usize,
    pub sessions: usize,
    pub avg_tools_per_session: f64,
    pub error_rate: f64,
    /// Normalized names
    pub top_tools: Vec<String>,
    pub classification_mix: IndexMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub path: String,
    pub events: usize,
    pub sessions: usize,
    /// Raw names as the source reported them
    pub top_tools: Vec<String>,
    pub primary_classification: String,
    pub error_rate: f64,
}

#[derive(Default)]
struct Counts<'a> {
    events: usize,
    calls: usize,
    errors: usize,
    tools: Tally<&'a str>,
}

impl<'a> Counts<'a> {
    fn add(&mut self, event: &'a UnifiedEvent, tool: &'a str) {
        self.events += 1;
        if event.is_call() {
            self.calls += 1;
            self.tools.add(tool);
        }
        if event.is_error() {
            self.errors += 1;
        }
    }
}

/// Per-source view. A session belongs to the source of its first event in
/// input order, even if later events report another source.
pub fn compare_sources(
    events: &[UnifiedEvent],
    sessions: &Sessions<'_>,
    classifier: &Classifier,
    aliases: &ToolAliases,
) -> BTreeMap<String, SourceStats> {
    let mut counts: BTreeMap<&str, Counts<'_>> = BTreeMap::new();
    let mut owners: IndexMap<&str, &str> = IndexMap::new();

    for event in events {
        let source = event.source_name();
        counts
            .entry(source)
            .or_default()
            .add(event, aliases.normalize(&event.tool));
        owners.entry(event.session_id()).or_insert(source);
    }

    counts
        .into_iter()
        .map(|(source, acc)| {
            let owned: Vec<&[&UnifiedEvent]> = owners
                .iter()
                .filter(|&(_, &owner)| owner == source)
                .filter_map(|(sid, _)| sessions.get(sid).map(Vec::as_slice))
                .collect();

            let tools_per_session: Vec<f64> = owned
                .iter()
                .map(|events| calls(events).count())
                .filter(|n| *n >= 2)
                .map(|n| n as f64)
                .collect();

            let mix: Tally<SessionClass> =
                owned.iter().map(|events| classifier.classify(events)).collect();

            let stats = SourceStats {
                events: acc.events,
                sessions: owned.len(),
                avg_tools_per_session: round_to(mean(&tools_per_session), 1),
                error_rate: rate(acc.errors, acc.calls),
                top_tools: acc.tools.top_keys(TOP_TOOLS),
                classification_mix: mix.to_ranked_map(None),
            };
            (source.to_string(), stats)
        })
        .collect()
}

/// Display key for a project path: its last segment
fn short_name(path: &str) -> &str {
    if path.contains('/') {
        path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
    } else {
        path
    }
}

/// Per-project view keyed by short name, largest projects first.
/// Short-name collisions and paths without a usable last segment fall back
/// to the full path; an empty path is reported as `unknown`.
pub fn compare_projects(
    events: &[UnifiedEvent],
    sessions: &Sessions<'_>,
    classifier: &Classifier,
) -> IndexMap<String, ProjectStats> {
    let mut counts: IndexMap<&str, Counts<'_>> = IndexMap::new();
    let mut members: HashMap<&str, IndexSet<&str>> = HashMap::new();

    for event in events {
        let project = event.project.as_str();
        counts.entry(project).or_default().add(event, &event.tool);
        members.entry(project).or_default().insert(event.session_id());
    }

    let mut ranked: Vec<(&str, Counts<'_>)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.events.cmp(&a.1.events));

    let mut result: IndexMap<String, ProjectStats> = IndexMap::new();
    for (path, acc) in ranked {
        let session_ids = members.get(path);
        let classes: Tally<SessionClass> = session_ids
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(|sid| sessions.get(sid))
            .map(|events| classifier.classify(events))
            .collect();
        let primary = classes
            .most_common(Some(1))
            .first()
            .map(|(class, _)| class.to_string())
            .unwrap_or_else(|| SessionClass::Other.to_string());

        let key = match short_name(path) {
            "" if path.is_empty() => UNKNOWN_PROJECT.to_string(),
            "" => path.to_string(),
            short if result.contains_key(short) => path.to_string(),
            short => short.to_string(),
        };

        result.insert(
            key,
            ProjectStats {
                path: path.to_string(),
                events: acc.events,
                sessions: session_ids.map_or(0, IndexSet::len),
                top_tools: acc.tools.top_keys(TOP_TOOLS),
                primary_classification: primary,
                error_rate: rate(acc.errors, acc.calls),
            },
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::group_by_session;
    use tooltime_testing::ev;
    use tooltime_types::{EventKind, Source};

    fn by_source(events: &[UnifiedEvent]) -> BTreeMap<String, SourceStats> {
        compare_sources(
            events,
            &group_by_session(events),
            &Classifier::default(),
            &ToolAliases::default(),
        )
    }

    fn by_project(events: &[UnifiedEvent]) -> IndexMap<String, ProjectStats> {
        compare_projects(events, &group_by_session(events), &Classifier::default())
    }

    #[test]
    fn test_sources_split_and_normalized() {
        let events = vec![
            ev("Read").session("s1", 1).build(),
            ev("Edit").session("s1", 2).build(),
            ev("shell").session("s2", 1).source(Some(Source::Codex)).build(),
            ev("shell").session("s2", 2).source(Some(Source::Codex)).build(),
        ];
        let stats = by_source(&events);
        assert_eq!(stats.keys().collect::<Vec<_>>(), vec!["claude-code", "codex"]);
        let codex = &stats["codex"];
        assert_eq!((codex.events, codex.sessions), (2, 1));
        assert_eq!(codex.top_tools, vec!["Bash"]);
        assert_eq!(codex.avg_tools_per_session, 2.0);
    }

    #[test]
    fn test_unset_source_is_unknown() {
        let events = vec![ev("Read").source(None).build()];
        let stats = by_source(&events);
        assert_eq!(stats["unknown"].events, 1);
        assert_eq!(stats["unknown"].avg_tools_per_session, 0.0);
    }

    #[test]
    fn test_session_owned_by_first_source() {
        let events = vec![
            ev("Read").session("s1", 1).build(),
            ev("Read").session("s1", 2).source(Some(Source::Codex)).build(),
        ];
        let stats = by_source(&events);
        assert_eq!(stats["claude-code"].sessions, 1);
        assert_eq!(stats["codex"].sessions, 0);
        assert_eq!(stats["codex"].events, 1);
        assert!(stats["codex"].classification_mix.is_empty());
    }

    #[test]
    fn test_source_error_rate() {
        let events = vec![
            ev("Bash").seq(1).build(),
            ev("Bash").seq(2).kind(EventKind::PostToolUse).error("exit 1").build(),
            ev("Bash").seq(3).build(),
        ];
        assert_eq!(by_source(&events)["claude-code"].error_rate, 0.5);
    }

    #[test]
    fn test_projects_keyed_by_last_segment() {
        let events = vec![
            ev("read").session("a", 1).project("/root/projects/alpha").build(),
            ev("read").session("a", 2).project("/root/projects/alpha").build(),
            ev("Grep").session("b", 1).project("/root/projects/beta/").build(),
        ];
        let projects = by_project(&events);
        assert_eq!(projects.keys().collect::<Vec<_>>(), vec!["alpha", "beta"]);
        let alpha = &projects["alpha"];
        assert_eq!(alpha.path, "/root/projects/alpha");
        assert_eq!(alpha.top_tools, vec!["read"]);
        assert_eq!(alpha.sessions, 1);
        assert_eq!(projects["beta"].path, "/root/projects/beta/");
    }

    #[test]
    fn test_projects_ordered_by_events() {
        let events = vec![
            ev("Read").session("a", 1).project("/p/small").build(),
            ev("Read").session("b", 1).project("/p/big").build(),
            ev("Read").session("b", 2).project("/p/big").build(),
        ];
        let projects = by_project(&events);
        assert_eq!(projects.keys().collect::<Vec<_>>(), vec!["big", "small"]);
    }

    #[test]
    fn test_colliding_short_names_use_full_path() {
        let events = vec![
            ev("Read").session("a", 1).project("/work/app").build(),
            ev("Read").session("a", 2).project("/work/app").build(),
            ev("Read").session("b", 1).project("/home/app").build(),
        ];
        let projects = by_project(&events);
        assert_eq!(projects.keys().collect::<Vec<_>>(), vec!["app", "/home/app"]);
        assert_eq!(projects["/home/app"].events, 1);
    }

    #[test]
    fn test_empty_project_is_unknown() {
        let events = vec![ev("Read").project("").build()];
        let projects = by_project(&events);
        assert_eq!(projects["unknown"].path, "");
    }

    #[test]
    fn test_primary_classification() {
        let mut events: Vec<_> = (1..=4)
            .map(|seq| ev("Edit").session("s1", seq).build())
            .collect();
        events.push(ev("Read").session("s1", 5).build());
        let projects = by_project(&events);
        assert_eq!(projects["test"].primary_classification, "building");
    }
}
