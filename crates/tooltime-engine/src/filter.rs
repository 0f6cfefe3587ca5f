use chrono::{DateTime, Utc};
use tooltime_types::{Source, UnifiedEvent};

/// Time window, project and source restriction applied when loading events.
/// Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub project: Option<String>,
    pub source: Option<Source>,
}

impl EventFilter {
    pub fn matches(&self, event: &UnifiedEvent) -> bool {
        if self.since.is_some_and(|since| event.ts < since) {
            return false;
        }
        if self.until.is_some_and(|until| event.ts > until) {
            return false;
        }
        if let Some(project) = &self.project
            && &event.project != project
        {
            return false;
        }
        if let Some(source) = self.source
            && event.source != Some(source)
        {
            return false;
        }
        true
    }
}
