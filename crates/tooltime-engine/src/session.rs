use indexmap::IndexMap;
use tooltime_types::UnifiedEvent;

/// Session id to its events in timestamp order, sessions in first-seen order
pub type Sessions<'a> = IndexMap<&'a str, Vec<&'a UnifiedEvent>>;

/// Partition events by derived session id. Equal timestamps keep input order.
pub fn group_by_session(events: &[UnifiedEvent]) -> Sessions<'_> {
    let mut sessions: Sessions<'_> = IndexMap::new();
    for event in events {
        sessions.entry(event.session_id()).or_default().push(event);
    }
    for session in sessions.values_mut() {
        session.sort_by_key(|e| e.ts);
    }
    sessions
}

/// Call-kind events of a session
pub(crate) fn calls<'a>(events: &'a [&'a UnifiedEvent]) -> impl Iterator<Item = &'a UnifiedEvent> + 'a {
    events.iter().copied().filter(|e| e.is_call())
}
