/// Build an event id from a session identifier and a per-session sequence number
pub fn event_id(session_id: &str, seq: u64) -> String {
    format!("{}-{}", session_id, seq)
}

/// Derive the session identifier from an event id (`<session>-<seq>`).
///
/// The split point is the last hyphen followed by an all-digit suffix, so
/// session ids that contain hyphens themselves (UUIDs) survive intact.
/// Ids without such a suffix are returned unchanged.
pub fn extract_session_id(event_id: &str) -> &str {
    match event_id.rsplit_once('-') {
        Some((session, seq))
            if !session.is_empty() && !seq.is_empty() && seq.bytes().all(|b| b.is_ascii_digit()) =>
        {
            session
        }
        _ => event_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphenated_session() {
        assert_eq!(extract_session_id("abc-def-ghi-123"), "abc-def-ghi");
    }

    #[test]
    fn test_no_hyphen() {
        assert_eq!(extract_session_id("nodashes"), "nodashes");
        assert_eq!(extract_session_id("x"), "x");
    }

    #[test]
    fn test_uuid_with_multi_digit_seq() {
        assert_eq!(
            extract_session_id("0b5c1a2e-4f1d-4c4e-9a1b-2f3e4d5c6b7a-1042"),
            "0b5c1a2e-4f1d-4c4e-9a1b-2f3e4d5c6b7a"
        );
    }

    #[test]
    fn test_non_numeric_suffix_kept_whole() {
        assert_eq!(extract_session_id("abc-def"), "abc-def");
        assert_eq!(extract_session_id("abc-12a"), "abc-12a");
        assert_eq!(extract_session_id("abc-"), "abc-");
        assert_eq!(extract_session_id("-42"), "-42");
    }

    #[test]
    fn test_event_id_round_trip() {
        let id = event_id("rollout-2026-01-15T10-00-00-abc", 17);
        assert_eq!(id, "rollout-2026-01-15T10-00-00-abc-17");
        assert_eq!(extract_session_id(&id), "rollout-2026-01-15T10-00-00-abc");
    }
}
