/// Maximum length of error text carried on an event
pub const MAX_ERROR_CHARS: usize = 200;

/// Keep at most `max` characters; no ellipsis is appended
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Failure text as stored on an event: truncated, never empty
pub fn error_text(raw: &str) -> String {
    if raw.is_empty() {
        "error".to_string()
    } else {
        truncate_chars(raw, MAX_ERROR_CHARS)
    }
}
