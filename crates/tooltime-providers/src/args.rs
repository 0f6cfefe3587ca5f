use serde_json::Value;

/// Tool name that represents a named skill invocation
pub const SKILL_TOOL: &str = "Skill";

/// First non-empty string argument among `keys`, in order
pub(crate) fn file_argument(args: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| args.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// `skill` argument, only for the skill-invocation tool
pub(crate) fn skill_argument(tool: &str, args: &Value) -> Option<String> {
    if tool != SKILL_TOOL {
        return None;
    }
    args.get("skill")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Non-empty string or None
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Loose truthiness for flags like `is_error` that are not always booleans
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Flatten result content to text: strings pass through, block lists join
/// their `text` fields with `sep`
pub(crate) fn content_text(content: &Value, sep: &str) -> String {
    match content {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter(|b| b.is_object())
            .map(|b| b.get("text").and_then(Value::as_str).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(sep),
        other => other.to_string(),
    }
}
