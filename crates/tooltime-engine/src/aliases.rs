use std::collections::HashMap;

/// Source-specific tool name to canonical name
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    // Codex CLI
    ("shell", "Bash"),
    ("shell_command", "Bash"),
    ("exec_command", "Bash"),
    ("write_stdin", "Write"),
    ("update_plan", "TaskUpdate"),
    // OpenClaw
    ("exec", "Bash"),
    ("process", "Bash"),
    ("edit", "Edit"),
    ("write", "Write"),
    ("read", "Read"),
    ("web_fetch", "WebFetch"),
    ("web_search", "WebSearch"),
];

/// Immutable alias table used by the cross-source views (weekly trends and
/// source comparison). Per-project views keep raw names.
#[derive(Debug, Clone)]
pub struct ToolAliases {
    table: HashMap<String, String>,
}

impl Default for ToolAliases {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_ALIASES.iter().copied())
    }
}

impl ToolAliases {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            table: pairs
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    /// Canonical name, or the input when it has no alias
    pub fn normalize<'a>(&'a self, tool: &'a str) -> &'a str {
        self.table.get(tool).map(String::as_str).unwrap_or(tool)
    }
}
