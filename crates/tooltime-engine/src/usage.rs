use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tooltime_types::UnifiedEvent;

/// Error texts that mean the user declined the call, not that it failed
pub const USER_REJECTION_PREFIXES: &[&str] = &[
    "The user doesn't want to proceed",
    "Permission to use",
    "User denied",
    "User rejected",
    "User cancelled",
];

const MCP_PREFIX: &str = "mcp__";

pub fn is_user_rejection(error: &str) -> bool {
    USER_REJECTION_PREFIXES
        .iter()
        .any(|prefix| error.starts_with(prefix))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStats {
    pub calls: usize,
    pub errors: usize,
    pub rejections: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStats {
    pub calls: usize,
    pub errors: usize,
}

/// Contents of `stats.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub generated: String,
    pub total_events: usize,
    pub tools: IndexMap<String, ToolStats>,
    pub edit_without_read_count: usize,
    pub skills: IndexMap<String, CallStats>,
    pub mcp_servers: IndexMap<String, CallStats>,
}

/// Server part of an `mcp__<server>__<tool>` name, both parts non-empty
pub fn mcp_server(tool: &str) -> Option<&str> {
    let (server, rest) = tool.strip_prefix(MCP_PREFIX)?.split_once("__")?;
    (!server.is_empty() && !rest.is_empty()).then_some(server)
}

/// Keep entries that saw at least one call, most called first
fn ranked<V: Copy>(map: IndexMap<&str, V>, calls: impl Fn(&V) -> usize) -> IndexMap<String, V> {
    let mut entries: Vec<(&str, V)> = map.into_iter().filter(|(_, v)| calls(v) > 0).collect();
    entries.sort_by(|a, b| calls(&b.1).cmp(&calls(&a.1)));
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Edit calls on a file the session had not read or written before
fn edits_without_read(events: &[UnifiedEvent]) -> usize {
    let mut count = 0;
    for session in group_by_input_order(events) {
        let mut known: HashSet<&str> = HashSet::new();
        for event in session {
            let Some(file) = event.file.as_deref().filter(|f| !f.is_empty()) else {
                continue;
            };
            match event.tool.as_str() {
                "Read" | "Write" => {
                    known.insert(file);
                }
                "Edit" if !known.contains(file) => count += 1,
                _ => {}
            }
        }
    }
    count
}

/// Call events per session, in log order
fn group_by_input_order(events: &[UnifiedEvent]) -> impl Iterator<Item = Vec<&UnifiedEvent>> {
    let mut sessions: IndexMap<&str, Vec<&UnifiedEvent>> = IndexMap::new();
    for event in events.iter().filter(|e| e.is_call()) {
        sessions.entry(event.session_id()).or_default().push(event);
    }
    sessions.into_values()
}

pub fn usage_stats(events: &[UnifiedEvent], generated: DateTime<Utc>) -> UsageStats {
    let mut tools: IndexMap<&str, ToolStats> = IndexMap::new();
    let mut skills: IndexMap<&str, CallStats> = IndexMap::new();
    let mut servers: IndexMap<&str, CallStats> = IndexMap::new();

    for event in events.iter().filter(|e| !e.tool.is_empty()) {
        let tool = event.tool.as_str();
        let skill = event.skill.as_deref().filter(|s| !s.is_empty());
        let server = mcp_server(tool);

        if event.is_call() {
            tools.entry(tool).or_default().calls += 1;
            if let Some(skill) = skill {
                skills.entry(skill).or_default().calls += 1;
            }
            if let Some(server) = server {
                servers.entry(server).or_default().calls += 1;
            }
        }

        if event.kind.is_result()
            && let Some(error) = event.error.as_deref()
        {
            let stats = tools.entry(tool).or_default();
            if is_user_rejection(error) {
                stats.rejections += 1;
            } else {
                stats.errors += 1;
            }
            if let Some(skill) = skill {
                skills.entry(skill).or_default().errors += 1;
            }
            if let Some(server) = server {
                servers.entry(server).or_default().errors += 1;
            }
        }
    }

    UsageStats {
        generated: generated.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        total_events: events.len(),
        tools: ranked(tools, |s| s.calls),
        edit_without_read_count: edits_without_read(events),
        skills: ranked(skills, |s| s.calls),
        mcp_servers: ranked(servers, |s| s.calls),
    }
}
