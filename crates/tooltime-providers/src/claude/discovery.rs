use crate::registry::default_log_roots;
use crate::traits::{LogDiscovery, walk_jsonl};
use std::path::{Path, PathBuf};
use tooltime_types::Source;

/// `~/.claude/projects/<project-slug>/<session-id>.jsonl`
pub struct ClaudeDiscovery;

impl LogDiscovery for ClaudeDiscovery {
    fn source(&self) -> Source {
        Source::ClaudeCode
    }

    fn default_roots(&self) -> Vec<PathBuf> {
        default_log_roots(Source::ClaudeCode)
    }

    fn probe(&self, path: &Path) -> bool {
        path.is_file() && path.extension().is_some_and(|e| e == "jsonl")
    }

    fn find_sessions(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let mut sessions: Vec<PathBuf> = roots
            .iter()
            .flat_map(|root| {
                // Only transcripts directly inside a project directory
                walk_jsonl(root, 2, |p| p.parent().is_some_and(|parent| parent != root))
            })
            .collect();
        sessions.sort();
        sessions.dedup();
        sessions
    }
}
