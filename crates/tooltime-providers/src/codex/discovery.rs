use crate::registry::default_log_roots;
use crate::traits::{LogDiscovery, walk_jsonl};
use std::path::{Path, PathBuf};
use tooltime_types::Source;

/// Rollouts live under date directories of any depth
const MAX_DEPTH: usize = 8;

/// `~/.codex/sessions/YYYY/MM/DD/rollout-<timestamp>-<uuid>.jsonl`
pub struct CodexDiscovery;

fn is_rollout(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("rollout-"))
}

impl LogDiscovery for CodexDiscovery {
    fn source(&self) -> Source {
        Source::Codex
    }

    fn default_roots(&self) -> Vec<PathBuf> {
        default_log_roots(Source::Codex)
    }

    fn probe(&self, path: &Path) -> bool {
        path.is_file() && path.extension().is_some_and(|e| e == "jsonl") && is_rollout(path)
    }

    fn find_sessions(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let mut sessions: Vec<PathBuf> = roots
            .iter()
            .flat_map(|root| walk_jsonl(root, MAX_DEPTH, is_rollout))
            .collect();
        sessions.sort();
        sessions.dedup();
        sessions
    }
}
