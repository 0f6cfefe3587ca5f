use crate::registry::default_log_roots;
use crate::traits::{LogDiscovery, walk_jsonl};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tooltime_types::Source;

/// `<root>/<agent-id>/sessions/<session-id>.jsonl`
pub struct OpenClawDiscovery;

fn in_sessions_dir(path: &Path) -> bool {
    path.parent()
        .and_then(|p| p.file_name())
        .is_some_and(|name| name == "sessions")
}

impl LogDiscovery for OpenClawDiscovery {
    fn source(&self) -> Source {
        Source::OpenClaw
    }

    fn default_roots(&self) -> Vec<PathBuf> {
        default_log_roots(Source::OpenClaw)
    }

    fn probe(&self, path: &Path) -> bool {
        path.is_file() && path.extension().is_some_and(|e| e == "jsonl") && in_sessions_dir(path)
    }

    /// The same session may be mirrored under several roots; the first root wins
    fn find_sessions(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut sessions = Vec::new();

        for root in roots {
            let mut found = walk_jsonl(root, 3, |p| {
                in_sessions_dir(p)
                    && p.parent()
                        .and_then(Path::parent)
                        .and_then(Path::parent)
                        .is_some_and(|base| base == root)
            });
            found.sort();
            for path in found {
                if let Some(name) = path.file_name()
                    && seen.insert(name.to_os_string())
                {
                    sessions.push(path);
                }
            }
        }

        sessions.sort();
        sessions
    }
}
