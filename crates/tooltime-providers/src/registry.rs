use std::path::PathBuf;
use tooltime_types::Source;

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub source: Source,
    pub description: &'static str,
    pub default_log_paths: &'static [&'static str],
}

const PROVIDERS: &[ProviderMetadata] = &[
    ProviderMetadata {
        source: Source::ClaudeCode,
        description: "Claude Code",
        default_log_paths: &["~/.claude/projects"],
    },
    ProviderMetadata {
        source: Source::Codex,
        description: "Codex CLI",
        default_log_paths: &["~/.codex/sessions"],
    },
    ProviderMetadata {
        source: Source::OpenClaw,
        description: "OpenClaw (Moltbot, Clawdbot)",
        // Earlier releases shipped as Moltbot and Clawdbot with the same layout
        default_log_paths: &["~/.openclaw/agents", "~/.moltbot/agents", "~/.clawdbot/agents"],
    },
];

pub fn get_provider_metadata(source: Source) -> Option<&'static ProviderMetadata> {
    PROVIDERS.iter().find(|p| p.source == source)
}

pub fn expand_home_path(path: &str) -> Option<PathBuf> {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return Some(home.join(stripped));
    }
    None
}

/// `default_log_paths` of a source, expanded against the home directory
pub fn default_log_roots(source: Source) -> Vec<PathBuf> {
    get_provider_metadata(source)
        .map(|meta| meta.default_log_paths)
        .unwrap_or_default()
        .iter()
        .filter_map(|path| expand_home_path(path))
        .collect()
}
