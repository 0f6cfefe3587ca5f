use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tooltime_engine::ClassifierThresholds;
use tooltime_types::Source;
use tracing::warn;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TOOLTIME_DATA_DIR";
pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. TOOLTIME_DATA_DIR environment variable (with tilde expansion)
/// 3. ~/.claude/tool-time, shared with the live hooks
pub fn resolve_data_dir(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var(DATA_DIR_ENV)
        && !env_path.is_empty()
    {
        return Ok(expand_tilde(&env_path));
    }

    dirs::home_dir()
        .map(|home| home.join(".claude").join("tool-time"))
        .ok_or_else(|| Error::Config("Could not determine data directory: no HOME".to_string()))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub enabled: bool,
    /// Replaces the default discovery roots when non-empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roots: Vec<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            roots: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Default window for `analyze` when no `--since` is given
    pub lookback_days: i64,
    /// Named zone for time patterns; the system zone when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Default window for `stats`
    pub stats_lookback_days: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            lookback_days: 90,
            timezone: None,
            stats_lookback_days: 7,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Keyed by source name (`claude-code`, `codex`, `openclaw`)
    pub sources: BTreeMap<String, SourceConfig>,
    pub analysis: AnalysisConfig,
    pub classifier: ClassifierThresholds,
}

impl Config {
    /// Missing file means defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        for name in config.sources.keys() {
            if name.parse::<Source>().is_err() {
                warn!(source = %name, path = %path.display(), "ignoring unknown source in config");
            }
        }
        Ok(config)
    }

    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        Self::load_from(&data_dir.join(CONFIG_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Settings for a source; entries may use any accepted alias
    pub fn source(&self, source: Source) -> SourceConfig {
        self.sources
            .iter()
            .find(|(name, _)| name.parse::<Source>() == Ok(source))
            .map(|(_, config)| config.clone())
            .unwrap_or_default()
    }

    pub fn enabled_sources(&self) -> Vec<Source> {
        Source::ALL
            .into_iter()
            .filter(|source| self.source(*source).enabled)
            .collect()
    }

    /// Discovery roots overriding the provider defaults, if configured
    pub fn roots_for(&self, source: Source) -> Option<Vec<PathBuf>> {
        let roots = self.source(source).roots;
        if roots.is_empty() { None } else { Some(roots) }
    }

    pub fn set_source(&mut self, name: String, config: SourceConfig) {
        self.sources.insert(name, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.sources.is_empty());
        assert_eq!(config.analysis.lookback_days, 90);
        assert_eq!(config.analysis.stats_lookback_days, 7);
        assert_eq!(config.enabled_sources(), Source::ALL.to_vec());
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.set_source(
            "codex".to_string(),
            SourceConfig {
                enabled: true,
                roots: vec![PathBuf::from("/data/codex")],
            },
        );
        config.analysis.timezone = Some("Europe/Berlin".to_string());

        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.roots_for(Source::Codex),
            Some(vec![PathBuf::from("/data/codex")])
        );

        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[sources.openclaw]\nenabled = false\n\n[classifier]\nbuilding_ratio = 0.5\n",
        )?;

        let config = Config::load_from(&config_path)?;
        assert_eq!(config.enabled_sources(), vec![Source::ClaudeCode, Source::Codex]);
        assert_eq!(config.classifier.building_ratio, 0.5);
        assert_eq!(config.classifier.debug_min_errors, 3);
        assert_eq!(config.analysis.lookback_days, 90);
        assert_eq!(config.roots_for(Source::OpenClaw), None);

        Ok(())
    }

    #[test]
    fn test_source_alias_keys() {
        let mut config = Config::default();
        config.set_source(
            "claude".to_string(),
            SourceConfig {
                enabled: false,
                roots: Vec::new(),
            },
        );
        assert!(!config.source(Source::ClaudeCode).enabled);
    }

    #[test]
    fn test_invalid_toml_is_config_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[analysis\nlookback_days = ")?;

        assert!(matches!(Config::load_from(&config_path), Err(Error::Config(_))));
        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::load_from(&temp_dir.path().join("nonexistent.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_explicit_data_dir_wins() -> Result<()> {
        assert_eq!(resolve_data_dir(Some("/tmp/tt"))?, PathBuf::from("/tmp/tt"));
        Ok(())
    }
}
