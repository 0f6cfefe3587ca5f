use serde::Serialize;
use std::path::PathBuf;
use tooltime_providers::{ProviderAdapter, get_provider_metadata};
use tooltime_types::Source;

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootStatus {
    pub path: PathBuf,
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceStatus {
    pub source: Source,
    pub description: &'static str,
    pub enabled: bool,
    /// Roots come from config when set there
    pub configured: bool,
    pub roots: Vec<RootStatus>,
}

/// Every known source with the roots backfill would scan
pub fn source_statuses(config: &Config) -> Vec<SourceStatus> {
    Source::ALL
        .into_iter()
        .filter_map(ProviderAdapter::for_source)
        .map(|adapter| {
            let source = adapter.source();
            let configured = config.roots_for(source);
            let is_configured = configured.is_some();
            let roots = configured
                .unwrap_or_else(|| adapter.discovery.default_roots())
                .into_iter()
                .map(|path| RootStatus {
                    exists: path.is_dir(),
                    path,
                })
                .collect();

            SourceStatus {
                source,
                description: get_provider_metadata(source).map_or("", |m| m.description),
                enabled: config.source(source).enabled,
                configured: is_configured,
                roots,
            }
        })
        .collect()
}
