use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tooltime_engine::Tally;
use tooltime_providers::ProviderAdapter;
use tooltime_types::Source;
use tracing::{info, warn};

use crate::Result;
use crate::config::Config;
use crate::event_log::EventLog;

const TOP_TOOLS: usize = 10;

#[derive(Debug, Clone)]
pub enum BackfillProgress {
    RootMissing {
        source: Source,
        root: PathBuf,
    },
    SourceScanning {
        source: Source,
        files: usize,
    },
    FileFailed {
        path: PathBuf,
        error: String,
    },
}

/// Summary of one backfill run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackfillReport {
    /// Transcripts found per source
    pub files: BTreeMap<String, usize>,
    pub new_events: usize,
    pub duplicates_skipped: usize,
    pub files_failed: usize,
    /// New events per source, most first
    pub by_source: IndexMap<String, usize>,
    /// Most frequent tools among the new events
    pub top_tools: IndexMap<String, usize>,
}

/// Import historical transcripts into the event log.
/// Safe to re-run: events already present are skipped by id.
pub struct BackfillService<'a> {
    log: &'a EventLog,
    providers: Vec<(ProviderAdapter, Vec<PathBuf>)>,
}

impl<'a> BackfillService<'a> {
    pub fn new(log: &'a EventLog, providers: Vec<(ProviderAdapter, Vec<PathBuf>)>) -> Self {
        Self { log, providers }
    }

    /// Enabled sources with their configured or default roots,
    /// optionally narrowed to one source
    pub fn from_config(log: &'a EventLog, config: &Config, only: Option<Source>) -> Self {
        let providers = config
            .enabled_sources()
            .into_iter()
            .filter(|source| only.is_none_or(|only| only == *source))
            .filter_map(ProviderAdapter::for_source)
            .map(|adapter| {
                let roots = config
                    .roots_for(adapter.source())
                    .unwrap_or_else(|| adapter.discovery.default_roots());
                (adapter, roots)
            })
            .collect();
        Self::new(log, providers)
    }

    pub fn run<F>(&self, mut on_progress: F) -> Result<BackfillReport>
    where
        F: FnMut(BackfillProgress),
    {
        let mut appender = self.log.appender()?;
        let mut report = BackfillReport::default();
        let mut sources: Tally<Source> = Tally::new();
        let mut tools: Tally<String> = Tally::new();

        for (provider, roots) in &self.providers {
            let source = provider.source();
            for root in roots.iter().filter(|root| !root.exists()) {
                on_progress(BackfillProgress::RootMissing {
                    source,
                    root: root.clone(),
                });
            }

            let files = provider.discover(Some(roots.as_slice()));
            report.files.insert(source.to_string(), files.len());
            on_progress(BackfillProgress::SourceScanning {
                source,
                files: files.len(),
            });

            for path in files {
                let events = match provider.process_file(&path) {
                    Ok(events) => events,
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "transcript skipped");
                        report.files_failed += 1;
                        on_progress(BackfillProgress::FileFailed {
                            path,
                            error: err.to_string(),
                        });
                        continue;
                    }
                };

                for event in events {
                    if appender.push(&event)? {
                        sources.add(source);
                        tools.add(event.tool);
                    }
                }
            }
        }

        let outcome = appender.finish()?;
        report.new_events = outcome.written;
        report.duplicates_skipped = outcome.skipped;
        report.by_source = sources.to_ranked_map(None);
        report.top_tools = tools.to_ranked_map(Some(TOP_TOOLS));

        info!(
            new_events = report.new_events,
            skipped = report.duplicates_skipped,
            failed = report.files_failed,
            "backfill complete"
        );
        Ok(report)
    }
}
