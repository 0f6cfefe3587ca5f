use anyhow::Result;
use tooltime_runtime::{BackfillProgress, BackfillService};
use tooltime_types::Source;
use tracing::{debug, info};

use crate::context::ExecutionContext;
use crate::presentation::{Style, render_backfill};

pub fn handle(ctx: &ExecutionContext, only: Option<Source>) -> Result<()> {
    let config = ctx.config()?;
    let service = BackfillService::from_config(ctx.event_log(), config, only);

    let report = service.run(|progress| match progress {
        BackfillProgress::RootMissing { source, root } => {
            info!(%source, root = %root.display(), "transcript root missing");
        }
        BackfillProgress::SourceScanning { source, files } => {
            info!(%source, files, "scanning transcripts");
        }
        BackfillProgress::FileFailed { path, .. } => {
            debug!(path = %path.display(), "transcript skipped");
        }
    })?;

    print!("{}", render_backfill(&report, Style::detect()));
    Ok(())
}
