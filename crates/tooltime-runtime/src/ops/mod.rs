pub mod analyze;
pub mod backfill;
pub mod sources;

pub use analyze::{
    ANALYSIS_FILE, AnalyzeRequest, STATS_FILE, StatsRequest, resolve_timezone, run_analysis,
    run_stats, write_json,
};
pub use backfill::{BackfillProgress, BackfillReport, BackfillService};
pub use sources::{RootStatus, SourceStatus, source_statuses};
