use crate::args::{Cli, Commands};
use crate::context::ExecutionContext;
use crate::handlers;
use crate::types::LogLevel;
use anyhow::Result;
use tooltime_runtime::resolve_data_dir;
use tracing_subscriber::EnvFilter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    let ctx = ExecutionContext::new(data_dir);

    match cli.command {
        Commands::Analyze {
            project,
            source,
            since,
            until,
            timezone,
            stdout,
        } => handlers::analyze::handle(
            &ctx,
            handlers::analyze::AnalyzeArgs {
                project,
                source: source.map(Into::into),
                since,
                until,
                timezone,
                stdout,
            },
        ),

        Commands::Backfill { source } => handlers::backfill::handle(&ctx, source.source()),

        Commands::Stats {
            days,
            project,
            all_projects,
            stdout,
        } => handlers::stats::handle(
            &ctx,
            handlers::stats::StatsArgs {
                days,
                project,
                all_projects,
                stdout,
            },
        ),

        Commands::Sources => handlers::sources::handle(&ctx),
    }
}

/// RUST_LOG wins over `--log-level`; output goes to stderr so stdout stays
/// clean for JSON
fn init_logging(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
