use anyhow::Result;
use chrono::Utc;
use tooltime_runtime::ops::{STATS_FILE, StatsRequest, run_stats, write_json};

use crate::context::ExecutionContext;

pub struct StatsArgs {
    pub days: Option<i64>,
    pub project: Option<String>,
    pub all_projects: bool,
    pub stdout: bool,
}

pub fn handle(ctx: &ExecutionContext, args: StatsArgs) -> Result<()> {
    let project = if args.all_projects {
        None
    } else {
        match args.project {
            Some(project) => Some(project),
            None => Some(std::env::current_dir()?.display().to_string()),
        }
    };

    let request = StatsRequest {
        days: args.days,
        project,
    };
    let stats = run_stats(ctx.event_log(), ctx.config()?, &request, Utc::now())?;

    if args.stdout {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        let path = write_json(ctx.data_dir(), STATS_FILE, &stats)?;
        println!("{}", path.display());
    }
    Ok(())
}
