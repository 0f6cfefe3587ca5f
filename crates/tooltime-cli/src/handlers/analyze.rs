use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use tooltime_runtime::ops::{ANALYSIS_FILE, AnalyzeRequest, run_analysis, write_json};
use tooltime_types::{Source, parse_timestamp_str};

use crate::context::ExecutionContext;

pub struct AnalyzeArgs {
    pub project: Option<String>,
    pub source: Option<Source>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub timezone: Option<String>,
    pub stdout: bool,
}

/// `YYYY-MM-DD` as midnight UTC; full timestamps are accepted too
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }
    match parse_timestamp_str(raw) {
        Some(ts) => Ok(ts),
        None => bail!("Invalid date '{}': expected YYYY-MM-DD", raw),
    }
}

pub fn handle(ctx: &ExecutionContext, args: AnalyzeArgs) -> Result<()> {
    let request = AnalyzeRequest {
        since: args.since.as_deref().map(parse_date).transpose()?,
        until: args.until.as_deref().map(parse_date).transpose()?,
        project: args.project,
        source: args.source,
        timezone: args.timezone,
    };

    let report = run_analysis(ctx.event_log(), ctx.config()?, &request, Utc::now())?;

    if args.stdout {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let path = write_json(ctx.data_dir(), ANALYSIS_FILE, &report)
        .with_context(|| format!("Failed to write {}", ANALYSIS_FILE))?;
    println!("{}", path.display());
    Ok(())
}
