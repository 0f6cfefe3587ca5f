use anyhow::Result;
use tooltime_runtime::source_statuses;

use crate::context::ExecutionContext;
use crate::presentation::{Style, render_sources};

pub fn handle(ctx: &ExecutionContext) -> Result<()> {
    let statuses = source_statuses(ctx.config()?);
    print!("{}", render_sources(&statuses, Style::detect()));
    Ok(())
}
