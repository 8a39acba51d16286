use anyhow::Result;

use super::super::args::CheckCommand;
use super::{CommandResult, CommandSummary, context::RunContext, helper::finish};
use crate::core::MemoryFiler;

/// Same pipeline as `generate`, but artifacts stay in memory.
pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let ctx = RunContext::new(&cmd.args)?;
    let mut filer = MemoryFiler::new();

    let (summary, diagnostics) = ctx.process(&mut filer)?;

    Ok(finish(CommandSummary::Check(summary), diagnostics, true))
}
