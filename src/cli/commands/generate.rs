use anyhow::Result;

use super::super::args::GenerateCommand;
use super::{CommandResult, CommandSummary, context::RunContext, helper::finish};
use crate::core::FsFiler;

/// Run the round and write every artifact to disk.
pub fn generate(cmd: GenerateCommand) -> Result<CommandResult> {
    let ctx = RunContext::new(&cmd.args)?;
    let mut filer = FsFiler::new(&ctx.resource_dir, &ctx.source_dir);

    let (summary, diagnostics) = ctx.process(&mut filer)?;

    Ok(finish(CommandSummary::Generate(summary), diagnostics, true))
}
