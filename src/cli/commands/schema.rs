use anyhow::Result;

use super::{CommandResult, CommandSummary, helper::finish};
use crate::diagnostics::Diagnostics;
use crate::model::bundle_file_schema;

pub fn schema() -> Result<CommandResult> {
    let schema = bundle_file_schema()?;
    Ok(finish(CommandSummary::Schema(schema), Diagnostics::new(), true))
}
