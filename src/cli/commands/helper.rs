use super::{CommandResult, CommandSummary};
use crate::diagnostics::Diagnostics;

pub fn finish(summary: CommandSummary, diagnostics: Diagnostics, exit_on_errors: bool) -> CommandResult {
    let mut error_count = diagnostics.error_count();
    let warning_count = diagnostics.warning_count();

    if let CommandSummary::Init(ref summary) = summary
        && summary.error.is_some()
    {
        error_count += 1;
    }

    CommandResult {
        summary,
        diagnostics: diagnostics.into_vec(),
        error_count,
        warning_count,
        exit_on_errors,
    }
}
