use crate::core::{Artifact, ArtifactKind, RoundOutcome};
use crate::diagnostics::Diagnostic;

#[derive(Debug)]
pub enum CommandSummary {
    Generate(RoundSummary),
    Check(RoundSummary),
    Init(InitSummary),
    Schema(String),
}

/// What a round did, counted for the summary line.
#[derive(Debug, Default)]
pub struct RoundSummary {
    pub files_scanned: usize,
    /// Root-annotated types seen in the round.
    pub bundles: usize,
    pub generated: usize,
    pub failed: usize,
    pub skipped: usize,
    pub artifacts: Vec<Artifact>,
}

impl RoundSummary {
    pub fn new(files_scanned: usize, outcome: &RoundOutcome) -> Self {
        let generated = outcome.generated().count();
        let failed = outcome.failed().count();
        Self {
            files_scanned,
            bundles: outcome.types.len(),
            generated,
            failed,
            skipped: outcome.types.len() - generated - failed,
            artifacts: outcome.artifacts().cloned().collect(),
        }
    }

    pub fn count(&self, kind: ArtifactKind) -> usize {
        self.artifacts.iter().filter(|a| a.kind == kind).count()
    }
}

#[derive(Debug)]
pub struct InitSummary {
    pub error: Option<String>,
}

/// Result of running msgbundle commands
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Everything the processor reported, in emission order.
    pub diagnostics: Vec<Diagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    pub exit_on_errors: bool,
}
