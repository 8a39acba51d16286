//! Report formatting and printing utilities.
//!
//! Diagnostics are displayed in cargo-style format. Separate from core logic
//! to allow msgbundle to be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, InitSummary, RoundSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::core::ArtifactKind;
use crate::diagnostics::{Diagnostic, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stdout().lock());
}

/// Print a command result to a custom writer.
pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    match &result.summary {
        CommandSummary::Generate(summary) => {
            report_to(&result.diagnostics, verbose, writer);
            print_round(result, summary, false, verbose, writer);
        }
        CommandSummary::Check(summary) => {
            report_to(&result.diagnostics, verbose, writer);
            print_round(result, summary, true, verbose, writer);
        }
        CommandSummary::Init(summary) => print_init(summary, writer),
        CommandSummary::Schema(schema) => {
            let _ = writeln!(writer, "{}", schema);
        }
    }
}

/// Print diagnostics in emission order. Notes are shown only when verbose.
pub fn report_to<W: Write>(diagnostics: &[Diagnostic], verbose: bool, writer: &mut W) {
    for diagnostic in diagnostics
        .iter()
        .filter(|d| verbose || d.severity > Severity::Note)
    {
        print_diagnostic(diagnostic, writer);
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_diagnostic<W: Write>(diagnostic: &Diagnostic, writer: &mut W) {
    let severity = match diagnostic.severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
        Severity::Note => "note".bold().cyan(),
    };
    let _ = writeln!(writer, "{}: {}", severity, diagnostic.message);

    if let Some(element) = &diagnostic.element {
        match element.source() {
            Some(source) => {
                let _ = writeln!(
                    writer,
                    "  {} {} {}",
                    "-->".blue(),
                    source.display(),
                    format!("({})", element.path).dimmed()
                );
            }
            None => {
                let _ = writeln!(writer, "  {} {}", "-->".blue(), element.path);
            }
        }
    }

    if let Some(cause) = &diagnostic.cause {
        let _ = writeln!(writer, "  {} {}", "= note:".blue(), cause);
    }

    if diagnostic.severity > Severity::Note {
        let _ = writeln!(writer);
    }
}

fn print_round<W: Write>(
    result: &CommandResult,
    summary: &RoundSummary,
    dry_run: bool,
    verbose: bool,
    writer: &mut W,
) {
    if result.error_count > 0 {
        let mut line = format!("{} {} error(s)", FAILURE_MARK, result.error_count);
        if result.warning_count > 0 {
            line.push_str(&format!(", {} warning(s)", result.warning_count));
        }
        let _ = writeln!(writer, "{}", line.red());
        return;
    }

    if summary.bundles == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "No message bundles found in {} file(s)",
                summary.files_scanned
            )
            .green()
        );
        return;
    }

    let catalogs = summary.count(ArtifactKind::Resource);
    let implementations = summary.count(ArtifactKind::Source);
    let msg = if dry_run {
        format!(
            "Checked {} bundle(s): {} catalog(s) and {} implementation(s) would be generated",
            summary.bundles, catalogs, implementations
        )
    } else {
        format!(
            "Generated {} catalog(s) and {} implementation(s) for {} bundle(s)",
            catalogs, implementations, summary.generated
        )
    };
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());

    if verbose && !dry_run {
        for artifact in &summary.artifacts {
            let _ = writeln!(writer, "  {} {}", artifact.kind, artifact.path.display());
        }
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    match &summary.error {
        Some(error) => {
            let _ = writeln!(writer, "{} {}", "error:".bold().red(), error);
        }
        None => {
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!("Created {}", CONFIG_FILE_NAME).green()
            );
        }
    }
}
