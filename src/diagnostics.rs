//! Diagnostics emitted while processing a round.
//!
//! Every message the processor wants to surface (progress notes, warnings,
//! validation and I/O failures) goes through a [`DiagnosticSink`]. The CLI
//! prints them; tests inspect them.

use std::{error::Error as _, fmt};

use crate::core::ProcessError;
use crate::model::ElementRef;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Progress milestone; shown in verbose mode only.
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Element the diagnostic is attached to, if any.
    pub element: Option<ElementRef>,
    /// Underlying cause (e.g. the I/O error behind a failed write).
    pub cause: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            element: None,
            cause: None,
        }
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn at(mut self, element: ElementRef) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Error diagnostic for a processing failure, keeping its source as the cause.
    pub fn from_error(error: &ProcessError, element: ElementRef) -> Self {
        let diagnostic = Self::error(error.to_string()).at(element);
        match error.source() {
            Some(source) => diagnostic.with_cause(source.to_string()),
            None => diagnostic,
        }
    }
}

/// Receiver of diagnostics.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);

    fn note(&mut self, message: impl Into<String>, element: ElementRef)
    where
        Self: Sized,
    {
        self.emit(Diagnostic::note(message).at(element));
    }

    fn warning(&mut self, message: impl Into<String>, element: ElementRef)
    where
        Self: Sized,
    {
        self.emit(Diagnostic::warning(message).at(element));
    }
}

/// Collecting sink used by the CLI and the tests.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.severity == severity)
    }

    pub fn error_count(&self) -> usize {
        self.with_severity(Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.with_severity(Severity::Warning).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl DiagnosticSink for Diagnostics {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }
}
