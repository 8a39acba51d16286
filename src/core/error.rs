use std::{io, path::PathBuf};

use thiserror::Error as ThisError;

use crate::model::TypeKind;

/// Failure raised while collecting, validating, assembling or generating a type.
///
/// Every variant is fatal for the type it concerns; the processor turns it
/// into an error diagnostic and moves on to the next type of the round.
#[derive(Debug, ThisError)]
pub enum ProcessError {
    #[error("the annotation '{annotation}' can be used only on {allowed}, but '{element}' is a {kind}")]
    InvalidTargetKind {
        annotation: String,
        element: String,
        kind: TypeKind,
        allowed: String,
    },

    #[error(
        "methods annotated with {annotation} must have as many parameters as placeholders in the message: '{method}' declares {parameters} parameter(s) but the message has {placeholders} placeholder(s)"
    )]
    PlaceholderMismatch {
        annotation: String,
        method: String,
        parameters: usize,
        placeholders: usize,
    },

    #[error(
        "method '{method}' annotated with {annotation} must return a textual type or an error type, found '{found}'"
    )]
    InvalidReturnType {
        annotation: String,
        method: String,
        found: String,
    },

    #[error("annotation {annotation} on '{method}' is missing required element '{element}'")]
    MissingElement {
        annotation: String,
        method: String,
        element: String,
    },

    #[error("element '{element}' of annotation {annotation} on '{method}' must be {expected}, found {found}")]
    InvalidElementType {
        annotation: String,
        method: String,
        element: String,
        expected: String,
        found: String,
    },

    #[error("annotation {annotation} on '{method}' has an empty {field}")]
    EmptyValue {
        annotation: String,
        method: String,
        field: &'static str,
    },

    #[error("annotation {annotation} on '{method}' has an invalid locale '{locale}'")]
    InvalidLocale {
        annotation: String,
        method: String,
        locale: String,
    },

    #[error("catalog {what} '{value}' of '{bundle}' must stay inside the resource directory")]
    InvalidCatalogLocation {
        bundle: String,
        what: &'static str,
        value: String,
    },

    #[error("method '{method}' has no {annotation} annotation")]
    MissingMessage { annotation: String, method: String },

    #[error("key '{key}' is defined more than once for locale '{locale}' (methods '{first}' and '{second}')")]
    DuplicateKey {
        key: String,
        locale: String,
        first: String,
        second: String,
    },

    #[error("'{value}' is not a valid Rust {what}")]
    InvalidRust { what: &'static str, value: String },

    #[error("failed to write catalog '{}'", path.display())]
    CatalogWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write implementation '{}'", path.display())]
    ImplementationWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
