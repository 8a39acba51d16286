//! Structural checks between a message template and its method signature.

use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

use super::{MethodDescriptor, ProcessError};

/// Positional placeholder: `{0}`, `{1}`, ... optionally followed by a format
/// (`{0,number}`).
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\d+)(?:,[^{}]*)?\}").expect("placeholder pattern is valid"));

/// Distinct placeholder indices used by a template.
pub fn placeholder_indices(template: &str) -> BTreeSet<usize> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

/// Indices that point past the last parameter.
pub fn out_of_range_placeholders(template: &str, parameter_count: usize) -> Vec<usize> {
    placeholder_indices(template)
        .into_iter()
        .filter(|index| *index >= parameter_count)
        .collect()
}

/// The number of distinct placeholders must equal the parameter count.
pub fn check_placeholder_arity(
    method: &MethodDescriptor,
    template: &str,
) -> Result<(), ProcessError> {
    let placeholders = placeholder_indices(template).len();
    let parameters = method.parameter_count();
    if placeholders == parameters {
        Ok(())
    } else {
        Err(ProcessError::PlaceholderMismatch {
            annotation: method.annotation_name.clone(),
            method: method.name.clone(),
            parameters,
            placeholders,
        })
    }
}

/// Types a message method may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTypeRules {
    pub textual: Vec<String>,
    pub error_like: Vec<String>,
}

/// The return type must be textual or error-like.
pub fn check_return_type(
    method: &MethodDescriptor,
    rules: &ReturnTypeRules,
) -> Result<(), ProcessError> {
    let ty = &method.return_type;
    if ty.is_assignable_to(&rules.textual) || ty.is_assignable_to(&rules.error_like) {
        Ok(())
    } else {
        Err(ProcessError::InvalidReturnType {
            annotation: method.annotation_name.clone(),
            method: method.name.clone(),
            found: ty.name.clone(),
        })
    }
}
