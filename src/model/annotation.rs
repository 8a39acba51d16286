use std::{collections::BTreeMap, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single annotation attached to a type or a method.
///
/// Values are keyed by element name. Elements left out fall back to the
/// defaults of the matching [`AnnotationDecl`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Annotation {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, AnnotationValue>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, element: impl Into<String>, value: impl Into<AnnotationValue>) -> Self {
        self.values.insert(element.into(), value.into());
        self
    }
}

/// Value of one annotation element.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum AnnotationValue {
    Bool(bool),
    Integer(i64),
    String(String),
    Annotation(Annotation),
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AnnotationValue]> {
        match self {
            AnnotationValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_annotation(&self) -> Option<&Annotation> {
        match self {
            AnnotationValue::Annotation(annotation) => Some(annotation),
            _ => None,
        }
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AnnotationValue::Bool(_) => "a boolean",
            AnnotationValue::Integer(_) => "an integer",
            AnnotationValue::String(_) => "a string",
            AnnotationValue::Annotation(_) => "an annotation",
            AnnotationValue::Array(_) => "an array",
        }
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::String(value.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        AnnotationValue::String(value)
    }
}

impl From<Annotation> for AnnotationValue {
    fn from(value: Annotation) -> Self {
        AnnotationValue::Annotation(value)
    }
}

impl<T: Into<AnnotationValue>> From<Vec<T>> for AnnotationValue {
    fn from(values: Vec<T>) -> Self {
        AnnotationValue::Array(values.into_iter().map(Into::into).collect())
    }
}

/// One declared element of an annotation kind.
///
/// An element without a default is required.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDecl {
    pub name: String,
    pub default: Option<AnnotationValue>,
}

impl ElementDecl {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: impl Into<AnnotationValue>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }
}

/// Declaration of an annotation kind: its name and its elements.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDecl {
    pub name: String,
    pub elements: Vec<ElementDecl>,
}

/// Error returned when a required element has no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingElement(pub String);

impl fmt::Display for MissingElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required element '{}'", self.0)
    }
}

impl AnnotationDecl {
    pub fn new(name: impl Into<String>, elements: Vec<ElementDecl>) -> Self {
        Self {
            name: name.into(),
            elements,
        }
    }

    /// Resolve the values of an occurrence, filling in declared defaults.
    ///
    /// Undeclared elements are passed through untouched.
    pub fn resolve(&self, annotation: &Annotation) -> Result<AnnotationValues, MissingElement> {
        let mut values = annotation.values.clone();
        for element in &self.elements {
            if values.contains_key(&element.name) {
                continue;
            }
            match &element.default {
                Some(default) => {
                    values.insert(element.name.clone(), default.clone());
                }
                None => return Err(MissingElement(element.name.clone())),
            }
        }
        Ok(AnnotationValues(values))
    }
}

/// Resolved element values of one annotation occurrence (explicit or default).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationValues(BTreeMap<String, AnnotationValue>);

impl AnnotationValues {
    pub fn get(&self, element: &str) -> Option<&AnnotationValue> {
        self.0.get(element)
    }

    pub fn get_str(&self, element: &str) -> Option<&str> {
        self.get(element).and_then(AnnotationValue::as_str)
    }

    /// String elements only; other kinds and missing elements yield `None`.
    pub fn non_empty_str(&self, element: &str) -> Option<&str> {
        self.get_str(element).filter(|s| !s.is_empty())
    }

    /// String items of an array element. Non-string items are skipped.
    pub fn str_array(&self, element: &str) -> Vec<String> {
        self.get(element)
            .and_then(AnnotationValue::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(AnnotationValue::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}
