use std::{
    fmt,
    path::{Path, PathBuf},
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Annotation, AnnotationValue};

/// Structural kind of a type definition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Trait,
    Struct,
    Enum,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Trait => write!(f, "trait"),
            TypeKind::Struct => write!(f, "struct"),
            TypeKind::Enum => write!(f, "enum"),
        }
    }
}

/// Reference to a type as written in a signature.
///
/// `implements` lists the traits (or supertypes) the type is known to
/// satisfy. Assignability checks look at the name and at this list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct TypeRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            implements: Vec::new(),
        }
    }

    pub fn implementing(mut self, name: impl Into<String>) -> Self {
        self.implements.push(name.into());
        self
    }

    pub fn unit() -> Self {
        Self::new("()")
    }

    /// True if this type is, or implements, any of `targets`.
    pub fn is_assignable_to(&self, targets: &[String]) -> bool {
        targets
            .iter()
            .any(|target| *target == self.name || self.implements.contains(target))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A method declared on a type.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MethodElement {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default = "TypeRef::unit")]
    pub returns: TypeRef,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// The method has a provided body and needs no generated implementation.
    #[serde(default)]
    pub has_default: bool,
}

impl MethodElement {
    pub fn new(name: impl Into<String>, returns: TypeRef) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns,
            annotations: Vec::new(),
            has_default: false,
        }
    }

    pub fn param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push(Parameter::new(name, ty));
        self
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// All occurrences of the named annotation, in declaration order.
    pub fn annotations_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Annotation> {
        self.annotations.iter().filter(move |a| a.name == name)
    }

    pub fn is_annotated_with(&self, name: &str) -> bool {
        self.annotations_named(name).next().is_some()
    }

    /// Occurrences of `primary` on this method, directly or through `container`.
    ///
    /// Container occurrences come first, then direct ones. Writing the
    /// primary annotation more than once is the same as using the container.
    pub fn occurrences<'a>(
        &'a self,
        primary: &str,
        container: Option<&str>,
    ) -> Result<Vec<Occurrence<'a>>, ContainerError> {
        let mut occurrences = Vec::new();

        if let Some(container) = container {
            for annotation in self.annotations.iter().filter(|a| a.name == container) {
                occurrences.push(Occurrence::Repeated(unwrap_container(annotation, primary)?));
            }
        }

        let direct: Vec<&Annotation> = self.annotations.iter().filter(|a| a.name == primary).collect();
        match direct.len() {
            0 => {}
            1 => occurrences.push(Occurrence::Single(direct[0])),
            _ => occurrences.push(Occurrence::Repeated(direct)),
        }

        Ok(occurrences)
    }
}

/// Element holding the occurrences inside a container annotation.
pub const CONTAINER_ELEMENT: &str = "value";

/// Either one annotation or an ordered list of repeated ones.
#[derive(Debug, Clone, PartialEq)]
pub enum Occurrence<'a> {
    Single(&'a Annotation),
    Repeated(Vec<&'a Annotation>),
}

impl<'a> Occurrence<'a> {
    pub fn into_annotations(self) -> Vec<&'a Annotation> {
        match self {
            Occurrence::Single(annotation) => vec![annotation],
            Occurrence::Repeated(annotations) => annotations,
        }
    }
}

/// A container annotation that does not hold a list of the primary annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    MissingValue { container: String },
    NotAnArray { container: String, found: &'static str },
    UnexpectedItem { container: String, expected: String, found: String },
}

/// Unwrap the single array-valued element of a container annotation.
fn unwrap_container<'a>(container: &'a Annotation, primary: &str) -> Result<Vec<&'a Annotation>, ContainerError> {
    let value = container
        .values
        .get(CONTAINER_ELEMENT)
        .or_else(|| match container.values.len() {
            1 => container.values.values().next(),
            _ => None,
        })
        .ok_or_else(|| ContainerError::MissingValue {
            container: container.name.clone(),
        })?;

    let items = value.as_array().ok_or_else(|| ContainerError::NotAnArray {
        container: container.name.clone(),
        found: value.kind(),
    })?;

    items
        .iter()
        .map(|item| match item {
            AnnotationValue::Annotation(annotation) if annotation.name == primary => Ok(annotation),
            AnnotationValue::Annotation(annotation) => Err(ContainerError::UnexpectedItem {
                container: container.name.clone(),
                expected: primary.to_string(),
                found: annotation.name.clone(),
            }),
            other => Err(ContainerError::UnexpectedItem {
                container: container.name.clone(),
                expected: primary.to_string(),
                found: other.kind().to_string(),
            }),
        })
        .collect()
}

/// A type definition (the candidate message interface).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct TypeElement {
    /// Module path of the type, e.g. `crate::messages`.
    pub package: String,
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub methods: Vec<MethodElement>,
    /// Bundle file the type was loaded from.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl TypeElement {
    pub fn new(package: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            kind,
            annotations: Vec::new(),
            methods: Vec::new(),
            source: None,
        }
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn method(mut self, method: MethodElement) -> Self {
        self.methods.push(method);
        self
    }

    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.package, self.name)
        }
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }

    pub fn is_annotated_with(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    pub fn element_ref(&self) -> ElementRef {
        ElementRef {
            path: self.qualified_name(),
            source: self.source.clone(),
        }
    }

    pub fn method_ref(&self, method: &MethodElement) -> ElementRef {
        ElementRef {
            path: format!("{}::{}", self.qualified_name(), method.name),
            source: self.source.clone(),
        }
    }
}

/// Identifies the element a diagnostic is attached to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ElementRef {
    /// Qualified path of the type or method.
    pub path: String,
    pub source: Option<PathBuf>,
}

impl ElementRef {
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
