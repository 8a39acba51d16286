//! Immutable descriptors built from annotated elements.
//!
//! A [`MethodDescriptor`] is created once per (method, annotation occurrence)
//! pair; a [`TypeDescriptor`] aggregates the descriptors of one annotated
//! type. The message specializations add the catalog fields.

use crate::model::{ElementRef, MethodElement, Parameter, TypeElement, TypeKind, TypeRef};

/// Signature data of a method plus the annotation the descriptor came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub annotation_name: String,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeRef,
    /// The method has a provided body.
    pub has_default: bool,
    pub element: ElementRef,
}

impl MethodDescriptor {
    pub fn new(owner: &TypeElement, method: &MethodElement, annotation_name: &str) -> Self {
        Self {
            annotation_name: annotation_name.to_string(),
            name: method.name.clone(),
            parameters: method.params.clone(),
            return_type: method.returns.clone(),
            has_default: method.has_default,
            element: owner.method_ref(method),
        }
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }
}

impl AsRef<MethodDescriptor> for MethodDescriptor {
    fn as_ref(&self) -> &MethodDescriptor {
        self
    }
}

/// Identity of an annotated type and the descriptors of its methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor<M> {
    pub annotation_name: String,
    pub package_name: String,
    pub qualified_name: String,
    pub simple_name: String,
    pub kind: TypeKind,
    /// The originating type definition.
    pub target: ElementRef,
    methods: Vec<M>,
}

impl<M: AsRef<MethodDescriptor>> TypeDescriptor<M> {
    pub fn new(target: &TypeElement, annotation_name: &str, methods: Vec<M>) -> Self {
        Self {
            annotation_name: annotation_name.to_string(),
            package_name: target.package.clone(),
            qualified_name: target.qualified_name(),
            simple_name: target.name.clone(),
            kind: target.kind,
            target: target.element_ref(),
            methods,
        }
    }

    pub fn methods(&self) -> &[M] {
        &self.methods
    }

    /// True if at least one descriptor was collected for `method`.
    pub fn describes(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.as_ref().name == method)
    }
}

/// A method descriptor extracted from a message annotation.
///
/// `key` and `message` are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMethodDescriptor {
    method: MethodDescriptor,
    key: String,
    locale: String,
    message: String,
}

impl MessageMethodDescriptor {
    /// Callers resolve defaults and check emptiness before building.
    pub(crate) fn new(method: MethodDescriptor, key: String, locale: String, message: String) -> Self {
        debug_assert!(!key.is_empty() && !message.is_empty());
        Self {
            method,
            key,
            locale,
            message,
        }
    }

    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl AsRef<MethodDescriptor> for MessageMethodDescriptor {
    fn as_ref(&self) -> &MethodDescriptor {
        &self.method
    }
}

/// Type descriptor of a message bundle with its resolved catalog location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDescriptor {
    pub bundle: TypeDescriptor<MessageMethodDescriptor>,
    pub base_name: String,
    pub base_path: String,
    /// Locales every method is expected to provide a template for.
    pub required_locales: Vec<String>,
}

impl CatalogDescriptor {
    pub fn methods(&self) -> &[MessageMethodDescriptor] {
        self.bundle.methods()
    }
}
