//! Annotation collector: turns annotated methods into method descriptors.

use super::{HierarchyHandler, MethodDescriptor, ProcessError};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::{
    AnnotationDecl, CONTAINER_ELEMENT, ContainerError, MethodElement, Occurrence, TypeElement,
};

/// A child annotation kind of interest, with its optional repeat container.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildAnnotation {
    pub annotation: AnnotationDecl,
    pub container: Option<String>,
}

impl ChildAnnotation {
    /// Name of the annotations this child is written with on a method.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.annotation.name.as_str()).chain(self.container.as_deref())
    }
}

/// Descriptors collected for a type or a method, in discovery order.
#[derive(Debug)]
pub struct Collected<M> {
    pub descriptors: Vec<M>,
    /// Number of occurrences that failed; each one was reported as an error.
    pub failures: usize,
}

impl<M> Default for Collected<M> {
    fn default() -> Self {
        Self {
            descriptors: Vec::new(),
            failures: 0,
        }
    }
}

impl<M> Collected<M> {
    fn extend(&mut self, other: Collected<M>) {
        self.descriptors.extend(other.descriptors);
        self.failures += other.failures;
    }

    pub fn is_ok(&self) -> bool {
        self.failures == 0
    }
}

pub struct Collector<'h, H> {
    handler: &'h H,
}

impl<'h, H: HierarchyHandler> Collector<'h, H> {
    pub fn new(handler: &'h H) -> Self {
        Self { handler }
    }

    /// Collect the descriptors of every method declared on `owner`.
    pub fn collect_type(
        &self,
        owner: &TypeElement,
        sink: &mut dyn DiagnosticSink,
    ) -> Collected<H::Method> {
        let mut collected = Collected::default();
        for method in &owner.methods {
            collected.extend(self.collect_method(owner, method, sink));
        }
        collected
    }

    /// One descriptor per occurrence of every child annotation on `method`.
    ///
    /// Each descriptor is validated before it is kept. Failures are reported
    /// against the method and counted; collection carries on so that every
    /// problem of the method surfaces in the same round.
    pub fn collect_method(
        &self,
        owner: &TypeElement,
        method: &MethodElement,
        sink: &mut dyn DiagnosticSink,
    ) -> Collected<H::Method> {
        let mut collected = Collected::default();
        let element = owner.method_ref(method);

        for child in self.handler.child_annotations() {
            let decl = &child.annotation;
            let occurrences =
                match method.occurrences(&decl.name, child.container.as_deref()) {
                    Ok(occurrences) => occurrences,
                    Err(err) => {
                        let err = container_error(err, &method.name);
                        sink.emit(Diagnostic::from_error(&err, element.clone()));
                        collected.failures += 1;
                        continue;
                    }
                };

            for annotation in occurrences
                .into_iter()
                .flat_map(Occurrence::into_annotations)
            {
                let result = decl
                    .resolve(annotation)
                    .map_err(|missing| ProcessError::MissingElement {
                        annotation: decl.name.clone(),
                        method: method.name.clone(),
                        element: missing.0,
                    })
                    .and_then(|values| {
                        let base = MethodDescriptor::new(owner, method, &decl.name);
                        self.handler.create_method_descriptor(base, &values, owner)
                    })
                    .and_then(|descriptor| {
                        self.handler
                            .validate_method(&descriptor, sink)
                            .map(|()| descriptor)
                    });

                match result {
                    Ok(descriptor) => collected.descriptors.push(descriptor),
                    Err(err) => {
                        sink.emit(Diagnostic::from_error(&err, element.clone()));
                        collected.failures += 1;
                    }
                }
            }
        }

        collected
    }
}

fn container_error(err: ContainerError, method: &str) -> ProcessError {
    match err {
        ContainerError::MissingValue { container } => ProcessError::MissingElement {
            annotation: container,
            method: method.to_string(),
            element: CONTAINER_ELEMENT.to_string(),
        },
        ContainerError::NotAnArray { container, found } => ProcessError::InvalidElementType {
            annotation: container,
            method: method.to_string(),
            element: CONTAINER_ELEMENT.to_string(),
            expected: "an array".to_string(),
            found: found.to_string(),
        },
        ContainerError::UnexpectedItem {
            container,
            expected,
            found,
        } => ProcessError::InvalidElementType {
            annotation: container,
            method: method.to_string(),
            element: CONTAINER_ELEMENT.to_string(),
            expected: format!("an array of {expected}"),
            found,
        },
    }
}
