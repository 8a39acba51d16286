//! Round orchestration.
//!
//! [`HierarchyProcessor`] drives one round through the same stages for every
//! root-annotated type:
//!
//! 1. **Scanning children**: collect one descriptor per child annotation
//!    occurrence on the type's methods, validating each.
//! 2. **Validating target**: the type must be one of the allowed kinds.
//! 3. **Assembling descriptor**: every required method must have been
//!    described; the type descriptor is built.
//! 4. **Generating**: the handler writes the artifacts.
//!
//! A failing stage stops processing for that type only. The round result is
//! returned explicitly; nothing carries over to the next round.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use super::{
    Artifact, ChildAnnotation, Collector, Filer, MethodDescriptor, ProcessError,
    TypeDescriptor,
};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::{AnnotationDecl, AnnotationValues, ElementRef, RoundEnvironment, TypeElement, TypeKind};

/// Named string options handed to the processor (`-O key=value`).
pub type ProcessorOptions = BTreeMap<String, String>;

/// The annotation-specific half of a processor.
///
/// The processor owns traversal, ordering and failure handling; the handler
/// decides what the annotations mean and what gets generated.
pub trait HierarchyHandler {
    type Method: AsRef<MethodDescriptor>;
    type Descriptor;

    /// Annotation marking the types to process. `None` means misconfigured.
    fn root_annotation(&self) -> Option<&AnnotationDecl>;

    fn child_annotations(&self) -> &[ChildAnnotation];

    fn allowed_type_kinds(&self) -> &[TypeKind] {
        &[TypeKind::Trait, TypeKind::Struct]
    }

    fn supported_options(&self) -> &[&'static str] {
        &[]
    }

    fn create_method_descriptor(
        &self,
        method: MethodDescriptor,
        values: &AnnotationValues,
        owner: &TypeElement,
    ) -> Result<Self::Method, ProcessError>;

    fn validate_method(
        &self,
        descriptor: &Self::Method,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), ProcessError>;

    fn create_type_descriptor(
        &self,
        descriptor: TypeDescriptor<Self::Method>,
        root: &AnnotationValues,
        options: &ProcessorOptions,
    ) -> Result<Self::Descriptor, ProcessError>;

    fn generate(
        &self,
        descriptor: &Self::Descriptor,
        filer: &mut dyn Filer,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<Artifact>, ProcessError>;
}

/// Which root-annotated types of a round get processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeSelection {
    #[default]
    All,
    /// Only the first one; the others are reported as skipped.
    First,
}

/// Stage a type was in when its processing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ScanningChildren,
    ValidatingTarget,
    AssemblingDescriptor,
    Generating,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ScanningChildren => write!(f, "scanning children"),
            Stage::ValidatingTarget => write!(f, "validating target"),
            Stage::AssemblingDescriptor => write!(f, "assembling descriptor"),
            Stage::Generating => write!(f, "generating"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeStatus {
    Done(Vec<Artifact>),
    Failed(Stage),
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOutcome {
    pub element: ElementRef,
    pub status: TypeStatus,
}

/// Result of one round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    /// True iff at least one type was fully generated.
    pub processed: bool,
    pub types: Vec<TypeOutcome>,
}

impl RoundOutcome {
    pub fn generated(&self) -> impl Iterator<Item = &TypeOutcome> {
        self.types
            .iter()
            .filter(|t| matches!(t.status, TypeStatus::Done(_)))
    }

    pub fn failed(&self) -> impl Iterator<Item = &TypeOutcome> {
        self.types
            .iter()
            .filter(|t| matches!(t.status, TypeStatus::Failed(_)))
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.types.iter().flat_map(|t| match &t.status {
            TypeStatus::Done(artifacts) => artifacts.as_slice(),
            _ => &[],
        })
    }
}

pub struct HierarchyProcessor<H> {
    handler: H,
    options: ProcessorOptions,
    selection: TypeSelection,
    initialized: bool,
}

impl<H: HierarchyHandler> HierarchyProcessor<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            options: ProcessorOptions::new(),
            selection: TypeSelection::default(),
            initialized: false,
        }
    }

    pub fn with_selection(mut self, selection: TypeSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Accept the processor options. Unknown options are reported, not rejected.
    pub fn init(&mut self, options: ProcessorOptions, sink: &mut dyn DiagnosticSink) {
        let supported = self.handler.supported_options();
        let unknown: Vec<&str> = options
            .keys()
            .map(String::as_str)
            .filter(|key| !supported.iter().any(|s| s == key))
            .collect();
        if !unknown.is_empty() {
            sink.emit(Diagnostic::warning(format!(
                "option(s) not recognized by the processor: {} (supported: {})",
                unknown.join(", "),
                supported.join(", ")
            )));
        }

        self.options = options;
        self.initialized = true;
    }

    /// Annotation names this processor reacts to.
    pub fn supported_annotation_types(&self, sink: &mut dyn DiagnosticSink) -> BTreeSet<String> {
        match self.handler.root_annotation() {
            Some(root) => BTreeSet::from([root.name.clone()]),
            None => {
                if self.initialized {
                    sink.emit(Diagnostic::warning(
                        "no root annotation is configured, the processor supports no annotation",
                    ));
                }
                BTreeSet::new()
            }
        }
    }

    /// Process every selected root-annotated type of the round.
    pub fn process(
        &self,
        round: &RoundEnvironment,
        filer: &mut dyn Filer,
        sink: &mut dyn DiagnosticSink,
    ) -> RoundOutcome {
        let Some(root) = self.handler.root_annotation() else {
            sink.emit(Diagnostic::error(
                "no root annotation is configured, nothing can be processed",
            ));
            return RoundOutcome::default();
        };

        self.report_unowned_children(round, root, sink);

        let mut outcome = RoundOutcome::default();
        for (index, target) in round.root_elements(&root.name).enumerate() {
            if index > 0 && self.selection == TypeSelection::First {
                sink.emit(
                    Diagnostic::warning(format!(
                        "'{}' was skipped: only the first type annotated with {} is processed per round",
                        target.qualified_name(),
                        root.name
                    ))
                    .at(target.element_ref()),
                );
                outcome.types.push(TypeOutcome {
                    element: target.element_ref(),
                    status: TypeStatus::Skipped,
                });
                continue;
            }

            let status = match self.process_type(target, root, filer, sink) {
                Ok(artifacts) => TypeStatus::Done(artifacts),
                Err(stage) => TypeStatus::Failed(stage),
            };
            outcome.types.push(TypeOutcome {
                element: target.element_ref(),
                status,
            });
        }

        let processed = outcome.generated().next().is_some();
        outcome.processed = processed;
        outcome
    }

    fn process_type(
        &self,
        target: &TypeElement,
        root: &AnnotationDecl,
        filer: &mut dyn Filer,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<Artifact>, Stage> {
        let element = target.element_ref();
        sink.emit(Diagnostic::note(format!("processing {}", target.qualified_name())).at(element.clone()));

        // Scanning children
        let collected = Collector::new(&self.handler).collect_type(target, sink);
        if !collected.is_ok() {
            return Err(Stage::ScanningChildren);
        }

        // Validating target
        self.validate_target(target, root)
            .map_err(|err| fail(&err, &element, sink, Stage::ValidatingTarget))?;

        // Assembling descriptor
        let Some(annotation) = target.annotation(&root.name) else {
            return Err(Stage::ValidatingTarget);
        };
        let root_values = root
            .resolve(annotation)
            .map_err(|missing| ProcessError::MissingElement {
                annotation: root.name.clone(),
                method: target.qualified_name(),
                element: missing.0,
            })
            .map_err(|err| fail(&err, &element, sink, Stage::AssemblingDescriptor))?;

        let descriptor = TypeDescriptor::new(target, &root.name, collected.descriptors);
        let mut undescribed = 0;
        for method in target.methods.iter().filter(|m| !m.has_default) {
            if !descriptor.describes(&method.name) {
                let err = ProcessError::MissingMessage {
                    annotation: self.child_names(),
                    method: method.name.clone(),
                };
                sink.emit(Diagnostic::from_error(&err, target.method_ref(method)));
                undescribed += 1;
            }
        }
        if undescribed > 0 {
            return Err(Stage::AssemblingDescriptor);
        }

        let descriptor = self
            .handler
            .create_type_descriptor(descriptor, &root_values, &self.options)
            .map_err(|err| fail(&err, &element, sink, Stage::AssemblingDescriptor))?;

        // Generating
        let artifacts = self
            .handler
            .generate(&descriptor, filer, sink)
            .map_err(|err| fail(&err, &element, sink, Stage::Generating))?;

        sink.emit(
            Diagnostic::note(format!(
                "{} generated ({} artifact(s))",
                target.qualified_name(),
                artifacts.len()
            ))
            .at(element),
        );
        Ok(artifacts)
    }

    fn validate_target(&self, target: &TypeElement, root: &AnnotationDecl) -> Result<(), ProcessError> {
        let allowed = self.handler.allowed_type_kinds();
        if allowed.contains(&target.kind) {
            return Ok(());
        }
        Err(ProcessError::InvalidTargetKind {
            annotation: root.name.clone(),
            element: target.qualified_name(),
            kind: target.kind,
            allowed: allowed
                .iter()
                .map(|kind| format!("{kind}s"))
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Child annotations on types without the root annotation are ignored.
    fn report_unowned_children(
        &self,
        round: &RoundEnvironment,
        root: &AnnotationDecl,
        sink: &mut dyn DiagnosticSink,
    ) {
        let children = self.handler.child_annotations();
        for ty in round.types().iter().filter(|ty| !ty.is_annotated_with(&root.name)) {
            for method in &ty.methods {
                let annotated = children
                    .iter()
                    .flat_map(ChildAnnotation::names)
                    .any(|name| method.is_annotated_with(name));
                if annotated {
                    sink.emit(
                        Diagnostic::warning(format!(
                            "annotations on '{}' are ignored: '{}' is not annotated with {}",
                            method.name,
                            ty.qualified_name(),
                            root.name
                        ))
                        .at(ty.method_ref(method)),
                    );
                }
            }
        }
    }

    fn child_names(&self) -> String {
        self.handler
            .child_annotations()
            .iter()
            .map(|child| child.annotation.name.as_str())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

fn fail(err: &ProcessError, element: &ElementRef, sink: &mut dyn DiagnosticSink, stage: Stage) -> Stage {
    sink.emit(Diagnostic::from_error(err, element.clone()));
    stage
}
