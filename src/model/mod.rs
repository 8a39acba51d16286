//! Source model consumed by the processor.
//!
//! The processor never inspects source code. Everything it knows about a
//! message interface comes from bundle definition files (`*.bundle.json`)
//! deserialized into the plain data types of this module.
//!
//! ## Module Structure
//!
//! - `annotation`: annotation occurrences, values and declarations (with defaults)
//! - `element`: types, methods, parameters and type references
//! - `round`: bundle files and the round environment built from them
//! - `scanner`: discovery of bundle files on disk

pub mod annotation;
pub mod element;
pub mod round;
pub mod scanner;

pub use annotation::{Annotation, AnnotationDecl, AnnotationValue, AnnotationValues, ElementDecl};
pub use element::{
    CONTAINER_ELEMENT, ContainerError, ElementRef, MethodElement, Occurrence, Parameter,
    TypeElement, TypeKind, TypeRef,
};
pub use round::{BUNDLE_FILE_SUFFIX, BundleFile, RoundEnvironment, bundle_file_schema};
pub use scanner::{ScanResult, scan_bundle_files};
