//! Annotation processing core.
//!
//! ## Module Structure
//!
//! - `processor`: round orchestration and the [`HierarchyHandler`] seam
//! - `collect`: child annotation occurrences to method descriptors
//! - `descriptor`: immutable method and type descriptors
//! - `validate`: placeholder arity and return type checks
//! - `bundle`: the message bundle handler
//! - `generate`: catalog and implementation rendering
//! - `filer`: where artifacts get written
//! - `error`: [`ProcessError`]

pub mod bundle;
pub mod collect;
pub mod descriptor;
pub mod error;
pub mod filer;
pub mod generate;
pub mod processor;
pub mod validate;

pub use bundle::{BundleSettings, MessageBundleHandler};
pub use collect::{ChildAnnotation, Collected, Collector};
pub use descriptor::{CatalogDescriptor, MessageMethodDescriptor, MethodDescriptor, TypeDescriptor};
pub use error::ProcessError;
pub use filer::{Artifact, ArtifactKind, Filer, FsFiler, MemoryFiler};
pub use processor::{
    HierarchyHandler, HierarchyProcessor, ProcessorOptions, RoundOutcome, Stage, TypeOutcome,
    TypeSelection, TypeStatus,
};
pub use validate::ReturnTypeRules;
