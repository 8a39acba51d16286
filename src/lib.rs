//! msgbundle - message bundle processor
//!
//! msgbundle reads annotated message interfaces from bundle definition files,
//! validates every message against its method signature, and generates one
//! catalog per locale plus a Rust implementation of the interface that looks
//! messages up at runtime.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: The processing pipeline (collect, validate, assemble, generate)
//! - `diagnostics`: Diagnostics emitted while processing
//! - `model`: Bundle definition files and the elements they describe

pub mod cli;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod model;
