//! Dollop Application - Variable engine, use cases and ports
//!
//! This crate defines the application layer with:
//! - The `$variable` resolution engine
//! - Port traits (interfaces for external dependencies)
//! - Use case orchestration

pub mod ports;
pub mod use_cases;
pub mod variable_resolver;

pub use ports::{DeclarationTree, FileSystem, FileSystemError, StylesheetCodec, WalkAction};
pub use use_cases::{
    TransformInput, TransformOutput, TransformStylesheet, TransformStylesheetError,
};
pub use variable_resolver::{ResolutionSummary, VariableResolver};
