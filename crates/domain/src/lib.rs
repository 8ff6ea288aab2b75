//! Dollop Domain - Core types
//!
//! This crate defines the domain model for the Dollop variable resolver:
//! declaration nodes, the two variable stores, transform options and the
//! error taxonomy. All types here are pure Rust with no I/O dependencies.

pub mod declaration;
pub mod error;
pub mod options;
pub mod variables;

pub use declaration::{Declaration, DeclarationRaws, SourcePosition};
pub use error::{ErrorPosition, VariableError, VariableErrorKind, VariableResult};
pub use options::{ParseOptionError, RequireDefault, RequirePrefix, TransformOptions};
pub use variables::{ResolutionContext, ResolvedVariable, VariableMap, VariableScope};
