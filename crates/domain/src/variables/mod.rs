//! Variable store types

mod resolution;
mod variable;

pub use resolution::ResolutionContext;
pub use variable::{ResolvedVariable, VariableMap, VariableScope};
