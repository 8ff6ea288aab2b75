//! Variable resolution module
//!
//! Resolves `$name` references in stylesheet declarations. Two definition
//! styles feed the stores:
//!
//! - hoisted declarations (`$color: red;`, `$color: red !default;`), which are
//!   removed from the output;
//! - inline defaults inside a value (`$color or red`, `[$width or 1px]`).
//!
//! # Usage
//!
//! ```
//! use dollop_application::variable_resolver::VariableResolver;
//! use dollop_domain::{Declaration, TransformOptions, VariableMap};
//!
//! let resolver = VariableResolver::new(VariableMap::new(), TransformOptions::new());
//! let mut document = vec![
//!     Declaration::new("$color", "red"),
//!     Declaration::new("border", "[$width or 1px] solid $color"),
//! ];
//!
//! resolver.resolve_document(&mut document, None).unwrap();
//! assert_eq!(document.len(), 1);
//! assert_eq!(document[0].value, "1px solid red");
//! ```

pub mod engine;
pub mod handlers;
pub mod parser;
pub mod prefix;

pub use engine::{ResolutionSummary, VariableResolver, substitute};
pub use handlers::{handle_hoisted_default, handle_hoisted_variable, handle_inline_defaults};
pub use parser::{
    HoistedDefinition, InlineDefault, SubstitutionSpan, VariableReference,
    extract_variable_names, has_variables, hoisted_default, hoisted_prop, hoisted_variable,
    inline_defaults, substitution_spans, value_references,
};
pub use prefix::{check_prefix, declaration_names, required_prefix};
