//! Variable value types

use std::collections::HashMap;

/// Variable values keyed by name (without the `$` sigil).
pub type VariableMap = HashMap<String, String>;

/// Which store a value was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableScope {
    /// Fallback values from `!default` and inline defaults
    Default,
    /// Caller-supplied values and non-default hoisted assignments
    Explicit,
}

impl VariableScope {
    /// Returns a human-readable name for the scope.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Explicit => "Explicit",
        }
    }
}

/// A resolved variable with its value and origin scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariable {
    /// The variable name (without `$`).
    pub name: String,
    /// The resolved value.
    pub value: String,
    /// The store from which this value was resolved.
    pub scope: VariableScope,
}

impl ResolvedVariable {
    /// Creates a new resolved variable.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, scope: VariableScope) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            scope,
        }
    }
}
