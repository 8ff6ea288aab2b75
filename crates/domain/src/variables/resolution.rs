//! Resolution context for variable substitution
//!
//! Holds the two stores for one document walk. Values are resolved in order
//! of precedence (highest wins):
//! 1. Explicit (caller-supplied, overwritten by non-default hoisted assignments)
//! 2. Default (`!default` hoisted definitions and inline defaults)
//!
//! Both stores only ever see writes made earlier in document order, so a read
//! always observes the latest write strictly before the current declaration.

use super::variable::{ResolvedVariable, VariableMap, VariableScope};

/// The explicit and default stores for a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionContext {
    /// Explicit values (highest precedence).
    pub explicit: VariableMap,

    /// Fallback values, consulted only when `explicit` has no entry.
    pub defaults: VariableMap,
}

impl ResolutionContext {
    /// Creates a new empty resolution context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context seeded with a copy of the caller's variables.
    /// The caller's map is never mutated by a walk.
    #[must_use]
    pub fn from_variables(variables: &VariableMap) -> Self {
        Self {
            explicit: variables.clone(),
            defaults: VariableMap::new(),
        }
    }

    /// Resolves a variable name to its value and scope.
    /// Empty values count as unset.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<ResolvedVariable> {
        if let Some(value) = self.explicit_value(name) {
            return Some(ResolvedVariable::new(name, value, VariableScope::Explicit));
        }

        self.default_value(name)
            .map(|value| ResolvedVariable::new(name, value, VariableScope::Default))
    }

    /// Resolves a variable name to just its value.
    #[must_use]
    pub fn resolve_value(&self, name: &str) -> Option<String> {
        self.resolve(name).map(|r| r.value)
    }

    /// Returns the explicit value for `name`, if set and non-empty.
    #[must_use]
    pub fn explicit_value(&self, name: &str) -> Option<&str> {
        non_empty(&self.explicit, name)
    }

    /// Returns the default value for `name`, if set and non-empty.
    #[must_use]
    pub fn default_value(&self, name: &str) -> Option<&str> {
        non_empty(&self.defaults, name)
    }

    /// Writes an explicit value, overwriting any previous one.
    pub fn set_explicit(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.explicit.insert(name.into(), value.into());
    }

    /// Writes a default value, overwriting any previous default.
    pub fn set_default(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.defaults.insert(name.into(), value.into());
    }

    /// Returns all variable names across both stores.
    #[must_use]
    pub fn all_variable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .explicit
            .keys()
            .chain(self.defaults.keys())
            .cloned()
            .collect();

        names.sort();
        names.dedup();
        names
    }

    /// Returns the count of distinct variables across both stores.
    #[must_use]
    pub fn total_variable_count(&self) -> usize {
        self.all_variable_names().len()
    }
}

fn non_empty<'a>(map: &'a VariableMap, name: &str) -> Option<&'a str> {
    map.get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}
