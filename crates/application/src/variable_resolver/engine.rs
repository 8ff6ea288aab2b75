//! Variable resolution engine
//!
//! Walks a document's declarations once, in order, folding definitions into
//! the stores and substituting `$name` references as it goes.

use std::path::Path;

use dollop_domain::{
    Declaration, ResolutionContext, ResolvedVariable, TransformOptions, VariableError,
    VariableMap, VariableResult,
};

use super::handlers::{handle_hoisted_default, handle_hoisted_variable, handle_inline_defaults};
use super::parser::{has_variables, hoisted_prop, substitution_spans};
use super::prefix::{check_prefix, required_prefix};
use crate::ports::{DeclarationTree, WalkAction};

/// Result of resolving one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    /// Every substitution made, in document order.
    pub substitutions: Vec<ResolvedVariable>,

    /// Number of hoisted definitions removed from the document.
    pub removed_definitions: usize,

    /// Number of declarations visited.
    pub declarations: usize,
}

impl ResolutionSummary {
    /// Returns the count of substituted references.
    #[must_use]
    pub fn substitution_count(&self) -> usize {
        self.substitutions.len()
    }
}

/// Rewrites every `$name` span in the declaration's value.
///
/// Each span is resolved against the same snapshot of the stores (explicit
/// first, then defaults) and replaced by position, so a repeated name never
/// replaces the wrong occurrence. Values without `$` are left untouched.
///
/// # Errors
///
/// - [`VariableError::MissingPrefix`] when a referenced name lacks the prefix.
/// - [`VariableError::UndefinedVariable`] when a name resolves in neither
///   store. The value is not modified in that case.
pub fn substitute(
    decl: &mut Declaration,
    context: &ResolutionContext,
    prefix: Option<&str>,
) -> VariableResult<Vec<ResolvedVariable>> {
    if !has_variables(&decl.value) {
        return Ok(Vec::new());
    }

    check_prefix(decl, prefix)?;

    let spans = substitution_spans(&decl.value);
    if spans.is_empty() {
        return Ok(Vec::new());
    }

    let mut resolved_vars = Vec::with_capacity(spans.len());
    let mut result = String::with_capacity(decl.value.len());
    let mut last_end = 0;

    for span in &spans {
        let Some(resolved) = context.resolve(&span.name) else {
            return Err(VariableError::UndefinedVariable {
                name: span.name.clone(),
                position: decl.position_of(&span.name),
            });
        };

        result.push_str(&decl.value[last_end..span.span.start]);
        result.push_str(&resolved.value);
        last_end = span.span.end;

        tracing::trace!(
            variable = %resolved.name,
            value = %resolved.value,
            scope = resolved.scope.display_name(),
            "substituted"
        );
        resolved_vars.push(resolved);
    }

    result.push_str(&decl.value[last_end..]);
    decl.value = result;

    Ok(resolved_vars)
}

/// The variable resolution engine.
///
/// Holds the caller's variables and policy options; every call to
/// [`VariableResolver::resolve_document`] works on a fresh copy of the
/// variables, so one resolver can serve many documents, concurrently if
/// needed.
#[derive(Debug, Clone, Default)]
pub struct VariableResolver {
    variables: VariableMap,
    options: TransformOptions,
}

impl VariableResolver {
    /// Creates a new resolver with the given variables and options.
    #[must_use]
    pub const fn new(variables: VariableMap, options: TransformOptions) -> Self {
        Self { variables, options }
    }

    /// Creates a resolver with no variables and no policies.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the caller-supplied variables.
    #[must_use]
    pub const fn variables(&self) -> &VariableMap {
        &self.variables
    }

    /// Returns the policy options.
    #[must_use]
    pub const fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Resolves every declaration of one document, in document order.
    ///
    /// Definitions are visible only to declarations after them. Hoisted
    /// definitions are removed from the tree; other declarations keep their
    /// position with substituted values.
    ///
    /// # Errors
    ///
    /// Returns the first [`VariableError`] in document order. The tree is left
    /// partially rewritten and should be discarded.
    pub fn resolve_document<T>(
        &self,
        tree: &mut T,
        source_path: Option<&Path>,
    ) -> VariableResult<ResolutionSummary>
    where
        T: DeclarationTree + ?Sized,
    {
        let prefix = required_prefix(source_path, self.options.require_prefix);
        let mut context = ResolutionContext::from_variables(&self.variables);
        let mut summary = ResolutionSummary::default();

        tree.walk_declarations(|decl| {
            summary.declarations += 1;
            self.process(decl, &mut context, prefix.as_deref(), &mut summary)
        })?;

        tracing::debug!(
            declarations = summary.declarations,
            substitutions = summary.substitution_count(),
            removed = summary.removed_definitions,
            variables = context.total_variable_count(),
            "document resolved"
        );

        Ok(summary)
    }

    fn process(
        &self,
        decl: &mut Declaration,
        context: &mut ResolutionContext,
        prefix: Option<&str>,
        summary: &mut ResolutionSummary,
    ) -> VariableResult<WalkAction> {
        let require_default = self.options.require_default;

        handle_hoisted_default(decl, context, prefix, require_default)?;
        handle_hoisted_variable(decl, context, prefix, require_default)?;
        handle_inline_defaults(decl, context, prefix, require_default)?;

        let substituted = substitute(decl, context, prefix)?;
        summary.substitutions.extend(substituted);

        if hoisted_prop(&decl.prop).is_some() {
            tracing::debug!(prop = %decl.prop, "removing hoisted definition");
            summary.removed_definitions += 1;
            return Ok(WalkAction::Remove);
        }

        Ok(WalkAction::Keep)
    }
}
