//! Definition handlers
//!
//! Each handler inspects one declaration, enforces the configured definition
//! style, checks the naming prefix and folds any definition it finds into the
//! matching store.

use dollop_domain::{
    Declaration, RequireDefault, ResolutionContext, VariableError, VariableMap, VariableResult,
};

use super::parser::{hoisted_default, hoisted_variable, inline_defaults};
use super::prefix::check_prefix;

/// Resolves an assigned value that may be a `$other` reference.
///
/// A value containing `$` is looked up (first sigil removed) in `store`.
/// Returns `None` when the value is empty or the reference has no value yet.
fn assignment_value(value: &str, store: &VariableMap) -> Option<String> {
    if value.is_empty() {
        return None;
    }

    if !value.contains('$') {
        return Some(value.to_string());
    }

    let referenced = value.replacen('$', "", 1);
    store
        .get(&referenced)
        .filter(|resolved| !resolved.is_empty())
        .cloned()
}

/// Handles `$name: value !default;`.
///
/// # Errors
///
/// - [`VariableError::IllegalHoistedDefinition`] when only inline defaults are
///   allowed.
/// - [`VariableError::MissingPrefix`] when a name lacks the required prefix.
pub fn handle_hoisted_default(
    decl: &Declaration,
    context: &mut ResolutionContext,
    prefix: Option<&str>,
    require_default: Option<RequireDefault>,
) -> VariableResult<()> {
    let found = hoisted_default(&decl.prop, &decl.value);

    if let Some(definition) = &found
        && require_default == Some(RequireDefault::Inline)
    {
        return Err(VariableError::IllegalHoistedDefinition {
            name: definition.name.clone(),
            position: decl.position_of(&definition.name),
        });
    }

    check_prefix(decl, prefix)?;

    let Some(definition) = found else {
        return Ok(());
    };

    match assignment_value(&definition.value, &context.defaults) {
        Some(value) => {
            tracing::debug!(variable = %definition.name, %value, "hoisted default");
            context.set_default(definition.name, value);
        }
        None => {
            tracing::debug!(
                variable = %definition.name,
                reference = %definition.value,
                "hoisted default references an unset variable; skipped"
            );
        }
    }

    Ok(())
}

/// Handles `$name: value;` (no `!default`).
///
/// The assignment always overwrites the explicit store, including values the
/// caller supplied.
///
/// # Errors
///
/// - [`VariableError::MissingDefaultFlag`] when `!default` is required.
/// - [`VariableError::IllegalHoistedDefinition`] when only inline defaults are
///   allowed.
/// - [`VariableError::MissingPrefix`] when a name lacks the required prefix.
pub fn handle_hoisted_variable(
    decl: &Declaration,
    context: &mut ResolutionContext,
    prefix: Option<&str>,
    require_default: Option<RequireDefault>,
) -> VariableResult<()> {
    let found = hoisted_variable(&decl.prop, &decl.value);

    if let Some(definition) = &found {
        match require_default {
            Some(RequireDefault::Flag) => {
                return Err(VariableError::MissingDefaultFlag {
                    name: definition.name.clone(),
                    position: decl.position_of(&definition.name),
                });
            }
            Some(RequireDefault::Inline) => {
                return Err(VariableError::IllegalHoistedDefinition {
                    name: definition.name.clone(),
                    position: decl.position_of(&definition.name),
                });
            }
            Some(RequireDefault::Hoisted) | None => {}
        }
    }

    check_prefix(decl, prefix)?;

    let Some(definition) = found else {
        return Ok(());
    };

    if let Some(value) = assignment_value(&definition.value, &context.explicit) {
        tracing::debug!(variable = %definition.name, %value, "hoisted variable");
        context.set_explicit(definition.name, value);
    }

    Ok(())
}

/// Handles `$name or value` and `[$name or value]` inside a value.
///
/// # Errors
///
/// - [`VariableError::IllegalInlineDefinition`] (naming the first inline
///   default) when only hoisted definitions are allowed.
/// - [`VariableError::MissingPrefix`] when a name lacks the required prefix.
pub fn handle_inline_defaults(
    decl: &Declaration,
    context: &mut ResolutionContext,
    prefix: Option<&str>,
    require_default: Option<RequireDefault>,
) -> VariableResult<()> {
    let found = inline_defaults(&decl.value);

    if let Some(first) = found.first()
        && require_default == Some(RequireDefault::Hoisted)
    {
        return Err(VariableError::IllegalInlineDefinition {
            name: first.name.clone(),
            position: decl.position_of(&first.name),
        });
    }

    check_prefix(decl, prefix)?;

    for default in found {
        tracing::debug!(variable = %default.name, value = %default.value, "inline default");
        context.set_default(default.name, default.value);
    }

    Ok(())
}
