//! Naming prefix policy
//!
//! Derives the required prefix from the document path and checks every name a
//! declaration defines or references against it.

use std::path::Path;

use dollop_domain::{Declaration, RequirePrefix, VariableError, VariableResult};

use super::parser::{hoisted_prop, value_references};

/// Derives the prefix every variable name in a document must carry.
///
/// - [`RequirePrefix::File`]: the file name without extension.
/// - [`RequirePrefix::Folder`]: the name of the containing folder.
///
/// Returns `None` when no mode is set, or when the path is missing or has no
/// usable component for the mode.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dollop_application::variable_resolver::prefix::required_prefix;
/// use dollop_domain::RequirePrefix;
///
/// let path = Path::new("/foo/bar.css");
/// assert_eq!(required_prefix(Some(path), Some(RequirePrefix::File)).as_deref(), Some("bar"));
/// assert_eq!(required_prefix(Some(path), Some(RequirePrefix::Folder)).as_deref(), Some("foo"));
/// assert_eq!(required_prefix(Some(path), None), None);
/// ```
#[must_use]
pub fn required_prefix(path: Option<&Path>, mode: Option<RequirePrefix>) -> Option<String> {
    let mode = mode?;
    let Some(path) = path else {
        tracing::warn!(
            mode = %mode,
            "prefix required but the document has no source path; skipping prefix checks"
        );
        return None;
    };

    let prefix = match mode {
        RequirePrefix::File => path.file_stem(),
        RequirePrefix::Folder => path.parent().and_then(Path::file_name),
    };

    prefix
        .map(|p| p.to_string_lossy().into_owned())
        .filter(|p| !p.is_empty())
}

/// Collects the hoisted name (if any) followed by every referenced name.
#[must_use]
pub fn declaration_names(decl: &Declaration) -> Vec<String> {
    hoisted_prop(&decl.prop)
        .map(str::to_string)
        .into_iter()
        .chain(value_references(&decl.value).into_iter().map(|r| r.name))
        .collect()
}

/// Checks that every name in the declaration starts with `<prefix>-`.
///
/// # Errors
///
/// Returns [`VariableError::MissingPrefix`] for the first name without the
/// prefix. Never fails when `prefix` is `None`.
pub fn check_prefix(decl: &Declaration, prefix: Option<&str>) -> VariableResult<()> {
    let Some(prefix) = prefix else {
        return Ok(());
    };

    let expected = format!("{prefix}-");
    match declaration_names(decl)
        .into_iter()
        .find(|name| !name.starts_with(&expected))
    {
        Some(name) => Err(VariableError::MissingPrefix {
            position: decl.position_of(&name),
            prefix: prefix.to_string(),
            name,
        }),
        None => Ok(()),
    }
}
