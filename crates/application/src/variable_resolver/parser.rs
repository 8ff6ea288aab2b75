//! Pattern extractors for `$variable` syntax
//!
//! Each recognizer is a pure function over a declaration's property and/or
//! value text and returns structured matches with byte spans, so callers can
//! replace by position rather than by searching for text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static HOISTED_PROP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\$(.+)$").expect("valid regex"));

static VALUE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([\w-]+)").expect("valid regex"));

static HOISTED_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.*?)\s?!default$").expect("valid regex"));

static INLINE_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[?\$([\w-]+)\sor\s(.+?)(?:\]|$)").expect("valid regex"));

// A bare reference ends at whitespace or `)`; the terminator is captured in
// group 2 and excluded from the span. A reference with an optional ` or value`
// suffix ends at `]` or end of input and is replaced as a whole.
static SUBSTITUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[?\$([\w-]+)(?:(?:\sor\s.+?)?(?:\]|$)|([\s)]))").expect("valid regex")
});

/// A `$name` reference found in a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name (without `$`).
    pub name: String,

    /// Byte range of `$name` in the value.
    pub span: Range<usize>,
}

/// A hoisted `$name: value` definition, with or without `!default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoistedDefinition {
    /// The variable name (without `$`).
    pub name: String,

    /// The assigned value, `!default` stripped.
    pub value: String,
}

/// An inline `$name or value` fallback, optionally wrapped in `[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineDefault {
    /// The variable name (without `$`).
    pub name: String,

    /// The fallback value.
    pub value: String,

    /// Byte range of the whole inline default, brackets included.
    pub span: Range<usize>,
}

/// A span of a value to be replaced by a resolved variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionSpan {
    /// The variable name (without `$`).
    pub name: String,

    /// Byte range to replace.
    pub span: Range<usize>,
}

/// Returns the variable name if `prop` is a hoisted definition (`$name`).
#[must_use]
pub fn hoisted_prop(prop: &str) -> Option<&str> {
    HOISTED_PROP
        .captures(prop)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Returns every `$name` reference in `value`, in order of occurrence.
///
/// # Examples
///
/// ```
/// use dollop_application::variable_resolver::parser::value_references;
///
/// let refs = value_references("$width solid [$color or black]");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "width");
/// assert_eq!(refs[1].name, "color");
/// ```
#[must_use]
pub fn value_references(value: &str) -> Vec<VariableReference> {
    VALUE_REFERENCE
        .captures_iter(value)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            Some(VariableReference {
                name: name.as_str().to_string(),
                span: whole.range(),
            })
        })
        .collect()
}

/// Extracts just the referenced names from `value`.
#[must_use]
pub fn extract_variable_names(value: &str) -> Vec<String> {
    value_references(value).into_iter().map(|r| r.name).collect()
}

/// Returns the hoisted default defined by this declaration, if any.
///
/// Requires a hoisted prop and a value ending in `!default` with a non-empty
/// value in front of it.
#[must_use]
pub fn hoisted_default(prop: &str, value: &str) -> Option<HoistedDefinition> {
    let name = hoisted_prop(prop)?;
    let default_value = HOISTED_DEFAULT.captures(value)?.get(1)?.as_str();

    if default_value.is_empty() {
        return None;
    }

    Some(HoistedDefinition {
        name: name.to_string(),
        value: default_value.to_string(),
    })
}

/// Returns the non-default hoisted variable defined by this declaration, if
/// any: a hoisted prop for which [`hoisted_default`] finds nothing.
#[must_use]
pub fn hoisted_variable(prop: &str, value: &str) -> Option<HoistedDefinition> {
    let name = hoisted_prop(prop)?;

    if hoisted_default(prop, value).is_some() {
        return None;
    }

    Some(HoistedDefinition {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Returns every inline default in `value`, in order of occurrence.
///
/// An unbracketed inline default captures up to the end of the value, so it
/// must be the last token; use `[$name or value]` when there are several.
#[must_use]
pub fn inline_defaults(value: &str) -> Vec<InlineDefault> {
    INLINE_DEFAULT
        .captures_iter(value)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(InlineDefault {
                name: caps.get(1)?.as_str().to_string(),
                value: caps.get(2)?.as_str().to_string(),
                span: whole.range(),
            })
        })
        .collect()
}

/// Returns the spans of `value` that substitution replaces.
///
/// References followed by anything other than whitespace, `)`, `]` or the end
/// of the value (for example `"$1"`) are not substitution spans.
#[must_use]
pub fn substitution_spans(value: &str) -> Vec<SubstitutionSpan> {
    SUBSTITUTION
        .captures_iter(value)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            let end = caps.get(2).map_or(whole.end(), |terminator| terminator.start());
            Some(SubstitutionSpan {
                name: name.as_str().to_string(),
                span: whole.start()..end,
            })
        })
        .collect()
}

/// Returns true if the value may contain variable references.
#[must_use]
pub fn has_variables(value: &str) -> bool {
    value.contains('$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hoisted_prop() {
        assert_eq!(hoisted_prop("$color"), Some("color"));
        assert_eq!(hoisted_prop("$bar-color"), Some("bar-color"));
        assert_eq!(hoisted_prop("color"), None);
        assert_eq!(hoisted_prop("$"), None);
    }

    #[test]
    fn test_value_references_keep_duplicates() {
        let names = extract_variable_names("$a $b $a");
        assert_eq!(names, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_value_reference_spans() {
        let value = "calc(100% - $width)";
        let refs = value_references(value);
        assert_eq!(refs.len(), 1);
        assert_eq!(&value[refs[0].span.clone()], "$width");
    }

    #[test]
    fn test_value_references_include_digits() {
        assert_eq!(extract_variable_names(r#""$1""#), vec!["1"]);
    }

    #[test]
    fn test_hoisted_default() {
        let found = hoisted_default("$color", "red !default").expect("default");
        assert_eq!(found.name, "color");
        assert_eq!(found.value, "red");

        let shouting = hoisted_default("$color", "red !DEFAULT").expect("default");
        assert_eq!(shouting.value, "red");

        let tight = hoisted_default("$color", "red!default").expect("default");
        assert_eq!(tight.value, "red");
    }

    #[test]
    fn test_hoisted_default_requires_hoisted_prop() {
        assert_eq!(hoisted_default("color", "red !default"), None);
    }

    #[test]
    fn test_hoisted_default_requires_value() {
        assert_eq!(hoisted_default("$color", "!default"), None);
        assert_eq!(hoisted_default("$color", "red"), None);
    }

    #[test]
    fn test_hoisted_variable() {
        let found = hoisted_variable("$color", "red").expect("variable");
        assert_eq!(found.name, "color");
        assert_eq!(found.value, "red");

        assert_eq!(hoisted_variable("$color", "red !default"), None);
        assert_eq!(hoisted_variable("color", "red"), None);
    }

    #[test]
    fn test_bare_default_flag_is_a_variable() {
        let found = hoisted_variable("$color", "!default").expect("variable");
        assert_eq!(found.value, "!default");
    }

    #[test]
    fn test_unbracketed_inline_default() {
        let found = inline_defaults("$color or red");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "color");
        assert_eq!(found[0].value, "red");
        assert_eq!(found[0].span, 0..13);
    }

    #[test]
    fn test_bracketed_inline_defaults() {
        let value = "[$width or 1px] solid [$color or black]";
        let found = inline_defaults(value);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "width");
        assert_eq!(found[0].value, "1px");
        assert_eq!(&value[found[0].span.clone()], "[$width or 1px]");
        assert_eq!(found[1].name, "color");
        assert_eq!(found[1].value, "black");
    }

    #[test]
    fn test_unbracketed_inline_default_runs_to_end() {
        let found = inline_defaults("$width or 1px solid black");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, "1px solid black");
    }

    #[test]
    fn test_inline_default_keyword_is_case_insensitive() {
        let found = inline_defaults("$color OR red");
        assert_eq!(found[0].value, "red");
    }

    #[test]
    fn test_no_inline_defaults() {
        assert!(inline_defaults("$width solid").is_empty());
        assert!(inline_defaults("1px solid black").is_empty());
    }

    #[test]
    fn test_substitution_bare_reference_at_end() {
        let spans = substitution_spans("$color");
        assert_eq!(
            spans,
            vec![SubstitutionSpan {
                name: "color".into(),
                span: 0..6
            }]
        );
    }

    #[test]
    fn test_substitution_excludes_terminator() {
        let value = "calc(100% - $width)";
        let spans = substitution_spans(value);
        assert_eq!(spans.len(), 1);
        assert_eq!(&value[spans[0].span.clone()], "$width");

        let value = "$width solid";
        let spans = substitution_spans(value);
        assert_eq!(&value[spans[0].span.clone()], "$width");
    }

    #[test]
    fn test_substitution_covers_whole_inline_default() {
        let value = "$width solid [$color or black]";
        let spans = substitution_spans(value);

        assert_eq!(spans.len(), 2);
        assert_eq!(&value[spans[0].span.clone()], "$width");
        assert_eq!(&value[spans[1].span.clone()], "[$color or black]");
    }

    #[test]
    fn test_substitution_ignores_quoted_reference() {
        assert!(substitution_spans(r#""$1""#).is_empty());
    }

    #[test]
    fn test_substitution_repeated_name_gets_distinct_spans() {
        let value = "$gap $gap";
        let spans = substitution_spans(value);

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].span, 0..4);
        assert_eq!(spans[1].span, 5..9);
    }

    #[test]
    fn test_has_variables() {
        assert!(has_variables("$color"));
        assert!(has_variables(r#""$1""#));
        assert!(!has_variables("red"));
    }
}
