//! Declaration node types
//!
//! A declaration is one `prop: value` pair owned by a stylesheet tree. The
//! resolver only rewrites `value` or asks the tree to drop the node.

use std::fmt;

use crate::error::ErrorPosition;

/// Where a node starts in the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
    /// Byte offset from the start of the source text.
    pub offset: usize,
}

impl SourcePosition {
    /// Creates a new source position.
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

/// Raw formatting around a declaration, kept so the tree can be written back
/// without reformatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationRaws {
    /// Text written before the declaration (usually whitespace).
    pub before: String,
    /// Text between the property and the value, colon included.
    pub between: String,
}

impl Default for DeclarationRaws {
    fn default() -> Self {
        Self {
            before: String::new(),
            between: ": ".to_string(),
        }
    }
}

/// A single `prop: value` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// The property name, e.g. `color` or `$color`.
    pub prop: String,
    /// The raw value text.
    pub value: String,
    /// Formatting raws.
    pub raws: DeclarationRaws,
    /// Start of the declaration in the source text.
    pub source: SourcePosition,
}

impl Declaration {
    /// Creates a declaration with default raws at the start of the source.
    #[must_use]
    pub fn new(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            value: value.into(),
            raws: DeclarationRaws::default(),
            source: SourcePosition::default(),
        }
    }

    /// Sets the source position.
    #[must_use]
    pub const fn at(mut self, source: SourcePosition) -> Self {
        self.source = source;
        self
    }

    /// Sets the leading raw text.
    #[must_use]
    pub fn with_before(mut self, before: impl Into<String>) -> Self {
        self.raws.before = before.into();
        self
    }

    /// Sets the raw text between prop and value.
    #[must_use]
    pub fn with_between(mut self, between: impl Into<String>) -> Self {
        self.raws.between = between.into();
        self
    }

    /// The declaration as written in source: `prop`, `between`, `value`.
    #[must_use]
    pub fn rendered(&self) -> String {
        format!("{}{}{}", self.prop, self.raws.between, self.value)
    }

    /// Locates `$name` inside this declaration for error reporting.
    ///
    /// The offset is the index of the first occurrence of `name` in the
    /// rendered text minus one (to land on the sigil), floored at zero. A zero
    /// result falls back to the index of the whole `$name` word, which is what
    /// keeps `color: $color` from pointing at the property.
    #[must_use]
    pub fn position_of(&self, name: &str) -> ErrorPosition {
        let rendered = self.rendered();
        let index = rendered
            .find(name)
            .map_or(0, |found| found.saturating_sub(1));

        let mut offset = if index > 0 {
            index
        } else {
            rendered.find(&format!("${name}")).unwrap_or(0)
        };
        while !rendered.is_char_boundary(offset) {
            offset -= 1;
        }

        ErrorPosition::new(self.source, &rendered[..offset], name.len() + 1)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prop, self.raws.between, self.value)
    }
}
