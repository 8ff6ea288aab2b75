//! Domain error types

use std::ops::Range;

use thiserror::Error;

use crate::declaration::SourcePosition;

/// Where an error points: the offending declaration plus an offset into its
/// rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPosition {
    /// Start of the declaration that raised the error.
    pub source: SourcePosition,
    /// Zero-based byte offset of the `$name` token within the declaration.
    pub offset: usize,
    /// Length of the `$name` token in bytes.
    pub len: usize,
    line: usize,
    column: usize,
}

impl ErrorPosition {
    /// Creates a position for a token that follows `preceding`, the part of
    /// the declaration text written before it.
    ///
    /// Line and column advance through `preceding` the same way the source
    /// text is counted: one line per `\n`, one column per character.
    #[must_use]
    pub fn new(source: SourcePosition, preceding: &str, len: usize) -> Self {
        let (line, column) = match preceding.rfind('\n') {
            Some(newline) => (
                source.line + preceding.matches('\n').count(),
                preceding[newline + 1..].chars().count() + 1,
            ),
            None => (source.line, source.column + preceding.chars().count()),
        };

        Self {
            source,
            offset: preceding.len(),
            len,
            line,
            column,
        }
    }

    /// 1-based line of the `$name` token.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the `$name` token, in characters.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Byte range of the `$name` token in the source text.
    #[must_use]
    pub const fn span(&self) -> Range<usize> {
        let start = self.source.offset + self.offset;
        start..start + self.len
    }
}

/// Discriminant of a [`VariableError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableErrorKind {
    /// A name does not carry the required prefix.
    MissingPrefix,
    /// A hoisted variable lacks `!default` while flags are required.
    MissingDefaultFlag,
    /// A hoisted definition was used while only inline defaults are allowed.
    IllegalHoistedDefinition,
    /// An inline default was used while only hoisted definitions are allowed.
    IllegalInlineDefinition,
    /// A reference resolved in neither store.
    UndefinedVariable,
}

impl VariableErrorKind {
    /// Short label for diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MissingPrefix => "missing prefix",
            Self::MissingDefaultFlag => "missing !default",
            Self::IllegalHoistedDefinition => "hoisted definition not allowed",
            Self::IllegalInlineDefinition => "inline default not allowed",
            Self::UndefinedVariable => "undefined",
        }
    }
}

/// Errors raised while resolving variables in a document.
///
/// Every error is fatal for the document being processed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VariableError {
    /// A variable name does not start with the required prefix.
    #[error("No prefix for ${name}! Should it be ${prefix}-{name}?")]
    MissingPrefix {
        /// The offending name.
        name: String,
        /// The prefix every name must carry.
        prefix: String,
        /// Where the name appears.
        position: ErrorPosition,
    },

    /// A hoisted variable has no `!default` flag.
    #[error("No !default flag set for ${name}!")]
    MissingDefaultFlag {
        /// The offending name.
        name: String,
        /// Where the name appears.
        position: ErrorPosition,
    },

    /// A hoisted definition is not allowed.
    #[error("Illegal hoisted variable ${name}! Use \"${name} or value\"")]
    IllegalHoistedDefinition {
        /// The offending name.
        name: String,
        /// Where the name appears.
        position: ErrorPosition,
    },

    /// An inline default is not allowed.
    #[error("Illegal inline variable ${name}! Use \"${name}: value !default\"")]
    IllegalInlineDefinition {
        /// The offending name.
        name: String,
        /// Where the name appears.
        position: ErrorPosition,
    },

    /// A reference has no value in either store.
    #[error("${name} not defined!")]
    UndefinedVariable {
        /// The offending name.
        name: String,
        /// Where the name appears.
        position: ErrorPosition,
    },
}

impl VariableError {
    /// Returns the error discriminant.
    #[must_use]
    pub const fn kind(&self) -> VariableErrorKind {
        match self {
            Self::MissingPrefix { .. } => VariableErrorKind::MissingPrefix,
            Self::MissingDefaultFlag { .. } => VariableErrorKind::MissingDefaultFlag,
            Self::IllegalHoistedDefinition { .. } => VariableErrorKind::IllegalHoistedDefinition,
            Self::IllegalInlineDefinition { .. } => VariableErrorKind::IllegalInlineDefinition,
            Self::UndefinedVariable { .. } => VariableErrorKind::UndefinedVariable,
        }
    }

    /// Returns the offending variable name (without the `$` sigil).
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::MissingPrefix { name, .. }
            | Self::MissingDefaultFlag { name, .. }
            | Self::IllegalHoistedDefinition { name, .. }
            | Self::IllegalInlineDefinition { name, .. }
            | Self::UndefinedVariable { name, .. } => name,
        }
    }

    /// Returns where the error points.
    #[must_use]
    pub const fn position(&self) -> &ErrorPosition {
        match self {
            Self::MissingPrefix { position, .. }
            | Self::MissingDefaultFlag { position, .. }
            | Self::IllegalHoistedDefinition { position, .. }
            | Self::IllegalInlineDefinition { position, .. }
            | Self::UndefinedVariable { position, .. } => position,
        }
    }
}

/// Result type alias for variable resolution.
pub type VariableResult<T> = Result<T, VariableError>;
