//! Transform stylesheet use case

use std::path::{Path, PathBuf};

use dollop_domain::{TransformOptions, VariableError, VariableMap};

use crate::ports::{FileSystem, FileSystemError, StylesheetCodec};
use crate::variable_resolver::{ResolutionSummary, VariableResolver};

/// Errors that can occur when transforming a stylesheet.
#[derive(Debug, thiserror::Error)]
pub enum TransformStylesheetError {
    /// The source file could not be read.
    #[error("Failed to read {path}: {error}")]
    Read {
        /// The source path.
        path: PathBuf,
        /// The underlying error.
        error: FileSystemError,
    },

    /// The source text is not a well-formed stylesheet.
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// The source path.
        path: PathBuf,
        /// The parser's message.
        message: String,
    },

    /// Variable resolution failed.
    #[error(
        "{}:{}:{}: {error}",
        .path.display(),
        .error.position().line(),
        .error.position().column()
    )]
    Variable {
        /// The source path.
        path: PathBuf,
        /// The source text, kept for caret diagnostics.
        text: String,
        /// The resolution error.
        error: VariableError,
    },

    /// The output file could not be written.
    #[error("Failed to write {path}: {error}")]
    Write {
        /// The output path.
        path: PathBuf,
        /// The underlying error.
        error: FileSystemError,
    },
}

/// Input for transforming one stylesheet.
#[derive(Debug, Clone, Default)]
pub struct TransformInput {
    /// The stylesheet to read. Also drives the required prefix.
    pub source_path: PathBuf,
    /// Where to write the result. `None` returns it without writing.
    pub output_path: Option<PathBuf>,
    /// Caller-supplied variables (the explicit store seed).
    pub variables: VariableMap,
    /// Policy options.
    pub options: TransformOptions,
}

impl TransformInput {
    /// Creates an input for the given source path with no variables.
    #[must_use]
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            ..Self::default()
        }
    }

    /// Sets the output path.
    #[must_use]
    pub fn with_output(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(output_path.into());
        self
    }

    /// Sets the caller-supplied variables.
    #[must_use]
    pub fn with_variables(mut self, variables: VariableMap) -> Self {
        self.variables = variables;
        self
    }

    /// Sets the policy options.
    #[must_use]
    pub const fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }
}

/// Output of a successful transform.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// The transformed stylesheet text.
    pub css: String,
    /// What the resolver did.
    pub summary: ResolutionSummary,
}

/// Reads a stylesheet, resolves its variables and writes the result.
pub struct TransformStylesheet<F, C> {
    file_system: F,
    codec: C,
}

impl<F: FileSystem, C: StylesheetCodec> TransformStylesheet<F, C> {
    /// Creates a new `TransformStylesheet` use case.
    pub const fn new(file_system: F, codec: C) -> Self {
        Self { file_system, codec }
    }

    /// Transforms text that is already in memory. `source_path` only feeds
    /// the prefix policy and error messages.
    ///
    /// # Errors
    ///
    /// Returns a parse or variable error.
    pub fn transform_text(
        &self,
        text: &str,
        source_path: Option<&Path>,
        resolver: &VariableResolver,
    ) -> Result<TransformOutput, TransformStylesheetError> {
        let display_path = source_path.map(Path::to_path_buf).unwrap_or_default();

        let mut document =
            self.codec
                .parse(text)
                .map_err(|e| TransformStylesheetError::Parse {
                    path: display_path.clone(),
                    message: e.to_string(),
                })?;

        let summary = resolver
            .resolve_document(&mut document, source_path)
            .map_err(|error| TransformStylesheetError::Variable {
                path: display_path,
                text: text.to_string(),
                error,
            })?;

        Ok(TransformOutput {
            css: self.codec.stringify(&document),
            summary,
        })
    }

    /// Executes the use case.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or parsed, a variable
    /// cannot be resolved, or the output cannot be written.
    pub async fn execute(
        &self,
        input: TransformInput,
    ) -> Result<TransformOutput, TransformStylesheetError> {
        let TransformInput {
            source_path,
            output_path,
            variables,
            options,
        } = input;

        let text = self
            .file_system
            .read_file_string(&source_path)
            .await
            .map_err(|error| TransformStylesheetError::Read {
                path: source_path.clone(),
                error,
            })?;

        let resolver = VariableResolver::new(variables, options);
        let output = self.transform_text(&text, Some(&source_path), &resolver)?;

        if let Some(output_path) = output_path {
            self.file_system
                .write_file(&output_path, output.css.as_bytes())
                .await
                .map_err(|error| TransformStylesheetError::Write {
                    path: output_path.clone(),
                    error,
                })?;
            tracing::info!(
                source = %source_path.display(),
                output = %output_path.display(),
                substitutions = output.summary.substitution_count(),
                "stylesheet written"
            );
        }

        Ok(output)
    }
}
