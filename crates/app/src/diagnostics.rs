//! Error reporting for the terminal.

use std::io::Write;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term::termcolor::{ColorChoice, NoColor, StandardStream, WriteColor};
use codespan_reporting::term::{self, Config};
use dollop_application::TransformStylesheetError;

/// Writes `error` to `writer`: a caret diagnostic for variable errors,
/// followed by the one-line `path:line:column: message` form.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn report(
    error: &TransformStylesheetError,
    writer: &mut dyn WriteColor,
) -> Result<(), codespan_reporting::files::Error> {
    if let TransformStylesheetError::Variable { path, text, error: cause } = error {
        let file = SimpleFile::new(path.display().to_string(), text.as_str());
        let span = cause.position().span();
        let start = span.start.min(text.len());
        let end = span.end.clamp(start, text.len());

        let diagnostic = Diagnostic::error()
            .with_message(cause.to_string())
            .with_labels(vec![
                Label::primary((), start..end).with_message(cause.kind().label()),
            ]);
        term::emit(writer, &Config::default(), &file, &diagnostic)?;
    }

    writeln!(writer, "{error}")?;
    Ok(())
}

/// Reports `error` to stderr, falling back to plain text if the diagnostic
/// cannot be rendered.
pub fn report_to_stderr(error: &TransformStylesheetError) {
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let mut lock = writer.lock();
    if let Err(render_error) = report(error, &mut lock) {
        tracing::debug!(error = %render_error, "could not render diagnostic");
        let _ = writeln!(lock, "{error}");
    }
}

/// Renders `error` without colors.
#[must_use]
pub fn report_to_string(error: &TransformStylesheetError) -> String {
    let mut writer = NoColor::new(Vec::new());
    if let Err(render_error) = report(error, &mut writer) {
        tracing::debug!(error = %render_error, "could not render diagnostic");
        return format!("{error}\n");
    }
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}
