//! Runs the transform for every input.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use dollop_application::{
    TransformInput, TransformOutput, TransformStylesheet, TransformStylesheetError,
};
use dollop_domain::{TransformOptions, VariableMap};
use dollop_infrastructure::{ConfigError, ConfigRepository, CssCodec, TokioFileSystem};
use tokio::task::JoinSet;

use crate::cli::Cli;
use crate::diagnostics;

/// Errors that stop the run before or outside of per-file processing.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// `--output` was given with more than one input.
    #[error("--output accepts a single input; use --out-dir for {0} inputs")]
    OutputWithMultipleInputs(usize),

    /// The config or variables file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A transform task panicked or was cancelled.
    #[error("transform task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Writing to stdout or reading the working directory failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything needed to transform the inputs, resolved from the command
/// line and config file.
#[derive(Debug, Clone)]
pub struct Plan {
    /// One job per input, in command-line order.
    pub jobs: Vec<TransformInput>,
}

impl Plan {
    /// Builds the plan. Relative paths are resolved against `working_dir`.
    /// Variables are layered config < `--variables` < `--var`; options from
    /// the command line override the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if `--output` is combined with several inputs or a
    /// config or variables file cannot be loaded.
    pub async fn from_cli(
        cli: &Cli,
        working_dir: &Path,
        repository: &ConfigRepository,
    ) -> Result<Self, RunError> {
        if cli.output.is_some() && cli.inputs.len() > 1 {
            return Err(RunError::OutputWithMultipleInputs(cli.inputs.len()));
        }

        let config_path = cli.config.as_ref().map(|path| working_dir.join(path));
        let config = repository.load(config_path.as_deref()).await?;

        let mut variables: VariableMap = config.variables;
        if let Some(path) = &cli.variables {
            variables.extend(repository.load_variables(&working_dir.join(path)).await?);
        }
        variables.extend(cli.vars.iter().cloned());

        let options: TransformOptions = config.options.merge(cli.options());
        tracing::debug!(
            variables = variables.len(),
            require_prefix = ?options.require_prefix,
            require_default = ?options.require_default,
            "resolved settings"
        );

        let jobs = cli
            .inputs
            .iter()
            .map(|input| {
                let source = working_dir.join(input);
                let mut job = TransformInput::new(&source)
                    .with_variables(variables.clone())
                    .with_options(options);
                if let Some(output) = &cli.output {
                    job = job.with_output(working_dir.join(output));
                } else if let Some(out_dir) = &cli.out_dir
                    && let Some(file_name) = source.file_name()
                {
                    job = job.with_output(working_dir.join(out_dir).join(file_name));
                }
                job
            })
            .collect();

        Ok(Self { jobs })
    }
}

/// Transforms every input concurrently. Results without an output path are
/// printed to stdout in input order; failures are reported to stderr.
///
/// Returns the number of inputs that failed.
///
/// # Errors
///
/// Returns an error if a task cannot be joined or stdout cannot be written.
pub async fn execute(plan: Plan) -> Result<usize, RunError> {
    let use_case = Arc::new(TransformStylesheet::new(
        TokioFileSystem::new(),
        CssCodec::new(),
    ));

    let mut tasks = JoinSet::new();
    for (index, job) in plan.jobs.into_iter().enumerate() {
        let use_case = Arc::clone(&use_case);
        let to_stdout = job.output_path.is_none();
        tasks.spawn(async move { (index, to_stdout, use_case.execute(job).await) });
    }

    let mut results: Vec<(usize, bool, Result<TransformOutput, TransformStylesheetError>)> =
        Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        results.push(joined?);
    }
    results.sort_by_key(|(index, ..)| *index);

    let mut failures = 0;
    let mut stdout = std::io::stdout().lock();
    for (_, to_stdout, result) in results {
        match result {
            Ok(output) if to_stdout => stdout.write_all(output.css.as_bytes())?,
            Ok(_) => {}
            Err(error) => {
                failures += 1;
                diagnostics::report_to_stderr(&error);
            }
        }
    }
    stdout.flush()?;

    Ok(failures)
}

/// Resolves the plan from `cli` and runs it.
///
/// # Errors
///
/// See [`Plan::from_cli`] and [`execute`].
pub async fn run(cli: &Cli) -> Result<usize, RunError> {
    let working_dir = std::env::current_dir()?;
    let repository = ConfigRepository::new(&working_dir);
    let plan = Plan::from_cli(cli, &working_dir, &repository).await?;
    execute(plan).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::Parser;
    use dollop_domain::{RequireDefault, RequirePrefix};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dollop").chain(args.iter().copied())).unwrap()
    }

    fn output_path(job: &TransformInput) -> Option<PathBuf> {
        job.output_path.clone()
    }

    async fn plan(args: &[&str], root: &Path) -> Result<Plan, RunError> {
        let repository = ConfigRepository::new(root).with_user_config_dir(None);
        Plan::from_cli(&cli(args), root, &repository).await
    }

    #[tokio::test]
    async fn test_variables_are_layered() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("dollop.json"),
            r#"{"variables": {"a": "config", "b": "config", "c": "config"}, "requirePrefix": "file"}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("vars.yml"), "b: file\nc: file\n").unwrap();

        let layered = plan(
            &[
                "x.css",
                "--variables",
                "vars.yml",
                "--var",
                "c=flag",
                "--require-default",
                "hoisted",
            ],
            dir.path(),
        )
        .await
        .unwrap();

        let job = &layered.jobs[0];
        assert_eq!(job.variables.get("a").map(String::as_str), Some("config"));
        assert_eq!(job.variables.get("b").map(String::as_str), Some("file"));
        assert_eq!(job.variables.get("c").map(String::as_str), Some("flag"));
        assert_eq!(
            job.options,
            TransformOptions::new()
                .with_require_prefix(RequirePrefix::File)
                .with_require_default(RequireDefault::Hoisted)
        );
    }

    #[tokio::test]
    async fn test_output_paths() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        let single = plan(&["a.css", "-o", "out.css"], root).await.unwrap();
        assert_eq!(output_path(&single.jobs[0]), Some(root.join("out.css")));

        let many = plan(&["src/a.css", "b.css", "--out-dir", "dist"], root)
            .await
            .unwrap();
        assert_eq!(output_path(&many.jobs[0]), Some(root.join("dist").join("a.css")));
        assert_eq!(output_path(&many.jobs[1]), Some(root.join("dist").join("b.css")));

        let stdout = plan(&["a.css"], root).await.unwrap();
        assert_eq!(output_path(&stdout.jobs[0]), None);
        assert_eq!(stdout.jobs[0].source_path, root.join("a.css"));
    }

    #[tokio::test]
    async fn test_output_with_many_inputs_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result = plan(&["a.css", "b.css", "-o", "out.css"], dir.path()).await;
        assert!(matches!(result, Err(RunError::OutputWithMultipleInputs(2))));
    }

    #[tokio::test]
    async fn test_execute_counts_failures() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::write(root.join("ok.css"), "$c: red;\na { color: $c; }").unwrap();
        std::fs::write(root.join("bad.css"), "a { color: $missing; }").unwrap();

        let jobs = plan(&["ok.css", "bad.css", "--out-dir", "dist"], root)
            .await
            .unwrap();
        let failures = execute(jobs).await.unwrap();

        assert_eq!(failures, 1);
        assert_eq!(
            std::fs::read_to_string(root.join("dist").join("ok.css")).unwrap(),
            "a { color: red; }"
        );
        assert!(!root.join("dist").join("bad.css").exists());
    }
}
