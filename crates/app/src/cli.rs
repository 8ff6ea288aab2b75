//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use dollop_domain::{RequireDefault, RequirePrefix, TransformOptions};

/// Resolve `$variables` in stylesheets.
#[derive(Parser, Debug)]
#[command(name = "dollop", version)]
#[command(about = "Resolve $variables in stylesheets")]
pub struct Cli {
    /// Stylesheets to transform
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (single input only)
    #[arg(short, long, conflicts_with = "out_dir")]
    pub output: Option<PathBuf>,

    /// Output directory; each result keeps its input's file name
    #[arg(long = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// JSON or YAML file with variables
    #[arg(long)]
    pub variables: Option<PathBuf>,

    /// Set a variable (repeatable), e.g. `--var color=red`
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Require variable names to start with the file or folder name
    #[arg(long, value_name = "file|folder")]
    pub require_prefix: Option<RequirePrefix>,

    /// Restrict how variables may be defined
    #[arg(long, value_name = "flag|inline|hoisted")]
    pub require_default: Option<RequireDefault>,

    /// Config file (defaults to ./dollop.json, ./dollop.yaml or the user config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Options given on the command line. Unset flags stay `None` so they
    /// don't override the config file.
    #[must_use]
    pub const fn options(&self) -> TransformOptions {
        TransformOptions {
            require_prefix: self.require_prefix,
            require_default: self.require_default,
        }
    }
}

fn parse_var(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{arg}`"))?;
    let name = name.trim().trim_start_matches('$');
    if name.is_empty() {
        return Err(format!("missing variable name in `{arg}`"));
    }
    Ok((name.to_string(), value.to_string()))
}
