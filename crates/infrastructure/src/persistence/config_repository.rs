//! Configuration and variables file loading.
//!
//! The config file is looked up in this order:
//! - an explicit path (`--config`)
//! - `dollop.json`, `dollop.yaml` or `dollop.yml` in the working directory
//! - the platform config directory:
//!   - Linux: ~/.config/dollop/config.json
//!   - macOS: ~/Library/Application Support/dollop/config.json
//!   - Windows: %APPDATA%/dollop/config.json

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dollop_application::ports::{FileSystem, FileSystemError};
use dollop_domain::{TransformOptions, VariableMap};
use serde::{Deserialize, Deserializer};

use super::TokioFileSystem;
use crate::serialization::{SerializationError, from_path_contents};

const WORKING_DIR_CANDIDATES: [&str; 3] = ["dollop.json", "dollop.yaml", "dollop.yml"];

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read {path}: {error}")]
    Read {
        /// The file path.
        path: PathBuf,
        /// The underlying error.
        error: FileSystemError,
    },

    /// The file contents are not a valid config or variables map.
    #[error("Invalid {path}: {error}")]
    Invalid {
        /// The file path.
        path: PathBuf,
        /// The underlying error.
        error: SerializationError,
    },
}

/// Settings read from a config file.
///
/// ```json
/// {
///   "variables": { "color": "red", "gap": 4 },
///   "requirePrefix": "file",
///   "requireDefault": "flag"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DollopConfig {
    /// Caller-supplied variables.
    #[serde(default, deserialize_with = "scalar_map")]
    pub variables: VariableMap,

    /// Policy options.
    #[serde(flatten)]
    pub options: TransformOptions,
}

/// Accepts string, number and boolean values and stores them as text. `null`
/// entries are skipped.
fn scalar_map<'de, D>(deserializer: D) -> Result<VariableMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, serde_json::Value>::deserialize(deserializer)?;
    let mut variables = VariableMap::with_capacity(raw.len());

    for (name, value) in raw {
        let text = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::String(text) => text,
            serde_json::Value::Number(number) => number.to_string(),
            serde_json::Value::Bool(flag) => flag.to_string(),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                return Err(serde::de::Error::custom(format!(
                    "variable `{name}` must be a string, number or boolean"
                )));
            }
        };
        variables.insert(name, text);
    }

    Ok(variables)
}

/// A flat `name: value` variables file.
struct VariablesFile(VariableMap);

impl<'de> Deserialize<'de> for VariablesFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        scalar_map(deserializer).map(Self)
    }
}

/// Finds and reads config and variables files.
#[derive(Debug, Clone)]
pub struct ConfigRepository<F = TokioFileSystem> {
    file_system: F,
    working_dir: PathBuf,
    user_config_dir: Option<PathBuf>,
}

impl ConfigRepository<TokioFileSystem> {
    /// Creates a repository rooted at `working_dir` that reads from disk.
    #[must_use]
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self::with_file_system(TokioFileSystem::new(), working_dir)
    }
}

impl<F: FileSystem> ConfigRepository<F> {
    /// Creates a repository over the given file system.
    #[must_use]
    pub fn with_file_system(file_system: F, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            file_system,
            working_dir: working_dir.into(),
            user_config_dir: dirs::config_dir().map(|p| p.join("dollop")),
        }
    }

    /// Overrides the user config directory. `None` disables it.
    #[must_use]
    pub fn with_user_config_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.user_config_dir = dir;
        self
    }

    /// Returns the implicit config file locations, in lookup order.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        WORKING_DIR_CANDIDATES
            .iter()
            .map(|name| self.working_dir.join(name))
            .chain(
                self.user_config_dir
                    .iter()
                    .map(|dir| dir.join("config.json")),
            )
            .collect()
    }

    /// Returns the config file that [`Self::load`] would read, if any.
    pub async fn locate(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        for candidate in self.candidates() {
            if self.file_system.exists(&candidate).await {
                return Some(candidate);
            }
        }
        None
    }

    /// Loads the config.
    ///
    /// Returns defaults when no explicit path is given and no implicit config
    /// file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or parsed. A missing
    /// explicit path is an error.
    pub async fn load(&self, explicit: Option<&Path>) -> Result<DollopConfig, ConfigError> {
        let Some(path) = self.locate(explicit).await else {
            tracing::debug!("no config file found, using defaults");
            return Ok(DollopConfig::default());
        };

        let config: DollopConfig = self.read(&path).await?;
        tracing::debug!(
            path = %path.display(),
            variables = config.variables.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Loads a flat `name: value` variables file (JSON or YAML).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a flat map of
    /// scalar values.
    pub async fn load_variables(&self, path: &Path) -> Result<VariableMap, ConfigError> {
        let VariablesFile(variables) = self.read(path).await?;
        Ok(variables)
    }

    async fn read<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<T, ConfigError> {
        let contents = self
            .file_system
            .read_file_string(path)
            .await
            .map_err(|error| ConfigError::Read {
                path: path.to_path_buf(),
                error,
            })?;

        from_path_contents(path, &contents).map_err(|error| ConfigError::Invalid {
            path: path.to_path_buf(),
            error,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use dollop_domain::{RequireDefault, RequirePrefix};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn repository(dir: &TempDir) -> ConfigRepository {
        ConfigRepository::new(dir.path()).with_user_config_dir(None)
    }

    #[tokio::test]
    async fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = repository(&dir).load(None).await.unwrap();
        assert_eq!(config, DollopConfig::default());
    }

    #[tokio::test]
    async fn test_loads_json_from_working_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("dollop.json"),
            r#"{"variables": {"color": "red", "gap": 4, "unset": null}, "requirePrefix": "file"}"#,
        )
        .unwrap();

        let config = repository(&dir).load(None).await.unwrap();

        assert_eq!(config.variables.get("color").map(String::as_str), Some("red"));
        assert_eq!(config.variables.get("gap").map(String::as_str), Some("4"));
        assert!(!config.variables.contains_key("unset"));
        assert_eq!(config.options.require_prefix, Some(RequirePrefix::File));
        assert_eq!(config.options.require_default, None);
    }

    #[tokio::test]
    async fn test_loads_yaml_from_working_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("dollop.yml"),
            "variables:\n  color: blue\nrequireDefault: inline\n",
        )
        .unwrap();

        let config = repository(&dir).load(None).await.unwrap();

        assert_eq!(config.variables.get("color").map(String::as_str), Some("blue"));
        assert_eq!(config.options.require_default, Some(RequireDefault::Inline));
    }

    #[tokio::test]
    async fn test_json_wins_over_yaml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("dollop.json"), "{}").unwrap();
        std::fs::write(dir.path().join("dollop.yaml"), "requirePrefix: folder\n").unwrap();

        let repository = repository(&dir);

        assert_eq!(
            repository.locate(None).await,
            Some(dir.path().join("dollop.json"))
        );
        assert_eq!(repository.load(None).await.unwrap().options.require_prefix, None);
    }

    #[tokio::test]
    async fn test_user_config_dir_is_last() {
        let dir = TempDir::new().unwrap();
        let user_dir = dir.path().join("user");
        std::fs::create_dir_all(&user_dir).unwrap();
        std::fs::write(user_dir.join("config.json"), r#"{"requireDefault": "flag"}"#).unwrap();

        let repository = ConfigRepository::new(dir.path()).with_user_config_dir(Some(user_dir));
        let config = repository.load(None).await.unwrap();

        assert_eq!(config.options.require_default, Some(RequireDefault::Flag));
    }

    #[tokio::test]
    async fn test_unknown_modes_are_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("dollop.json"),
            r#"{"requirePrefix": "module", "requireDefault": "always"}"#,
        )
        .unwrap();

        let config = repository(&dir).load(None).await.unwrap();
        assert_eq!(config.options, TransformOptions::default());
    }

    #[tokio::test]
    async fn test_missing_explicit_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.json");

        let error = repository(&dir).load(Some(&path)).await.unwrap_err();

        assert!(matches!(
            error,
            ConfigError::Read {
                error: FileSystemError::NotFound(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_load_variables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vars.yaml");
        std::fs::write(&path, "color: red\nwide: true\n").unwrap();

        let variables = repository(&dir).load_variables(&path).await.unwrap();

        assert_eq!(
            variables,
            VariableMap::from([
                ("color".to_string(), "red".to_string()),
                ("wide".to_string(), "true".to_string()),
            ])
        );
    }

    #[tokio::test]
    async fn test_nested_variable_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vars.json");
        std::fs::write(&path, r#"{"color": {"r": 255}}"#).unwrap();

        let error = repository(&dir).load_variables(&path).await.unwrap_err();

        assert!(matches!(error, ConfigError::Invalid { .. }));
        assert!(error.to_string().contains("variable `color`"));
    }
}
