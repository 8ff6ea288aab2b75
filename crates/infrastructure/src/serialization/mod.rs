//! Config and variables file formats.
//!
//! JSON and YAML are both accepted; the format is picked from the file
//! extension, with anything other than `.yaml`/`.yml` read as JSON.

mod json;
mod yaml;

use std::path::Path;

use serde::de::DeserializeOwned;

pub use json::from_json;
pub use yaml::from_yaml;

/// Error type for deserialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization failed.
    #[error("YAML deserialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.json` and unknown extensions.
    Json,
    /// `.yaml` and `.yml`.
    Yaml,
}

impl Format {
    /// Picks the format from a path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Deserializes file contents in the format implied by `path`.
///
/// # Errors
///
/// Returns an error if the contents are invalid or don't match the expected
/// type.
pub fn from_path_contents<T: DeserializeOwned>(
    path: &Path,
    contents: &str,
) -> Result<T, SerializationError> {
    match Format::from_path(path) {
        Format::Json => from_json(contents),
        Format::Yaml => from_yaml(contents),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("dollop.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("dollop.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("dollop.YML")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("vars")), Format::Json);
    }

    #[test]
    fn test_from_path_contents_dispatches_on_extension() {
        let from_yaml: HashMap<String, String> =
            from_path_contents(Path::new("vars.yml"), "color: red\n").unwrap();
        let from_json: HashMap<String, String> =
            from_path_contents(Path::new("vars.json"), r#"{"color": "red"}"#).unwrap();

        assert_eq!(from_yaml, from_json);
    }

    #[test]
    fn test_error_names_the_format() {
        let error = from_path_contents::<HashMap<String, String>>(Path::new("a.json"), "{")
            .unwrap_err();
        assert!(error.to_string().starts_with("JSON deserialization failed"));
    }
}
