//! Transform options
//!
//! Mirrors the two policy switches a host passes to the resolver:
//! `requirePrefix` and `requireDefault`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the required variable prefix comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirePrefix {
    /// The document's file name without extension.
    File,
    /// The name of the folder containing the document.
    Folder,
}

impl RequirePrefix {
    /// Maps a mode string to a prefix policy. Anything other than `file` or
    /// `folder` means no prefix is enforced.
    #[must_use]
    pub fn from_mode(mode: &str) -> Option<Self> {
        mode.parse().ok()
    }

    /// The mode string for this policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

/// Which definition styles a document may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequireDefault {
    /// Hoisted variables must carry `!default`.
    Flag,
    /// Only inline defaults (`$name or value`) are allowed.
    Inline,
    /// Only hoisted definitions are allowed.
    Hoisted,
}

impl RequireDefault {
    /// Maps a mode string to a policy. Unknown strings mean no policy.
    #[must_use]
    pub fn from_mode(mode: &str) -> Option<Self> {
        mode.parse().ok()
    }

    /// The mode string for this policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Inline => "inline",
            Self::Hoisted => "hoisted",
        }
    }
}

/// Error returned when an option string is not recognized.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {option} mode: {value} (expected one of: {expected})")]
pub struct ParseOptionError {
    /// The option being parsed.
    pub option: &'static str,
    /// The rejected value.
    pub value: String,
    /// The accepted values.
    pub expected: &'static str,
}

impl FromStr for RequirePrefix {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            other => Err(ParseOptionError {
                option: "requirePrefix",
                value: other.to_string(),
                expected: "file, folder",
            }),
        }
    }
}

impl FromStr for RequireDefault {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flag" => Ok(Self::Flag),
            "inline" => Ok(Self::Inline),
            "hoisted" => Ok(Self::Hoisted),
            other => Err(ParseOptionError {
                option: "requireDefault",
                value: other.to_string(),
                expected: "flag, inline, hoisted",
            }),
        }
    }
}

impl fmt::Display for RequirePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RequireDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy configuration for one resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTransformOptions", rename_all = "camelCase")]
pub struct TransformOptions {
    /// Naming prefix policy. `None` enforces nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_prefix: Option<RequirePrefix>,
    /// Definition style policy. `None` allows both styles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_default: Option<RequireDefault>,
}

impl TransformOptions {
    /// Creates options with no policy enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            require_prefix: None,
            require_default: None,
        }
    }

    /// Sets the prefix policy.
    #[must_use]
    pub const fn with_require_prefix(mut self, mode: RequirePrefix) -> Self {
        self.require_prefix = Some(mode);
        self
    }

    /// Sets the definition style policy.
    #[must_use]
    pub const fn with_require_default(mut self, mode: RequireDefault) -> Self {
        self.require_default = Some(mode);
        self
    }

    /// Overlays `other` on top of `self`: settings present in `other` win.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            require_prefix: match other.require_prefix {
                Some(mode) => Some(mode),
                None => self.require_prefix,
            },
            require_default: match other.require_default {
                Some(mode) => Some(mode),
                None => self.require_default,
            },
        }
    }
}

/// Lenient on-disk form: unknown mode strings are dropped.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransformOptions {
    #[serde(default)]
    require_prefix: Option<String>,
    #[serde(default)]
    require_default: Option<String>,
}

impl From<RawTransformOptions> for TransformOptions {
    fn from(raw: RawTransformOptions) -> Self {
        Self {
            require_prefix: raw.require_prefix.as_deref().and_then(RequirePrefix::from_mode),
            require_default: raw
                .require_default
                .as_deref()
                .and_then(RequireDefault::from_mode),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_modes() {
        assert_eq!("file".parse::<RequirePrefix>(), Ok(RequirePrefix::File));
        assert_eq!("folder".parse::<RequirePrefix>(), Ok(RequirePrefix::Folder));
        assert_eq!("hoisted".parse::<RequireDefault>(), Ok(RequireDefault::Hoisted));
        assert!("dir".parse::<RequirePrefix>().is_err());
    }

    #[test]
    fn test_unknown_mode_is_none() {
        assert_eq!(RequirePrefix::from_mode("none"), None);
        assert_eq!(RequireDefault::from_mode(""), None);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let options: TransformOptions =
            serde_json::from_str(r#"{"requirePrefix": "file", "requireDefault": "flag"}"#)
                .expect("valid options");

        assert_eq!(options.require_prefix, Some(RequirePrefix::File));
        assert_eq!(options.require_default, Some(RequireDefault::Flag));
    }

    #[test]
    fn test_deserialize_unknown_mode_falls_through() {
        let options: TransformOptions =
            serde_json::from_str(r#"{"requirePrefix": "none"}"#).expect("valid options");

        assert_eq!(options, TransformOptions::new());
    }

    #[test]
    fn test_serialize_skips_unset() {
        let options = TransformOptions::new().with_require_default(RequireDefault::Inline);
        let json = serde_json::to_string(&options).expect("serializable");

        assert_eq!(json, r#"{"requireDefault":"inline"}"#);
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = TransformOptions::new()
            .with_require_prefix(RequirePrefix::File)
            .with_require_default(RequireDefault::Flag);
        let overlay = TransformOptions::new().with_require_default(RequireDefault::Hoisted);

        let merged = base.merge(overlay);
        assert_eq!(merged.require_prefix, Some(RequirePrefix::File));
        assert_eq!(merged.require_default, Some(RequireDefault::Hoisted));
    }
}
