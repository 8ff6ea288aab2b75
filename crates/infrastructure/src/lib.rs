//! Dollop Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer: a stylesheet host, a tokio file system
//! and config file loading.

pub mod persistence;
pub mod serialization;
pub mod stylesheet;

pub use persistence::{ConfigError, ConfigRepository, DollopConfig, TokioFileSystem};
pub use serialization::{Format, SerializationError, from_json, from_path_contents, from_yaml};
pub use stylesheet::{CssCodec, Node, Stylesheet, StylesheetError, parse, stringify};
