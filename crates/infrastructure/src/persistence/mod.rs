//! File system and configuration adapters.

mod config_repository;
mod file_system;

pub use config_repository::{ConfigError, ConfigRepository, DollopConfig};
pub use file_system::TokioFileSystem;
