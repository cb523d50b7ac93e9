//! Configuration module for the compiler feature
//!
//! Supports YAML configuration files with environment resolution for the
//! service credentials. Every section is optional and falls back to the
//! defaults the compiler front end has always used.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;


use crate::errors::ArenaError;
use std::path::Path;

/// Load a configuration from a YAML file
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<ArenaConfig, ArenaError> {
    ConfigLoader::from_file(path).await
}

/// Validate a configuration
pub fn validate_config(config: &ArenaConfig) -> Result<(), ArenaError> {
    config.validate()
}
