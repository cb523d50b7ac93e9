//! Configuration loader for YAML files and environment resolution

use crate::config::types::*;
use crate::errors::ArenaError;
use std::env;
use std::path::Path;
use tokio::fs;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<ArenaConfig, ArenaError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|e| {
            ArenaError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Load from `path` when it exists, otherwise start from defaults
    pub async fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<ArenaConfig, ArenaError> {
        let path = path.as_ref();
        if fs::try_exists(path).await.unwrap_or(false) {
            Self::from_file(path).await
        } else {
            log::info!(
                "No config file at {}, using defaults",
                path.display()
            );
            let mut config = ArenaConfig::default();
            Self::resolve_environment(&mut config);
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from a YAML string
    pub fn from_str(content: &str) -> Result<ArenaConfig, ArenaError> {
        // An empty document deserializes to unit, not to a defaulted struct.
        let mut config: ArenaConfig = if content.trim().is_empty() {
            ArenaConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| {
                ArenaError::ConfigError(format!("Failed to parse YAML config: {}", e))
            })?
        };

        Self::resolve_environment(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Pull the bearer token from the environment when configured to
    pub fn resolve_environment(config: &mut ArenaConfig) {
        let api = &mut config.api;

        if let Some(env_var) = &api.auth_token_env {
            if let Ok(token) = env::var(env_var) {
                api.auth_token = Some(token);
            }
        }

        if api.auth_token.is_none() && api.auth_token_env.is_none() {
            if let Ok(token) = env::var(DEFAULT_TOKEN_ENV) {
                api.auth_token = Some(token);
            }
        }

        if let Some(token) = &api.auth_token {
            if token.trim().is_empty() {
                api.auth_token = None;
            }
        }

        let trimmed = api.base_url.trim_end_matches('/').to_string();
        api.base_url = trimmed;
    }
}
