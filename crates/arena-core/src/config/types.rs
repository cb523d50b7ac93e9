//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ArenaError;
use crate::history::DEFAULT_HISTORY_LIMIT;

pub const DEFAULT_TOKEN_ENV: &str = "ARENA_API_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArenaConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub compiler: CompilerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the REST API hosting `/compiler/*`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub auth_token_env: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            auth_token_env: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_catalog_ttl_secs")]
    pub catalog_ttl_secs: u64,
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_version")]
    pub default_version: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            catalog_ttl_secs: default_catalog_ttl_secs(),
            default_language: default_language(),
            default_version: default_version(),
        }
    }
}

impl CompilerConfig {
    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_catalog_ttl_secs() -> u64 {
    600
}

fn default_language() -> String {
    "python".to_string()
}

fn default_version() -> String {
    "3.10.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ArenaError::ConfigError("API base_url cannot be empty".to_string()));
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ArenaError::ConfigError(format!(
                "API base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ArenaError::ConfigError(
                "API timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.compiler.history_limit == 0 {
            return Err(ArenaError::ConfigError(
                "Compiler history_limit must be greater than 0".to_string(),
            ));
        }

        if self.compiler.default_language.trim().is_empty() {
            return Err(ArenaError::ConfigError(
                "Compiler default_language cannot be empty".to_string(),
            ));
        }

        if self.compiler.default_version.trim().is_empty() {
            return Err(ArenaError::ConfigError(
                "Compiler default_version cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
