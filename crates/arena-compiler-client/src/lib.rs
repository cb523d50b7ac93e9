//! Client SDK for the AlgoArena code execution service
//!
//! The execution service is an external collaborator reached over REST. This
//! crate builds and dispatches requests to it, folds every transport-level
//! failure into one of the classified [`ExecutionError`] categories, keeps the
//! runtime catalog fresh with a static fallback, and wires a dispatcher to the
//! compiler state container in [`CompilerSession`].

use arena_core::{ApiConfig, ArenaError, ExecutionError, ExecutionRequest, ExecutionResponse, Runtime};
use async_trait::async_trait;

pub mod catalog_cache;
pub mod classify;
pub mod config_source;
pub mod http_client;
pub mod session;
pub mod types;

pub use catalog_cache::{fetch_catalog, CatalogCache};
pub use config_source::load_config_from_source;
pub use http_client::HttpCompilerClient;
pub use session::{CompilerSession, ExecutionReport};
pub use types::*;

/// Operations offered by the execution service
#[async_trait]
pub trait CompilerService: Send + Sync {
    /// Dispatch one execution request. Never retried.
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResponse, ExecutionError>;

    /// Fetch the (language, version) pairs the service accepts
    async fn runtimes(&self) -> Result<Vec<Runtime>, ArenaError>;

    /// Fetch the bare list of supported language names
    async fn languages(&self) -> Result<Vec<String>, ArenaError>;

    /// Check if the service is reachable and healthy
    async fn health_check(&self) -> Result<HealthStatus, ArenaError>;
}

/// Factory for creating CompilerService instances
pub struct CompilerClientFactory;

impl CompilerClientFactory {
    /// Create an HTTP client for the configured API
    pub fn create_http_client(config: &ApiConfig) -> Result<Box<dyn CompilerService>, ArenaError> {
        Ok(Box::new(HttpCompilerClient::from_config(config)?))
    }
}
