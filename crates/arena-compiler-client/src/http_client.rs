use arena_core::{
    ApiConfig, ArenaError, ExecutionError, ExecutionRequest, ExecutionResponse, Runtime,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::classify::{classify_status, classify_transport_error};
use crate::types::{ApiEnvelope, HealthStatus};
use crate::CompilerService;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the remote execution service
pub struct HttpCompilerClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
    auth_token: Option<String>,
}

impl HttpCompilerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
            auth_token: None,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ArenaError> {
        if config.base_url.trim().is_empty() {
            return Err(ArenaError::ConfigError("API base_url cannot be empty".to_string()));
        }
        let mut client = Self::new(config.base_url.clone()).with_timeout(config.timeout());
        if let Some(token) = &config.auth_token {
            client = client.with_auth_token(token.clone());
        }
        Ok(client)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.timeout(self.timeout);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_enveloped<T: DeserializeOwned>(&self, path: &str) -> Result<T, ArenaError> {
        let endpoint = format!("GET {}", path);
        let response = self
            .authorized(self.client.get(self.url(path)))
            .send()
            .await
            .map_err(|e| ArenaError::HttpError(format!("{}: {}", endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArenaError::ApiError(format!("{} failed: {}", endpoint, status)));
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ArenaError::ParsingError(format!("{}: {}", endpoint, e)))?;
        envelope.into_data(&endpoint)
    }
}

#[async_trait]
impl CompilerService for HttpCompilerClient {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResponse, ExecutionError> {
        log::debug!(
            "Dispatching {} {} ({} bytes of source)",
            request.language,
            request.version,
            request.code.len()
        );

        let response = self
            .authorized(self.client.post(self.url("/compiler/execute")))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let err = classify_transport_error(&e);
                log::warn!("Execute request failed ({}): {}", err.kind(), e);
                err
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let err = classify_transport_error(&e);
            log::warn!("Reading execute response failed ({}): {}", err.kind(), e);
            err
        })?;

        if !status.is_success() {
            let err = classify_status(status.as_u16(), &body);
            log::warn!("Execute returned {} ({})", status, err.kind());
            return Err(err);
        }

        let envelope: ApiEnvelope<ExecutionResponse> = serde_json::from_str(&body).map_err(|e| {
            log::warn!("Malformed execute response: {}", e);
            ExecutionError::unknown(format!("malformed execute response: {}", e))
        })?;

        match envelope {
            ApiEnvelope {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            ApiEnvelope {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Err(ExecutionError::ServerReported(message)),
            _ => Err(ExecutionError::unknown(
                "execute response carried no result",
            )),
        }
    }

    async fn runtimes(&self) -> Result<Vec<Runtime>, ArenaError> {
        self.get_enveloped("/compiler/runtimes").await
    }

    async fn languages(&self) -> Result<Vec<String>, ArenaError> {
        self.get_enveloped("/compiler/languages").await
    }

    async fn health_check(&self) -> Result<HealthStatus, ArenaError> {
        let response = self
            .authorized(self.client.get(self.url("/compiler/health")))
            .send()
            .await
            .map_err(|e| ArenaError::HttpError(format!("Health check failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ArenaError::ApiError(format!(
                "Health check failed: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ArenaError::ParsingError(format!("Health check response: {}", e)))
    }
}
