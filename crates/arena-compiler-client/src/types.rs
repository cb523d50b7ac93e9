use arena_core::ArenaError;
use serde::{Deserialize, Serialize};

/// Response wrapper used by every `/compiler/*` endpoint except health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap `data` for endpoints other than execute
    pub fn into_data(self, endpoint: &str) -> Result<T, ArenaError> {
        if !self.success {
            return Err(ArenaError::ApiError(format!(
                "{} failed: {}",
                endpoint,
                self.message.unwrap_or_else(|| "no message".to_string())
            )));
        }
        self.data
            .ok_or_else(|| ArenaError::ApiError(format!("{} returned no data", endpoint)))
    }
}

/// Error body of a non-2xx response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "ok" | "healthy" | "up")
    }
}
