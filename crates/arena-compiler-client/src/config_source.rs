//! Configuration loading from a file path or an http(s) URL

use arena_core::{ArenaConfig, ArenaError, ConfigLoader};

/// Load configuration from a source (file path or URL). A missing local file
/// yields the defaults.
pub async fn load_config_from_source(source: &str) -> Result<ArenaConfig, ArenaError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        from_url(source).await
    } else {
        ConfigLoader::from_file_or_default(source).await
    }
}

async fn from_url(url: &str) -> Result<ArenaConfig, ArenaError> {
    let response = reqwest::Client::new().get(url).send().await.map_err(|e| {
        ArenaError::ConfigError(format!(
            "Failed to fetch configuration from URL {}: {}",
            url, e
        ))
    })?;

    if !response.status().is_success() {
        return Err(ArenaError::ConfigError(format!(
            "Failed to fetch configuration: HTTP {} from URL {}",
            response.status(),
            url
        )));
    }

    let content = response.text().await.map_err(|e| {
        ArenaError::ConfigError(format!(
            "Failed to read configuration response from URL {}: {}",
            url, e
        ))
    })?;

    ConfigLoader::from_str(&content)
}
