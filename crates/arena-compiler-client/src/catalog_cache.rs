//! Runtime catalog fetching with a staleness window.
//!
//! A catalog is refetched only when a caller asks for it after the window has
//! expired; there is no background refresh. A failed or empty fetch yields the
//! static fallback list, which is then cached like a live result.

use arena_core::RuntimeCatalog;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::CompilerService;

pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(600);

/// Fetch the catalog once, degrading to the fallback list on any failure
pub async fn fetch_catalog(service: &dyn CompilerService) -> RuntimeCatalog {
    match service.runtimes().await {
        Ok(runtimes) if !runtimes.is_empty() => {
            log::debug!("Fetched {} runtimes", runtimes.len());
            RuntimeCatalog::Fetched(runtimes)
        }
        Ok(_) => {
            log::warn!("Runtime catalog came back empty, using fallback list");
            RuntimeCatalog::fallback()
        }
        Err(e) => {
            log::warn!("Failed to fetch runtime catalog, using fallback list: {}", e);
            RuntimeCatalog::fallback()
        }
    }
}

struct CachedCatalog {
    fetched_at: Instant,
    catalog: RuntimeCatalog,
}

pub struct CatalogCache {
    ttl: Duration,
    cached: Mutex<Option<CachedCatalog>>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_TTL)
    }
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            cached: Mutex::new(None),
        }
    }

    /// Cached catalog if still fresh, otherwise a new fetch
    pub async fn get(&self, service: &dyn CompilerService) -> RuntimeCatalog {
        // Held across the fetch so concurrent callers share one request.
        let mut cached = self.cached.lock().await;

        if let Some(entry) = cached.as_ref() {
            if entry.fetched_at.elapsed() < self.ttl {
                return entry.catalog.clone();
            }
        }

        let catalog = fetch_catalog(service).await;
        *cached = Some(CachedCatalog {
            fetched_at: Instant::now(),
            catalog: catalog.clone(),
        });
        catalog
    }

    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
