//! Product list loading with offline fallback.
//!
//! `ProductLoader::load` tries the network first. A fresh catalog is shown
//! and written to the cache; any failure (transport, bad body, non-200)
//! produces a user notice and falls back to the last cached catalog, or to
//! an empty list when there is none. Every path yields a `LoadOutcome`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::api::{ApiError, CatalogSource};
use crate::cache::CacheManager;
use crate::models::{duplicate_ids, CatalogSnapshot};

/// Where the displayed products came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Network,
    Cache,
    Empty,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Network => write!(f, "network"),
            Provenance::Cache => write!(f, "cache"),
            Provenance::Empty => write!(f, "empty"),
        }
    }
}

/// User-visible notice raised when live data is unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Transport failure or unreadable body
    Offline,
    /// The server answered with something other than 200
    ServerError { status: u16 },
}

impl Notice {
    fn from_error(err: &ApiError) -> Self {
        match err {
            ApiError::ServerError { status, .. } => Notice::ServerError { status: *status },
            ApiError::RateLimited => Notice::ServerError { status: 429 },
            ApiError::NetworkError(_) | ApiError::InvalidResponse(_) => Notice::Offline,
        }
    }

    pub fn title(&self) -> &'static str {
        "Error"
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::Offline => {
                "There was a problem loading the products. Showing offline data if available."
            }
            Notice::ServerError { .. } => "Failed to fetch products from server. Try again later.",
        }
    }

    /// Short technical detail shown under the message, when there is one
    pub fn detail(&self) -> Option<String> {
        match self {
            Notice::Offline => None,
            Notice::ServerError { status } => Some(format!("HTTP {}", status)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub catalog: CatalogSnapshot,
    pub provenance: Provenance,
    pub notice: Option<Notice>,
    /// When the cached catalog was written, for cache-sourced outcomes
    pub cached_at: Option<DateTime<Utc>>,
}

/// Orchestrates the catalog source and the local cache.
/// Clone is cheap; both halves are shared.
#[derive(Clone)]
pub struct ProductLoader {
    source: Arc<dyn CatalogSource>,
    cache: Arc<CacheManager>,
}

impl ProductLoader {
    pub fn new(source: Arc<dyn CatalogSource>, cache: Arc<CacheManager>) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub async fn load(&self) -> LoadOutcome {
        match self.source.fetch_catalog().await {
            Ok(catalog) => {
                info!(count = catalog.len(), "Loaded products from network");
                let dups = duplicate_ids(catalog.products());
                if !dups.is_empty() {
                    warn!(ids = ?dups, "Catalog contains duplicate product ids");
                }
                self.persist(&catalog);
                LoadOutcome {
                    catalog,
                    provenance: Provenance::Network,
                    notice: None,
                    cached_at: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed, falling back to cache");
                let notice = Notice::from_error(&e);
                self.load_cached(notice)
            }
        }
    }

    /// Write failures never reach the caller; the fresh data is already in hand.
    fn persist(&self, catalog: &CatalogSnapshot) {
        if let Err(e) = self.cache.save_products(catalog) {
            warn!(error = %e, "Failed to cache products");
        }
    }

    fn load_cached(&self, notice: Notice) -> LoadOutcome {
        match self.cache.load_products() {
            Ok(Some(cached)) => {
                info!(
                    count = cached.data.len(),
                    age = %cached.age_display(),
                    stale = cached.is_stale(),
                    "Loaded products from cache"
                );
                LoadOutcome {
                    catalog: cached.data,
                    provenance: Provenance::Cache,
                    notice: Some(notice),
                    cached_at: Some(cached.cached_at),
                }
            }
            Ok(None) => {
                debug!("No cached products");
                Self::empty(notice)
            }
            Err(e) => {
                warn!(error = %e, "Failed to read cached products");
                Self::empty(notice)
            }
        }
    }

    fn empty(notice: Notice) -> LoadOutcome {
        LoadOutcome {
            catalog: CatalogSnapshot::default(),
            provenance: Provenance::Empty,
            notice: Some(notice),
            cached_at: None,
        }
    }
}
