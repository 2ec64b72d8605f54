use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::CatalogSnapshot;

/// Storage key for the last fetched catalog
pub const PRODUCTS_KEY: &str = "stored_products";

/// Consider cache stale after 1 hour.
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O error for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Cache entry {key} is not valid: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_display(&self) -> String {
        age_display(self.cached_at)
    }

    pub fn is_stale(&self) -> bool {
        is_stale(self.cached_at)
    }
}

fn age_minutes(cached_at: DateTime<Utc>) -> i64 {
    (Utc::now() - cached_at).num_minutes()
}

/// True once an entry written at `cached_at` is older than an hour
pub fn is_stale(cached_at: DateTime<Utc>) -> bool {
    age_minutes(cached_at) > CACHE_STALE_MINUTES
}

/// Human readable age of a cache entry, e.g. "5m ago" or "2h ago"
pub fn age_display(cached_at: DateTime<Utc>) -> String {
    let minutes = age_minutes(cached_at);
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&cache_dir).map_err(|source| CacheError::Io {
            key: cache_dir.display().to_string(),
            source,
        })?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>, CacheError> {
        let path = self.cache_path(name);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Io {
                    key: name.to_string(),
                    source,
                })
            }
        };

        let cached: CachedData<T> =
            serde_json::from_str(&contents).map_err(|source| CacheError::Corrupt {
                key: name.to_string(),
                source,
            })?;

        Ok(Some(cached))
    }

    /// Write via a temp file and rename so readers never see a partial entry.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<(), CacheError> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let tmp = self.cache_dir.join(format!(".{}.json.tmp", name));

        let contents = serde_json::to_string_pretty(&cached).map_err(|source| CacheError::Corrupt {
            key: name.to_string(),
            source,
        })?;
        let io_err = |source| CacheError::Io {
            key: name.to_string(),
            source,
        };
        std::fs::write(&tmp, contents).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)?;
        debug!(cache = name, path = %path.display(), "Cache entry written");
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<bool, CacheError> {
        match std::fs::remove_file(self.cache_path(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CacheError::Io {
                key: name.to_string(),
                source,
            }),
        }
    }

    // ===== Products =====

    pub fn load_products(&self) -> Result<Option<CachedData<CatalogSnapshot>>, CacheError> {
        self.load(PRODUCTS_KEY)
    }

    /// Store the catalog as the server sent it, replacing any previous entry.
    pub fn save_products(&self, snapshot: &CatalogSnapshot) -> Result<(), CacheError> {
        self.save(PRODUCTS_KEY, snapshot)
    }

    /// Remove the cached catalog. Returns false if there was nothing to remove.
    pub fn clear_products(&self) -> Result<bool, CacheError> {
        self.remove(PRODUCTS_KEY)
    }
}

// ============================================================================
// Tests
// ============================================================================
