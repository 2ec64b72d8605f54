//! Core library for shopcache.
//!
//! - `api`: catalog HTTP client and error taxonomy
//! - `cache`: on-disk cache of the last fetched catalog
//! - `loader`: network-first loading with offline fallback
//! - `models`: product records
//! - `config`: optional user configuration
//! - `utils`: display formatting helpers

pub mod api;
pub mod cache;
pub mod config;
pub mod loader;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, CatalogSource};
pub use cache::{CacheError, CacheManager, CachedData};
pub use config::Config;
pub use loader::{LoadOutcome, Notice, ProductLoader, Provenance};
pub use models::{CatalogSnapshot, Product, Rating};
