//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing and retrieving the
//! last successfully fetched product catalog. Data is cached in JSON format
//! under a single fixed key and considered stale after 60 minutes.

pub mod manager;

pub use manager::{CacheError, CacheManager, CachedData, PRODUCTS_KEY};
