//! HTTP client module for the products catalog.
//!
//! This module provides the `ApiClient` for fetching the full product
//! catalog from the remote endpoint, and the `CatalogSource` trait the
//! loader depends on.

pub mod client;
pub mod error;

pub use client::{ApiClient, CatalogSource, DEFAULT_CATALOG_URL};
pub use error::ApiError;
