//! Data models for catalog entities.
//!
//! - `Product`: one catalog record as served by the products endpoint
//! - `Rating`: optional aggregate rating attached to a product
//! - `CatalogSnapshot`: one fetched catalog, typed products plus the array as received

pub mod product;

pub use product::{duplicate_ids, CatalogSnapshot, Product, Rating};
