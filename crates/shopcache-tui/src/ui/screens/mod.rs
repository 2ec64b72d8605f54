//! One module per route.

pub mod product_detail;
pub mod products;
