//! Catalog scraper library.
//!
//! Each storefront gets its own crawler under [`apis`]; the shared pieces
//! (retry-aware HTTP port, extraction helpers, progress observer, Excel
//! export) live alongside them.

pub mod apis;
pub mod common;
pub mod export;
pub mod infra;
pub mod observability;
pub mod registry;

pub use common::error::{Result, ScraperError};
pub use common::types::{Category, PricePolicy, ProductApi, ProductRecord, ScrapeConfig};
