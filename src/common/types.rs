use crate::common::error::Result;
use crate::common::progress::ProgressObserver;
use serde::{Deserialize, Serialize};

/// What to do when a listing's price text cannot be parsed.
///
/// The sites disagree on this: the JSON-backed catalogs drop the record
/// outright, while the WooCommerce-style ones default it to zero and let the
/// price-range filter discard it. The policy is explicit per-site config so
/// neither behavior is accidental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricePolicy {
    /// Drop the record when the price fails to parse.
    Skip,
    /// Default the price to zero; the range filter usually excludes it.
    Zero,
}

/// Immutable input to one scraper run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub output_filename: String,
    pub country: String,
    /// Currency label used in the exported price column, e.g. "LKR".
    pub currency: String,
    pub year: i32,
    pub min_price: f64,
    pub max_price: f64,
    /// Category ids for sites whose API takes them (BuyAbans).
    pub category_ids: Vec<String>,
    /// Category names for sites whose API takes them (AbansIT).
    pub categories: Vec<String>,
    pub unparsed_price: PricePolicy,
    /// Safety valve: no pagination loop walks past this page number.
    pub page_ceiling: u32,
}

impl ScrapeConfig {
    pub fn price_in_range(&self, price: f64) -> bool {
        self.min_price <= price && price <= self.max_price
    }
}

/// One extracted listing, uniform in shape within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub category: String,
    pub brand: String,
    pub model: String,
    pub price: f64,
    pub currency: String,
    pub product_url: Option<String>,
    pub image_url: Option<String>,
    pub country: String,
    pub year: i32,
}

/// A category discovered from a landing/menu page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub url: String,
}

/// The parsed outcome of one fetched catalog page.
///
/// `listing_count` is the number of listing nodes seen (before filtering),
/// which several sites use as their stop signal; `has_next` is the
/// site-specific pagination signal.
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    pub records: Vec<ProductRecord>,
    pub listing_count: usize,
    pub has_next: bool,
}

/// Core trait every site-specific scraper implements.
#[async_trait::async_trait]
pub trait ProductApi: Send + Sync {
    /// Unique key for this site's crawler.
    fn api_name(&self) -> &'static str;

    /// Walk the site's catalog and return every in-range product, in the
    /// order discovered (page order, then in-page listing order).
    async fn scrape_products(
        &self,
        config: &ScrapeConfig,
        progress: &dyn ProgressObserver,
    ) -> Result<Vec<ProductRecord>>;
}
