//! BuyAbans.com crawler. The catalog is a JSON API paginated per category;
//! the first response carries `last_page_url`, which fixes the walk length.

use crate::apis::extract::{clean_price_digits, collapse_whitespace, resolve_brand};
use crate::apis::politeness_delay;
use crate::common::constants::BUYABANS_API;
use crate::common::error::{Result, ScraperError};
use crate::common::progress::ProgressObserver;
use crate::common::types::{ProductApi, ProductRecord, ScrapeConfig};
use crate::infra::http_client::{HttpClientPort, RetryingHttp};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

const KNOWN_BRANDS: [&str; 19] = [
    "HP", "Lenovo", "Asus", "Acer", "Dell", "MSI", "Apple", "Samsung", "LG", "JVC", "Haier",
    "Toshiba", "Electrolux", "Whirlpool", "Oppo", "Xiaomi", "JBL", "Titan", "Miniso",
];

const FALLBACK_BRAND: &str = "Unknown Brand";

static PAGE_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"page=(\d+)").unwrap());

pub struct BuyAbansCrawler {
    http: Arc<dyn HttpClientPort>,
}

impl Default for BuyAbansCrawler {
    fn default() -> Self {
        Self::new()
    }
}

impl BuyAbansCrawler {
    pub fn new() -> Self {
        Self::with_http(Arc::new(RetryingHttp::new()))
    }

    pub fn with_http(http: Arc<dyn HttpClientPort>) -> Self {
        Self { http }
    }

    fn page_url(base_url: &str, category_id: &str, page: u32) -> String {
        format!(
            "{base_url}?category_id={category_id}&stamp_banner_id=0&sort=new_arrivals&is_search_list=false&page={page}"
        )
    }

    async fn scrape_category(
        &self,
        category_id: &str,
        config: &ScrapeConfig,
        progress: &dyn ProgressObserver,
        records: &mut Vec<ProductRecord>,
    ) -> Result<()> {
        let mut page: u32 = 1;
        let mut total_pages: u32 = 1;

        while page <= total_pages {
            let url = Self::page_url(&config.base_url, category_id, page);
            let resp = self.http.get(&url).await?;
            if !resp.is_success() {
                return Err(ScraperError::Site {
                    message: format!("status {} fetching page {page}", resp.status),
                });
            }

            let data: Value = serde_json::from_slice(&resp.bytes)?;
            if page == 1 {
                total_pages = total_pages_from_metadata(&data)
                    .unwrap_or(1)
                    .min(config.page_ceiling);
                debug!(category_id, total_pages, "category page count");
            }

            let products = data["products"]["data"].as_array().ok_or_else(|| {
                ScraperError::MissingField("products.data not found".into())
            })?;
            progress.page_fetched(BUYABANS_API, page, products.len());

            for product in products {
                match extract_record(product, category_id, config) {
                    Some(record) => records.push(record),
                    None => progress.record_skipped(BUYABANS_API, "unparsable or out-of-range price"),
                }
            }

            page += 1;
            if page <= total_pages {
                politeness_delay().await;
            }
        }

        Ok(())
    }
}

/// Read the terminal page count once from the first response's
/// `last_page_url`, instead of inferring it from per-page signals.
fn total_pages_from_metadata(data: &Value) -> Option<u32> {
    let last_page_url = data["products"]["last_page_url"].as_str()?;
    PAGE_PARAM
        .captures(last_page_url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn extract_record(product: &Value, category_id: &str, config: &ScrapeConfig) -> Option<ProductRecord> {
    let name = product["product_name"]
        .as_str()
        .or_else(|| product["name"].as_str())
        .unwrap_or("N/A");
    let name = collapse_whitespace(name);

    // Prefer the discounted price when the API reports one.
    let price_value = if product["final_price"].is_null() {
        &product["price"]
    } else {
        &product["final_price"]
    };
    let price_text = match price_value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    // Skip policy: BuyAbans records without a parseable price are dropped.
    let price = clean_price_digits(&price_text)? as f64;
    if !config.price_in_range(price) {
        return None;
    }

    let explicit_brand = product["brand_name"].as_str();
    let brand = resolve_brand(&name, explicit_brand, &KNOWN_BRANDS, FALLBACK_BRAND);

    Some(ProductRecord {
        category: category_id.to_string(),
        brand,
        model: name,
        price,
        currency: config.currency.clone(),
        product_url: None,
        image_url: None,
        country: config.country.clone(),
        year: config.year,
    })
}

#[async_trait::async_trait]
impl ProductApi for BuyAbansCrawler {
    fn api_name(&self) -> &'static str {
        BUYABANS_API
    }

    async fn scrape_products(
        &self,
        config: &ScrapeConfig,
        progress: &dyn ProgressObserver,
    ) -> Result<Vec<ProductRecord>> {
        let mut records = Vec::new();

        for category_id in &config.category_ids {
            progress.category_started(BUYABANS_API, category_id);
            if let Err(e) = self
                .scrape_category(category_id, config, progress, &mut records)
                .await
            {
                warn!(%category_id, error = %e, "category aborted");
                progress.page_failed(BUYABANS_API, 0, &e.to_string());
            }
        }

        info!("BuyAbans scrape finished with {} products", records.len());
        Ok(records)
    }
}
