//! Laptop.lk crawler. A flat WooCommerce shop: `/page/N/` pagination with an
//! explicit `a.next` link on every page but the last.

use crate::apis::extract::{clean_price_digits, collapse_whitespace, resolve_brand};
use crate::apis::politeness_delay;
use crate::common::constants::LAPTOPLK_API;
use crate::common::error::Result;
use crate::common::progress::ProgressObserver;
use crate::common::types::{PageResult, ProductApi, ProductRecord, ScrapeConfig};
use crate::infra::http_client::{HttpClientPort, RetryingHttp};
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::info;

const KNOWN_BRANDS: [&str; 19] = [
    "HP", "Lenovo", "Asus", "Acer", "Dell", "MSI", "Apple", "Samsung", "LG", "JVC", "Haier",
    "Toshiba", "Electrolux", "Whirlpool", "Oppo", "Xiaomi", "JBL", "Titan", "Miniso",
];

const FALLBACK_BRAND: &str = "Other";

pub struct LaptopLkCrawler {
    http: Arc<dyn HttpClientPort>,
}

impl Default for LaptopLkCrawler {
    fn default() -> Self {
        Self::new()
    }
}

impl LaptopLkCrawler {
    pub fn new() -> Self {
        Self::with_http(Arc::new(RetryingHttp::new()))
    }

    pub fn with_http(http: Arc<dyn HttpClientPort>) -> Self {
        Self { http }
    }

    fn page_url(base_url: &str, page: u32) -> String {
        if page > 1 {
            format!("{base_url}page/{page}/")
        } else {
            base_url.to_string()
        }
    }
}

/// Parse one shop page into records plus the next-page signal.
pub fn parse_listing_page(
    html: &str,
    config: &ScrapeConfig,
    progress: &dyn ProgressObserver,
) -> PageResult {
    let document = Html::parse_document(html);
    let container_sel = Selector::parse("li.product").unwrap();
    let title_sel = Selector::parse("h2.woocommerce-loop-product__title").unwrap();
    let sale_price_sel = Selector::parse("ins").unwrap();
    let price_sel = Selector::parse("span.price").unwrap();
    let next_sel = Selector::parse("a.next").unwrap();

    let mut result = PageResult::default();

    for container in document.select(&container_sel) {
        result.listing_count += 1;

        let name = match container.select(&title_sel).next() {
            Some(el) => collapse_whitespace(&el.text().collect::<String>()),
            None => {
                progress.record_skipped(LAPTOPLK_API, "listing without a title element");
                continue;
            }
        };

        // Sale price (<ins>) wins over the standard price container.
        let price_text = container
            .select(&sale_price_sel)
            .next()
            .or_else(|| container.select(&price_sel).next())
            .map(|el| el.text().collect::<String>());
        let price = match price_text.as_deref().and_then(clean_price_digits) {
            Some(p) => p as f64,
            None => {
                // Skip policy: drop listings without a parseable price.
                progress.record_skipped(LAPTOPLK_API, "unparsable price");
                continue;
            }
        };
        if !config.price_in_range(price) {
            continue;
        }

        let brand = resolve_brand(&name, None, &KNOWN_BRANDS, FALLBACK_BRAND);
        result.records.push(ProductRecord {
            category: "All Products".to_string(),
            brand,
            model: name,
            price,
            currency: config.currency.clone(),
            product_url: None,
            image_url: None,
            country: config.country.clone(),
            year: config.year,
        });
    }

    result.has_next = document.select(&next_sel).next().is_some();
    result
}

#[async_trait::async_trait]
impl ProductApi for LaptopLkCrawler {
    fn api_name(&self) -> &'static str {
        LAPTOPLK_API
    }

    async fn scrape_products(
        &self,
        config: &ScrapeConfig,
        progress: &dyn ProgressObserver,
    ) -> Result<Vec<ProductRecord>> {
        let mut records = Vec::new();
        let mut page: u32 = 1;

        while page <= config.page_ceiling {
            let url = Self::page_url(&config.base_url, page);
            let resp = match self.http.get(&url).await {
                Ok(resp) => resp,
                Err(e) => {
                    progress.page_failed(LAPTOPLK_API, page, &e.to_string());
                    break;
                }
            };
            if resp.is_not_found() {
                // Walked past the last page.
                break;
            }
            if !resp.is_success() {
                progress.page_failed(LAPTOPLK_API, page, &format!("status {}", resp.status));
                break;
            }

            let parsed = parse_listing_page(&resp.text(), config, progress);
            progress.page_fetched(LAPTOPLK_API, page, parsed.listing_count);

            if parsed.listing_count == 0 {
                break;
            }
            records.extend(parsed.records);

            if !parsed.has_next {
                break;
            }
            page += 1;
            politeness_delay().await;
        }

        info!("Laptop.lk scrape finished with {} products", records.len());
        Ok(records)
    }
}
