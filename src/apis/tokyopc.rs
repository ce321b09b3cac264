//! TokyoPC.jp crawler. Categories come from the storefront menu; category
//! pages use `?page=N`. Pages that render a pagination block carry an
//! explicit next link; pages that don't are bounded by the page ceiling.

use crate::apis::extract::{
    apply_price_policy, clean_price_digits, collapse_whitespace, resolve_brand,
};
use crate::apis::politeness_delay;
use crate::common::constants::TOKYOPC_API;
use crate::common::error::Result;
use crate::common::progress::ProgressObserver;
use crate::common::types::{Category, PageResult, ProductApi, ProductRecord, ScrapeConfig};
use crate::infra::http_client::{HttpClientPort, RetryingHttp};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info};

const KNOWN_BRANDS: [&str; 19] = [
    "Apple", "Samsung", "Sony", "Microsoft", "Dell", "HP", "Lenovo", "Asus", "Acer", "MSI",
    "Huawei", "Oppo", "Xiaomi", "Google", "Motorola", "Sharp", "Toshiba", "Fujitsu", "Panasonic",
];

const FALLBACK_BRAND: &str = "Other";

pub struct TokyoPcCrawler {
    http: Arc<dyn HttpClientPort>,
}

impl Default for TokyoPcCrawler {
    fn default() -> Self {
        Self::new()
    }
}

impl TokyoPcCrawler {
    pub fn new() -> Self {
        Self::with_http(Arc::new(RetryingHttp::new()))
    }

    pub fn with_http(http: Arc<dyn HttpClientPort>) -> Self {
        Self { http }
    }

    fn page_url(category_url: &str, page: u32) -> String {
        if category_url.contains('?') {
            format!("{category_url}&page={page}")
        } else {
            format!("{category_url}?page={page}")
        }
    }

    async fn discover_categories(&self, base_url: &str) -> Result<Vec<Category>> {
        let resp = self.http.get(base_url).await?;
        let html = resp.text();
        Ok(parse_categories(&html))
    }

    async fn scrape_category(
        &self,
        category: &Category,
        config: &ScrapeConfig,
        progress: &dyn ProgressObserver,
        records: &mut Vec<ProductRecord>,
    ) {
        let mut page: u32 = 1;

        while page <= config.page_ceiling {
            let url = Self::page_url(&category.url, page);
            let resp = match self.http.get(&url).await {
                Ok(resp) => resp,
                Err(e) => {
                    progress.page_failed(TOKYOPC_API, page, &e.to_string());
                    break;
                }
            };
            if resp.is_not_found() {
                break;
            }
            if !resp.is_success() {
                progress.page_failed(TOKYOPC_API, page, &format!("status {}", resp.status));
                break;
            }

            let parsed = parse_listing_page(&resp.text(), &category.name, config, progress);
            progress.page_fetched(TOKYOPC_API, page, parsed.listing_count);

            if parsed.listing_count == 0 {
                break;
            }
            let has_next = parsed.has_next;
            records.extend(parsed.records);

            if !has_next {
                break;
            }
            page += 1;
            politeness_delay().await;
        }
    }
}

/// Extract deduplicated (name, URL) pairs from the storefront menu.
pub fn parse_categories(html: &str) -> Vec<Category> {
    let document = Html::parse_document(html);
    let link_sel = Selector::parse("a.ty-menu__submenu-link").unwrap();

    let mut seen = HashSet::new();
    let mut categories = Vec::new();

    for link in document.select(&link_sel) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.starts_with("http") || !seen.insert(href.to_string()) {
            continue;
        }
        let name = collapse_whitespace(&link.text().collect::<String>());
        categories.push(Category {
            name,
            url: href.to_string(),
        });
    }

    categories
}

pub fn parse_listing_page(
    html: &str,
    category_name: &str,
    config: &ScrapeConfig,
    progress: &dyn ProgressObserver,
) -> PageResult {
    let document = Html::parse_document(html);
    let item_sel = Selector::parse("div.ut2-gl__content").unwrap();
    let title_sel = Selector::parse("a.product-title").unwrap();
    let price_sel = Selector::parse("span.ty-price").unwrap();
    let pagination_sel = Selector::parse("div.ty-pagination").unwrap();
    let next_sel = Selector::parse("a[class*=\"next\"]").unwrap();

    let mut result = PageResult::default();

    for item in document.select(&item_sel) {
        result.listing_count += 1;

        let Some(title_el) = item.select(&title_sel).next() else {
            progress.record_skipped(TOKYOPC_API, "listing without a title anchor");
            continue;
        };
        let name = collapse_whitespace(&title_el.text().collect::<String>());
        let product_url = title_el.value().attr("href").map(str::to_string);

        let price_text = item
            .select(&price_sel)
            .next()
            .map(|el| el.text().collect::<String>());
        let parsed_price = price_text
            .as_deref()
            .and_then(clean_price_digits)
            .map(|p| p as f64);
        let Some(price) = apply_price_policy(parsed_price, config.unparsed_price) else {
            progress.record_skipped(TOKYOPC_API, "unparsable price");
            continue;
        };
        if !config.price_in_range(price) {
            continue;
        }

        let brand = resolve_brand(&name, None, &KNOWN_BRANDS, FALLBACK_BRAND);
        result.records.push(ProductRecord {
            category: category_name.to_string(),
            brand,
            model: name,
            price,
            currency: config.currency.clone(),
            product_url,
            image_url: None,
            country: config.country.clone(),
            year: config.year,
        });
    }

    // A rendered pagination block is authoritative; without one the page
    // ceiling in the calling loop is the only stop signal.
    result.has_next = match document.select(&pagination_sel).next() {
        Some(pagination) => pagination.select(&next_sel).next().is_some(),
        None => true,
    };
    result
}

#[async_trait::async_trait]
impl ProductApi for TokyoPcCrawler {
    fn api_name(&self) -> &'static str {
        TOKYOPC_API
    }

    async fn scrape_products(
        &self,
        config: &ScrapeConfig,
        progress: &dyn ProgressObserver,
    ) -> Result<Vec<ProductRecord>> {
        let categories = match self.discover_categories(&config.base_url).await {
            Ok(categories) => categories,
            Err(e) => {
                error!(error = %e, "failed to fetch TokyoPC categories");
                return Err(e);
            }
        };
        if categories.is_empty() {
            info!("no TokyoPC categories found, nothing to scrape");
            return Ok(Vec::new());
        }
        info!("found {} TokyoPC categories", categories.len());

        let mut records = Vec::new();
        for category in &categories {
            progress.category_started(TOKYOPC_API, &category.name);
            self.scrape_category(category, config, progress, &mut records)
                .await;
        }

        info!("TokyoPC scrape finished with {} products", records.len());
        Ok(records)
    }
}
