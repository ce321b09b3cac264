//! Singer.lk crawler. `?page=N` pagination with no dependable next-link, so
//! continuation is a named heuristic: an explicit link to the next page, or
//! a full page's worth of retained items.

use crate::apis::extract::{clean_price_digits, collapse_whitespace, resolve_brand};
use crate::apis::politeness_delay;
use crate::common::constants::SINGERSL_API;
use crate::common::error::Result;
use crate::common::progress::ProgressObserver;
use crate::common::types::{PageResult, ProductApi, ProductRecord, ScrapeConfig};
use crate::infra::http_client::{HttpClientPort, RetryingHttp};
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::info;

const KNOWN_BRANDS: [&str; 30] = [
    "HP", "Lenovo", "Asus", "Acer", "Dell", "MSI", "Apple", "Samsung", "LG", "JVC", "Haier",
    "Toshiba", "Electrolux", "Whirlpool", "Oppo", "Xiaomi", "JBL", "Titan", "Miniso", "Singer",
    "Sony", "Panasonic", "Hitachi", "Beko", "Huawei", "TCL", "Sharp", "Kenwood", "Sisil", "Unic",
];

const FALLBACK_BRAND: &str = "Other";

/// A page with at least this many retained items is assumed to have a
/// successor even without an explicit next link. Tunable; it can over-fetch
/// one trailing page or stop early when the last page is exactly full.
const FULL_PAGE_THRESHOLD: usize = 12;

pub struct SingerSlCrawler {
    http: Arc<dyn HttpClientPort>,
}

impl Default for SingerSlCrawler {
    fn default() -> Self {
        Self::new()
    }
}

impl SingerSlCrawler {
    pub fn new() -> Self {
        Self::with_http(Arc::new(RetryingHttp::new()))
    }

    pub fn with_http(http: Arc<dyn HttpClientPort>) -> Self {
        Self { http }
    }
}

/// Parse one filter page. `page` is the page being parsed; the next-page
/// signal looks for an anchor pointing at `page + 1`.
pub fn parse_listing_page(
    html: &str,
    page: u32,
    config: &ScrapeConfig,
    progress: &dyn ProgressObserver,
) -> PageResult {
    let document = Html::parse_document(html);
    let card_sel = Selector::parse("div.product").unwrap();
    let name_sel = Selector::parse("h5.product__name").unwrap();
    let price_sel = Selector::parse("span.price").unwrap();
    let anchor_sel = Selector::parse("a[href]").unwrap();

    let mut result = PageResult::default();

    for card in document.select(&card_sel) {
        result.listing_count += 1;

        let name = match card.select(&name_sel).next() {
            Some(el) => collapse_whitespace(&el.text().collect::<String>()),
            None => {
                progress.record_skipped(SINGERSL_API, "listing without a name element");
                continue;
            }
        };

        let price_text = card
            .select(&price_sel)
            .next()
            .map(|el| el.text().collect::<String>());
        let price = match price_text.as_deref().and_then(clean_price_digits) {
            Some(p) => p as f64,
            None => {
                progress.record_skipped(SINGERSL_API, "unparsable price");
                continue;
            }
        };
        if !config.price_in_range(price) {
            continue;
        }

        let brand = resolve_brand(&name, None, &KNOWN_BRANDS, FALLBACK_BRAND);
        result.records.push(ProductRecord {
            category: "General".to_string(),
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

    let next_param = format!("page={}", page + 1);
    let explicit_next = document
        .select(&anchor_sel)
        .any(|a| a.value().attr("href").is_some_and(|href| href.contains(&next_param)));
    result.has_next = explicit_next || result.records.len() >= FULL_PAGE_THRESHOLD;
    result
}

#[async_trait::async_trait]
impl ProductApi for SingerSlCrawler {
    fn api_name(&self) -> &'static str {
        SINGERSL_API
    }

    async fn scrape_products(
        &self,
        config: &ScrapeConfig,
        progress: &dyn ProgressObserver,
    ) -> Result<Vec<ProductRecord>> {
        let mut records = Vec::new();
        let mut page: u32 = 1;

        while page <= config.page_ceiling {
            let url = format!("{}?page={page}", config.base_url);
            let resp = match self.http.get(&url).await {
                Ok(resp) => resp,
                Err(e) => {
                    progress.page_failed(SINGERSL_API, page, &e.to_string());
                    break;
                }
            };
            if resp.is_not_found() {
                break;
            }
            if !resp.is_success() {
                progress.page_failed(SINGERSL_API, page, &format!("status {}", resp.status));
                break;
            }

            let parsed = parse_listing_page(&resp.text(), page, config, progress);
            progress.page_fetched(SINGERSL_API, page, parsed.listing_count);

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

        info!("Singer SL scrape finished with {} products", records.len());
        Ok(records)
    }
}
