//! AbansIT.lk crawler. The shop exposes an AJAX pagination endpoint that
//! returns JSON wrapping an HTML fragment (`product_table`); an empty
//! fragment marks the end of the catalog.

use crate::apis::extract::{
    apply_price_policy, clean_price_decimal, collapse_whitespace, resolve_brand,
};
use crate::apis::politeness_delay;
use crate::common::constants::ABANSIT_API;
use crate::common::error::{Result, ScraperError};
use crate::common::progress::ProgressObserver;
use crate::common::types::{PageResult, ProductApi, ProductRecord, ScrapeConfig};
use crate::infra::http_client::{HttpClientPort, RetryingHttp};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

const KNOWN_BRANDS: [&str; 55] = [
    "HP", "Lenovo", "Asus", "Acer", "Dell", "MSI", "Apple", "Samsung", "LG", "JVC", "Haier",
    "Toshiba", "Electrolux", "Whirlpool", "Oppo", "Xiaomi", "JBL", "Titan", "Miniso", "Logitech",
    "Fantech", "Razer", "Corsair", "HyperX", "SteelSeries", "Gigabyte", "Zotac", "Palit", "Galax",
    "PNY", "Intel", "AMD", "Kingston", "Transcend", "Adata", "Western Digital", "Seagate",
    "Hikvision", "Dahua", "Ezviz", "Imou", "Tp-Link", "D-Link", "Ubiquiti", "Mikrotik", "Cisco",
    "Epson", "Canon", "Brother", "Pantum", "Ricoh", "Kyocera", "Konica Minolta", "Sharp", "Huawei",
];

const FALLBACK_BRAND: &str = "Other";

pub struct AbansItCrawler {
    http: Arc<dyn HttpClientPort>,
}

impl Default for AbansItCrawler {
    fn default() -> Self {
        Self::new()
    }
}

impl AbansItCrawler {
    pub fn new() -> Self {
        Self::with_http(Arc::new(RetryingHttp::new()))
    }

    pub fn with_http(http: Arc<dyn HttpClientPort>) -> Self {
        Self { http }
    }

    fn page_url(config: &ScrapeConfig, page: u32) -> Result<String> {
        let categories = serde_json::to_string(&config.categories)?;
        let params = [
            ("brands", "[]".to_string()),
            ("min_price", config.min_price.to_string()),
            ("max_price", config.max_price.to_string()),
            ("page_name", "all_products".to_string()),
            ("categories", categories),
            ("ram", "[]".to_string()),
            ("storage", "[]".to_string()),
            ("processor", "[]".to_string()),
        ];
        let url = reqwest::Url::parse_with_params(&format!("{}{page}", config.base_url), &params)
            .map_err(|e| ScraperError::Site {
                message: format!("invalid pagination URL: {e}"),
            })?;
        Ok(url.to_string())
    }
}

/// Parse the HTML fragment embedded in one AJAX response.
pub fn parse_product_fragment(
    fragment: &str,
    config: &ScrapeConfig,
    progress: &dyn ProgressObserver,
) -> PageResult {
    let document = Html::parse_fragment(fragment);
    let card_sel = Selector::parse(".product-shortcode.style-1").unwrap();
    let title_sel = Selector::parse(".title").unwrap();
    let title_anchor_sel = Selector::parse("a").unwrap();
    let link_sel = Selector::parse("a.preview, a.image").unwrap();
    let price_sel = Selector::parse(".price").unwrap();
    let new_price_sel = Selector::parse(".new-price").unwrap();
    let image_sel = Selector::parse("img").unwrap();

    let mut result = PageResult::default();

    for card in document.select(&card_sel) {
        result.listing_count += 1;

        let Some(title_el) = card.select(&title_sel).next() else {
            progress.record_skipped(ABANSIT_API, "listing without a title element");
            continue;
        };
        let name = title_text(&title_el, &title_anchor_sel);
        let product_url = if title_el.value().name() == "a" {
            title_el.value().attr("href").map(str::to_string)
        } else {
            card.select(&link_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string)
        };

        // Discounted price wins when both are present.
        let price_text = card
            .select(&new_price_sel)
            .next()
            .or_else(|| card.select(&price_sel).next())
            .map(|el| el.text().collect::<String>());
        let parsed_price = price_text.as_deref().and_then(clean_price_decimal);
        let Some(price) = apply_price_policy(parsed_price, config.unparsed_price) else {
            progress.record_skipped(ABANSIT_API, "unparsable price");
            continue;
        };
        if !config.price_in_range(price) {
            continue;
        }

        let image_url = card
            .select(&image_sel)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string);

        let brand = resolve_brand(&name, None, &KNOWN_BRANDS, FALLBACK_BRAND);
        result.records.push(ProductRecord {
            category: "All Products".to_string(),
            brand,
            model: name,
            price,
            currency: config.currency.clone(),
            product_url,
            image_url,
            country: config.country.clone(),
            year: config.year,
        });
    }

    // The endpoint has no next-page marker; a non-empty page may be followed
    // by another.
    result.has_next = result.listing_count > 0;
    result
}

/// The title node is sometimes the anchor itself and sometimes wraps one.
fn title_text(title_el: &ElementRef, anchor_sel: &Selector) -> String {
    if title_el.value().name() != "a" {
        if let Some(anchor) = title_el.select(anchor_sel).next() {
            return collapse_whitespace(&anchor.text().collect::<String>());
        }
    }
    collapse_whitespace(&title_el.text().collect::<String>())
}

#[async_trait::async_trait]
impl ProductApi for AbansItCrawler {
    fn api_name(&self) -> &'static str {
        ABANSIT_API
    }

    async fn scrape_products(
        &self,
        config: &ScrapeConfig,
        progress: &dyn ProgressObserver,
    ) -> Result<Vec<ProductRecord>> {
        let mut records = Vec::new();
        let mut page: u32 = 1;

        while page <= config.page_ceiling {
            let url = Self::page_url(config, page)?;
            let resp = match self.http.get(&url).await {
                Ok(resp) => resp,
                Err(e) => {
                    progress.page_failed(ABANSIT_API, page, &e.to_string());
                    break;
                }
            };
            if !resp.is_success() {
                progress.page_failed(ABANSIT_API, page, &format!("status {}", resp.status));
                break;
            }

            let data: Value = match serde_json::from_slice(&resp.bytes) {
                Ok(data) => data,
                Err(e) => {
                    progress.page_failed(ABANSIT_API, page, &format!("undecodable body: {e}"));
                    break;
                }
            };
            let fragment = data["product_table"].as_str().unwrap_or("");
            if fragment.trim().is_empty() {
                break;
            }

            let parsed = parse_product_fragment(fragment, config, progress);
            progress.page_fetched(ABANSIT_API, page, parsed.listing_count);

            if parsed.listing_count == 0 {
                break;
            }
            records.extend(parsed.records);

            page += 1;
            politeness_delay().await;
        }

        info!("Abans IT scrape finished with {} products", records.len());
        Ok(records)
    }
}
