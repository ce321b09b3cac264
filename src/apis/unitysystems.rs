//! UnitySystems.lk crawler. WooCommerce theme with `/page/N/` pagination;
//! past-the-end pages either 404 or redirect back to the first page, and an
//! `a.next.page-numbers` button marks continuable pages.

use crate::apis::extract::{
    apply_price_policy, clean_price_decimal, collapse_whitespace, resolve_brand,
};
use crate::apis::politeness_delay;
use crate::common::constants::UNITYSYSTEMS_API;
use crate::common::error::Result;
use crate::common::progress::ProgressObserver;
use crate::common::types::{PageResult, ProductApi, ProductRecord, ScrapeConfig};
use crate::infra::http_client::{HttpClientPort, RetryingHttp};
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::info;

const KNOWN_BRANDS: [&str; 54] = [
    "HP", "Lenovo", "Asus", "Acer", "Dell", "MSI", "Apple", "Samsung", "LG", "JVC", "Haier",
    "Toshiba", "Electrolux", "Whirlpool", "Oppo", "Xiaomi", "JBL", "Titan", "Miniso", "Logitech",
    "Fantech", "Razer", "Corsair", "HyperX", "SteelSeries", "Gigabyte", "Zotac", "Palit", "Galax",
    "PNY", "Intel", "AMD", "Kingston", "Transcend", "Adata", "Western Digital", "Seagate",
    "Hikvision", "Dahua", "Ezviz", "Imou", "Tp-Link", "D-Link", "Ubiquiti", "Mikrotik", "Cisco",
    "Epson", "Canon", "Brother", "Pantum", "Ricoh", "Kyocera", "Konica Minolta", "Sharp",
];

const FALLBACK_BRAND: &str = "Other";

pub struct UnitySystemsCrawler {
    http: Arc<dyn HttpClientPort>,
}

impl Default for UnitySystemsCrawler {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitySystemsCrawler {
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

pub fn parse_listing_page(
    html: &str,
    config: &ScrapeConfig,
    progress: &dyn ProgressObserver,
) -> PageResult {
    let document = Html::parse_document(html);
    let container_sel = Selector::parse("div.product-grid-item").unwrap();
    let title_sel = Selector::parse("h3.wd-entities-title a").unwrap();
    let price_sel = Selector::parse("span.price span.woocommerce-Price-amount bdi").unwrap();
    let sale_price_sel =
        Selector::parse("span.price ins span.woocommerce-Price-amount bdi").unwrap();
    let image_sel = Selector::parse("div.product-element-top a.product-image-link img").unwrap();
    let next_sel = Selector::parse("a.next.page-numbers").unwrap();

    let mut result = PageResult::default();

    for container in document.select(&container_sel) {
        result.listing_count += 1;

        let Some(title_el) = container.select(&title_sel).next() else {
            progress.record_skipped(UNITYSYSTEMS_API, "listing without a title anchor");
            continue;
        };
        let name = collapse_whitespace(&title_el.text().collect::<String>());
        let product_url = title_el.value().attr("href").map(str::to_string);

        // Discounted price wins when both are present.
        let price_text = container
            .select(&sale_price_sel)
            .next()
            .or_else(|| container.select(&price_sel).next())
            .map(|el| el.text().collect::<String>());
        let parsed_price = price_text.as_deref().and_then(clean_price_decimal);
        let Some(price) = apply_price_policy(parsed_price, config.unparsed_price) else {
            progress.record_skipped(UNITYSYSTEMS_API, "unparsable price");
            continue;
        };
        if !config.price_in_range(price) {
            continue;
        }

        let image_url = container.select(&image_sel).next().and_then(|img| {
            img.value()
                .attr("data-src")
                .or_else(|| img.value().attr("src"))
                .map(str::to_string)
        });

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

    result.has_next = document.select(&next_sel).next().is_some();
    result
}

#[async_trait::async_trait]
impl ProductApi for UnitySystemsCrawler {
    fn api_name(&self) -> &'static str {
        UNITYSYSTEMS_API
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
                    progress.page_failed(UNITYSYSTEMS_API, page, &e.to_string());
                    break;
                }
            };
            if resp.is_not_found() {
                break;
            }
            // Past-the-end page numbers redirect back to the first page.
            if page > 1 && resp.final_url == config.base_url {
                break;
            }
            if !resp.is_success() {
                progress.page_failed(UNITYSYSTEMS_API, page, &format!("status {}", resp.status));
                break;
            }

            let parsed = parse_listing_page(&resp.text(), config, progress);
            progress.page_fetched(UNITYSYSTEMS_API, page, parsed.listing_count);

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

        info!(
            "Unity Systems scrape finished with {} products",
            records.len()
        );
        Ok(records)
    }
}
