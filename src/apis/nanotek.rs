//! Nanotek.lk crawler. Categories are discovered from the home page sidebar,
//! then each category is paged with `?page=N` while the "view more results"
//! affordance is present.

use crate::apis::extract::{
    apply_price_policy, clean_price_decimal, collapse_whitespace, resolve_brand,
};
use crate::apis::politeness_delay;
use crate::common::constants::NANOTEK_API;
use crate::common::error::Result;
use crate::common::progress::ProgressObserver;
use crate::common::types::{Category, PageResult, ProductApi, ProductRecord, ScrapeConfig};
use crate::infra::http_client::{HttpClientPort, RetryingHttp};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const KNOWN_BRANDS: [&str; 59] = [
    "HP", "Lenovo", "Asus", "Acer", "Dell", "MSI", "Apple", "Samsung", "LG", "JVC", "Haier",
    "Toshiba", "Electrolux", "Whirlpool", "Oppo", "Xiaomi", "JBL", "Titan", "Miniso", "Logitech",
    "Fantech", "Razer", "Corsair", "HyperX", "SteelSeries", "Gigabyte", "Zotac", "Palit", "Galax",
    "PNY", "Intel", "AMD", "Kingston", "Transcend", "Adata", "Western Digital", "Seagate",
    "Hikvision", "Dahua", "Ezviz", "Imou", "Tp-Link", "D-Link", "Ubiquiti", "Mikrotik", "Cisco",
    "Epson", "Canon", "Brother", "Pantum", "Ricoh", "Kyocera", "Konica Minolta", "Sharp", "Huawei",
    "Sony", "Microsoft", "Google", "OnePlus",
];

const FALLBACK_BRAND: &str = "Other";

pub struct NanotekCrawler {
    http: Arc<dyn HttpClientPort>,
}

impl Default for NanotekCrawler {
    fn default() -> Self {
        Self::new()
    }
}

impl NanotekCrawler {
    pub fn new() -> Self {
        Self::with_http(Arc::new(RetryingHttp::new()))
    }

    pub fn with_http(http: Arc<dyn HttpClientPort>) -> Self {
        Self { http }
    }

    /// Fetch the home page once and extract category links from the sidebar.
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
            let url = if page == 1 {
                category.url.clone()
            } else {
                format!("{}?page={page}", category.url)
            };
            let resp = match self.http.get(&url).await {
                Ok(resp) => resp,
                Err(e) => {
                    progress.page_failed(NANOTEK_API, page, &e.to_string());
                    break;
                }
            };
            if resp.is_not_found() {
                break;
            }
            if !resp.is_success() {
                progress.page_failed(NANOTEK_API, page, &format!("status {}", resp.status));
                break;
            }

            let parsed = parse_listing_page(&resp.text(), &category.name, config, progress);
            progress.page_fetched(NANOTEK_API, page, parsed.listing_count);

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

pub fn parse_categories(html: &str) -> Vec<Category> {
    let document = Html::parse_document(html);
    let link_sel = Selector::parse("ul.ty-cat-list li.ty-catListItem a").unwrap();
    let name_sel = Selector::parse(".ty-catTitle span").unwrap();

    let mut seen = HashSet::new();
    let mut categories = Vec::new();

    for link in document.select(&link_sel) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.starts_with("http") || !seen.insert(href.to_string()) {
            continue;
        }
        let name = link
            .select(&name_sel)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown Category".to_string());
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
    let item_sel = Selector::parse("li.ty-catPage-productListItem").unwrap();
    let link_sel = Selector::parse("a[href]").unwrap();
    let title_sel = Selector::parse(".ty-productBlock-title").unwrap();
    let price_sel = Selector::parse(".ty-productBlock-price-retail").unwrap();
    let image_sel = Selector::parse(".ty-productBlock-imgHolder img").unwrap();
    let more_sel = Selector::parse(".js-more-results").unwrap();

    let mut result = PageResult::default();

    for item in document.select(&item_sel) {
        result.listing_count += 1;

        let Some(link) = item.select(&link_sel).next() else {
            progress.record_skipped(NANOTEK_API, "listing without a product link");
            continue;
        };
        let product_url = link.value().attr("href").map(str::to_string);

        let Some(title_el) = item.select(&title_sel).next() else {
            progress.record_skipped(NANOTEK_API, "listing without a title element");
            continue;
        };
        let name = collapse_whitespace(&title_el.text().collect::<String>());

        let price_text = item
            .select(&price_sel)
            .next()
            .map(|el| el.text().collect::<String>());
        let parsed_price = price_text.as_deref().and_then(clean_price_decimal);
        let Some(price) = apply_price_policy(parsed_price, config.unparsed_price) else {
            progress.record_skipped(NANOTEK_API, "unparsable price");
            continue;
        };
        if !config.price_in_range(price) {
            continue;
        }

        let image_url = item
            .select(&image_sel)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string);

        let brand = resolve_brand(&name, None, &KNOWN_BRANDS, FALLBACK_BRAND);
        result.records.push(ProductRecord {
            category: category_name.to_string(),
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

    // The "view more results" affordance disappears on the last page.
    result.has_next = document.select(&more_sel).next().is_some();
    result
}

#[async_trait::async_trait]
impl ProductApi for NanotekCrawler {
    fn api_name(&self) -> &'static str {
        NANOTEK_API
    }

    async fn scrape_products(
        &self,
        config: &ScrapeConfig,
        progress: &dyn ProgressObserver,
    ) -> Result<Vec<ProductRecord>> {
        let categories = match self.discover_categories(&config.base_url).await {
            Ok(categories) => categories,
            Err(e) => {
                error!(error = %e, "failed to fetch Nanotek categories");
                return Err(e);
            }
        };
        if categories.is_empty() {
            info!("no Nanotek categories found, nothing to scrape");
            return Ok(Vec::new());
        }
        info!("found {} Nanotek categories", categories.len());

        let mut records = Vec::new();
        for category in &categories {
            progress.category_started(NANOTEK_API, &category.name);
            self.scrape_category(category, config, progress, &mut records)
                .await;
            // Short pause between categories.
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        info!("Nanotek scrape finished with {} products", records.len());
        Ok(records)
    }
}
