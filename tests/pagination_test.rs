//! Pagination loop behavior against an in-memory HTTP port: stop signals,
//! metadata-driven page counts, the page ceiling, and fetch counts.

use async_trait::async_trait;
use catalog_scraper::apis::buyabans::BuyAbansCrawler;
use catalog_scraper::apis::laptoplk::LaptopLkCrawler;
use catalog_scraper::apis::nanotek::NanotekCrawler;
use catalog_scraper::apis::tokyopc::TokyoPcCrawler;
use catalog_scraper::apis::unitysystems::UnitySystemsCrawler;
use catalog_scraper::common::progress::SilentProgress;
use catalog_scraper::common::types::{PricePolicy, ProductApi, ScrapeConfig};
use catalog_scraper::infra::http_client::{HttpClientPort, HttpGetResult};
use catalog_scraper::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone)]
struct MockResponse {
    status: u16,
    final_url: Option<String>,
    body: String,
}

impl MockResponse {
    fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            final_url: None,
            body: body.into(),
        }
    }
}

/// In-memory stand-in for the retrying client; unknown URLs 404.
struct MockHttp {
    pages: HashMap<String, MockResponse>,
    fetches: AtomicUsize,
}

impl MockHttp {
    fn new(pages: Vec<(String, MockResponse)>) -> Arc<Self> {
        Arc::new(Self {
            pages: pages.into_iter().collect(),
            fetches: AtomicUsize::new(0),
        })
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClientPort for MockHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(url) {
            Some(resp) => Ok(HttpGetResult {
                status: resp.status,
                final_url: resp.final_url.clone().unwrap_or_else(|| url.to_string()),
                bytes: resp.body.clone().into_bytes(),
            }),
            None => Ok(HttpGetResult {
                status: 404,
                final_url: url.to_string(),
                bytes: Vec::new(),
            }),
        }
    }
}

fn test_config(base_url: &str, unparsed_price: PricePolicy) -> ScrapeConfig {
    ScrapeConfig {
        base_url: base_url.to_string(),
        output_filename: "test.xlsx".to_string(),
        country: "Sri Lanka".to_string(),
        currency: "LKR".to_string(),
        year: 2025,
        min_price: 1_000.0,
        max_price: 99_999_999.0,
        category_ids: Vec::new(),
        categories: Vec::new(),
        unparsed_price,
        page_ceiling: 50,
    }
}

fn woo_listing(name: &str, price: &str) -> String {
    format!(
        r#"<li class="product">
             <h2 class="woocommerce-loop-product__title">{name}</h2>
             <span class="price">{price}</span>
           </li>"#
    )
}

fn woo_page(listings: usize, page: u32, has_next: bool) -> String {
    let items: String = (0..listings)
        .map(|i| woo_listing(&format!("HP ProBook p{page} i{i}"), "Rs 250,000.00"))
        .collect();
    let next = if has_next {
        r#"<a class="next" href="?p=next">→</a>"#
    } else {
        ""
    };
    format!("<html><body><ul>{items}</ul>{next}</body></html>")
}

#[tokio::test]
async fn flat_catalog_walks_pages_until_the_next_link_disappears() {
    // Scenario: page 1 has 12 listings and a next link, page 2 has 5 and none.
    let base = "https://shop.example/shop/";
    let http = MockHttp::new(vec![
        (base.to_string(), MockResponse::ok(woo_page(12, 1, true))),
        (
            format!("{base}page/2/"),
            MockResponse::ok(woo_page(5, 2, false)),
        ),
    ]);

    let crawler = LaptopLkCrawler::with_http(http.clone());
    let config = test_config(base, PricePolicy::Skip);
    let records = crawler
        .scrape_products(&config, &SilentProgress)
        .await
        .unwrap();

    assert_eq!(records.len(), 17);
    assert_eq!(http.fetch_count(), 2);
}

fn buyabans_page(base: &str, products: usize) -> String {
    let data: Vec<String> = (0..products)
        .map(|i| {
            format!(
                r#"{{"product_name": "Samsung Galaxy {i}", "final_price": "185,000.00", "brand_name": "Samsung"}}"#
            )
        })
        .collect();
    format!(
        r#"{{"products": {{"last_page_url": "{base}?page=3", "data": [{}]}}}}"#,
        data.join(",")
    )
}

#[tokio::test]
async fn json_api_page_count_comes_from_first_response_metadata() {
    // Scenario: last_page_url says page=3, so exactly 3 pages are fetched
    // regardless of per-page signals.
    let base = "https://api.example/product-list";
    let page_url = |page: u32| {
        format!(
            "{base}?category_id=9&stamp_banner_id=0&sort=new_arrivals&is_search_list=false&page={page}"
        )
    };
    let http = MockHttp::new(vec![
        (page_url(1), MockResponse::ok(buyabans_page(base, 4))),
        (page_url(2), MockResponse::ok(buyabans_page(base, 4))),
        (page_url(3), MockResponse::ok(buyabans_page(base, 2))),
    ]);

    let crawler = BuyAbansCrawler::with_http(http.clone());
    let mut config = test_config(base, PricePolicy::Skip);
    config.category_ids = vec!["9".to_string()];

    let records = crawler
        .scrape_products(&config, &SilentProgress)
        .await
        .unwrap();

    assert_eq!(http.fetch_count(), 3);
    assert_eq!(records.len(), 10);
    assert!(records.iter().all(|r| r.brand == "Samsung"));
    assert!(records.iter().all(|r| r.price == 185_000.0));
}

fn tokyo_home(category_url: &str) -> String {
    format!(
        r#"<html><body>
             <a class="ty-menu__submenu-link" href="{category_url}"><span class="v-center">Laptops</span></a>
             <a class="ty-menu__submenu-link" href="{category_url}"><span class="v-center">Laptops duplicate</span></a>
           </body></html>"#
    )
}

fn tokyo_page(listings: usize) -> String {
    // Full page, no pagination block: the loop can only stop at the ceiling.
    let items: String = (0..listings)
        .map(|i| {
            format!(
                r#"<div class="ut2-gl__content">
                     <a class="product-title" href="https://www.tokyopc.jp/p/{i}">Sony VAIO {i}</a>
                     <span class="ty-price">¥81,500</span>
                   </div>"#
            )
        })
        .collect();
    format!("<html><body>{items}</body></html>")
}

#[tokio::test]
async fn page_ceiling_bounds_a_loop_with_no_stop_signal() {
    let base = "https://www.tokyopc.jp/";
    let cat = "https://www.tokyopc.jp/laptops/";
    let mut pages = vec![(base.to_string(), MockResponse::ok(tokyo_home(cat)))];
    for page in 1..=10 {
        pages.push((
            format!("{cat}?page={page}"),
            MockResponse::ok(tokyo_page(8)),
        ));
    }
    let http = MockHttp::new(pages);

    let crawler = TokyoPcCrawler::with_http(http.clone());
    let mut config = test_config(base, PricePolicy::Zero);
    config.country = "Japan".to_string();
    config.currency = "JPY".to_string();
    config.page_ceiling = 3;

    let records = crawler
        .scrape_products(&config, &SilentProgress)
        .await
        .unwrap();

    // One landing-page fetch plus exactly page_ceiling category pages; the
    // duplicate menu link was deduplicated by URL.
    assert_eq!(http.fetch_count(), 1 + 3);
    assert_eq!(records.len(), 3 * 8);
}

#[tokio::test]
async fn zero_discovered_categories_is_an_empty_result_not_an_error() {
    let base = "https://www.nanotek.lk";
    let http = MockHttp::new(vec![(
        base.to_string(),
        MockResponse::ok("<html><body><p>maintenance</p></body></html>"),
    )]);

    let crawler = NanotekCrawler::with_http(http.clone());
    let config = test_config(base, PricePolicy::Zero);

    let records = crawler
        .scrape_products(&config, &SilentProgress)
        .await
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(http.fetch_count(), 1);
}

fn unity_page(listings: usize, has_next: bool) -> String {
    let items: String = (0..listings)
        .map(|i| {
            format!(
                r#"<div class="product-grid-item">
                     <h3 class="wd-entities-title"><a href="https://u.example/p/{i}">Acer Nitro {i}</a></h3>
                     <span class="price"><span class="woocommerce-Price-amount"><bdi>Rs 400,000.00</bdi></span></span>
                   </div>"#
            )
        })
        .collect();
    let next = if has_next {
        r#"<a class="next page-numbers" href="?p=next">→</a>"#
    } else {
        ""
    };
    format!("<html><body>{items}{next}</body></html>")
}

#[tokio::test]
async fn redirect_back_to_first_page_terminates_the_loop() {
    let base = "https://www.unitysystems.lk/shop/";
    let http = MockHttp::new(vec![
        (base.to_string(), MockResponse::ok(unity_page(6, true))),
        (
            format!("{base}page/2/"),
            MockResponse {
                status: 200,
                // Past-the-end page silently redirected home.
                final_url: Some(base.to_string()),
                body: unity_page(6, true),
            },
        ),
    ]);

    let crawler = UnitySystemsCrawler::with_http(http.clone());
    let config = test_config(base, PricePolicy::Zero);

    let records = crawler
        .scrape_products(&config, &SilentProgress)
        .await
        .unwrap();

    assert_eq!(http.fetch_count(), 2);
    assert_eq!(records.len(), 6);
}

#[tokio::test]
async fn not_found_ends_the_walk_with_what_was_collected() {
    let base = "https://shop.example/shop/";
    // Page 1 claims a next page, but page 2 404s.
    let http = MockHttp::new(vec![(
        base.to_string(),
        MockResponse::ok(woo_page(3, 1, true)),
    )]);

    let crawler = LaptopLkCrawler::with_http(http.clone());
    let config = test_config(base, PricePolicy::Skip);

    let records = crawler
        .scrape_products(&config, &SilentProgress)
        .await
        .unwrap();

    assert_eq!(http.fetch_count(), 2);
    assert_eq!(records.len(), 3);
}
