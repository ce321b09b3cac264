//! Static registry of supported countries and sites, and the per-site
//! configuration each scraper runs with.

use crate::common::constants::*;
use crate::common::types::{PricePolicy, ScrapeConfig};

#[derive(Debug, Clone, Copy)]
pub struct SiteEntry {
    pub country: &'static str,
    pub key: &'static str,
    pub label: &'static str,
}

pub const SUPPORTED_SITES: [SiteEntry; 7] = [
    SiteEntry {
        country: "Sri Lanka",
        key: BUYABANS_API,
        label: "BuyAbans.com (All Products)",
    },
    SiteEntry {
        country: "Sri Lanka",
        key: LAPTOPLK_API,
        label: "Laptop.lk (All Products)",
    },
    SiteEntry {
        country: "Sri Lanka",
        key: SINGERSL_API,
        label: "Singer.lk (All Products)",
    },
    SiteEntry {
        country: "Sri Lanka",
        key: UNITYSYSTEMS_API,
        label: "UnitySystems.lk (All Products)",
    },
    SiteEntry {
        country: "Sri Lanka",
        key: ABANSIT_API,
        label: "AbansIT.lk (All Products)",
    },
    SiteEntry {
        country: "Sri Lanka",
        key: NANOTEK_API,
        label: "Nanotek.lk (All Products)",
    },
    SiteEntry {
        country: "Japan",
        key: TOKYOPC_API,
        label: "TokyoPC.jp (All Products)",
    },
];

/// Case-insensitive lookup by country name and site key.
pub fn find_site(country: &str, site: &str) -> Option<&'static SiteEntry> {
    SUPPORTED_SITES.iter().find(|entry| {
        entry.country.eq_ignore_ascii_case(country) && entry.key.eq_ignore_ascii_case(site)
    })
}

impl SiteEntry {
    pub fn config(&self) -> ScrapeConfig {
        let defaults = |base_url: &str, output: &str| ScrapeConfig {
            base_url: base_url.to_string(),
            output_filename: output.to_string(),
            country: "Sri Lanka".to_string(),
            currency: "LKR".to_string(),
            year: 2025,
            min_price: 1_000.0,
            max_price: 99_999_999.0,
            category_ids: Vec::new(),
            categories: Vec::new(),
            unparsed_price: PricePolicy::Skip,
            page_ceiling: DEFAULT_PAGE_CEILING,
        };

        match self.key {
            BUYABANS_API => ScrapeConfig {
                category_ids: [
                    "67", "567", "9", "568", "569", "570", "572", "573", "27", "19", "26", "17",
                    "33",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                ..defaults("https://buyabans.com/product-list", "BuyAbans_All_Products.xlsx")
            },
            LAPTOPLK_API => defaults(
                "https://www.laptop.lk/index.php/shop/",
                "Laptop_lk_All_Products.xlsx",
            ),
            SINGERSL_API => defaults("https://www.singersl.com/filter", "SingerSL_All_Products.xlsx"),
            UNITYSYSTEMS_API => ScrapeConfig {
                unparsed_price: PricePolicy::Zero,
                ..defaults(
                    "https://www.unitysystems.lk/shop/",
                    "UnitySystems_All_Products.xlsx",
                )
            },
            ABANSIT_API => ScrapeConfig {
                unparsed_price: PricePolicy::Zero,
                categories: [
                    "laptops",
                    "desktops",
                    "monitors",
                    "accessories",
                    "gaming",
                    "tablets",
                    "printers",
                    "all-in-one",
                    "education",
                    "professional",
                    "smartboards",
                    "signages",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                ..defaults(
                    "https://abansit.lk/welcome/productsPagination/",
                    "AbansIT_All_Products.xlsx",
                )
            },
            NANOTEK_API => ScrapeConfig {
                unparsed_price: PricePolicy::Zero,
                ..defaults("https://www.nanotek.lk", "Nanotek_All_Products.xlsx")
            },
            TOKYOPC_API => ScrapeConfig {
                country: "Japan".to_string(),
                currency: "JPY".to_string(),
                unparsed_price: PricePolicy::Zero,
                ..defaults("https://www.tokyopc.jp/", "TokyoPC_All_Products.xlsx")
            },
            _ => unreachable!("unknown site key {}", self.key),
        }
    }
}
