use crate::apis::abansit::AbansItCrawler;
use crate::apis::buyabans::BuyAbansCrawler;
use crate::apis::laptoplk::LaptopLkCrawler;
use crate::apis::nanotek::NanotekCrawler;
use crate::apis::singersl::SingerSlCrawler;
use crate::apis::tokyopc::TokyoPcCrawler;
use crate::apis::unitysystems::UnitySystemsCrawler;
use crate::common::constants::*;
use crate::common::types::ProductApi;

/// Factory function mapping a site key to its crawler.
pub fn create_scraper(api_name: &str) -> Option<Box<dyn ProductApi>> {
    match api_name {
        BUYABANS_API => Some(Box::new(BuyAbansCrawler::new())),
        LAPTOPLK_API => Some(Box::new(LaptopLkCrawler::new())),
        SINGERSL_API => Some(Box::new(SingerSlCrawler::new())),
        UNITYSYSTEMS_API => Some(Box::new(UnitySystemsCrawler::new())),
        ABANSIT_API => Some(Box::new(AbansItCrawler::new())),
        NANOTEK_API => Some(Box::new(NanotekCrawler::new())),
        TOKYOPC_API => Some(Box::new(TokyoPcCrawler::new())),
        _ => None,
    }
}
