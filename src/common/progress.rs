//! Progress events emitted while a scraper walks a site.
//!
//! The scrapers narrate through this interface instead of printing, so the
//! pagination and extraction logic stays testable without capturing output.

use tracing::{info, warn};

pub trait ProgressObserver: Send + Sync {
    fn category_started(&self, _site: &str, _category: &str) {}
    fn page_fetched(&self, _site: &str, _page: u32, _listings: usize) {}
    fn page_failed(&self, _site: &str, _page: u32, _reason: &str) {}
    fn record_skipped(&self, _site: &str, _reason: &str) {}
}

/// Default observer: forwards every event to the tracing subscriber.
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn category_started(&self, site: &str, category: &str) {
        info!(site, category, "scraping category");
    }

    fn page_fetched(&self, site: &str, page: u32, listings: usize) {
        info!(site, page, listings, "page fetched");
    }

    fn page_failed(&self, site: &str, page: u32, reason: &str) {
        warn!(site, page, reason, "page failed");
    }

    fn record_skipped(&self, site: &str, reason: &str) {
        warn!(site, reason, "listing skipped");
    }
}

/// Observer that ignores everything. Handy in unit tests.
pub struct SilentProgress;

impl ProgressObserver for SilentProgress {}
