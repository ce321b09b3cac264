//! One crawler per storefront. Each module owns its structural selectors,
//! its known-brand list, and its pagination stop predicate; only the loop
//! shape (fetch, parse, decide) is shared.

pub mod abansit;
pub mod buyabans;
pub mod extract;
pub mod factory;
pub mod laptoplk;
pub mod nanotek;
pub mod singersl;
pub mod tokyopc;
pub mod unitysystems;

use crate::common::constants::{POLITENESS_MAX_MS, POLITENESS_MIN_MS};
use rand::Rng;
use std::time::Duration;

/// Randomized pause between sequential requests to the same server.
pub(crate) async fn politeness_delay() {
    let millis = rand::thread_rng().gen_range(POLITENESS_MIN_MS..=POLITENESS_MAX_MS);
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
