//! Crate-wide constants: site keys, HTTP behavior, pagination safety valves.

pub const BUYABANS_API: &str = "buyabans";
pub const LAPTOPLK_API: &str = "laptoplk";
pub const SINGERSL_API: &str = "singersl";
pub const UNITYSYSTEMS_API: &str = "unitysystems";
pub const ABANSIT_API: &str = "abansit";
pub const NANOTEK_API: &str = "nanotek";
pub const TOKYOPC_API: &str = "tokyopc";

/// Browser-like identification header sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Per-request timeout. No timeout governs the overall run.
pub const HTTP_TIMEOUT_SECS: u64 = 20;

/// Total attempts per GET, including the first one.
pub const MAX_HTTP_ATTEMPTS: u32 = 3;

/// Server-side statuses worth retrying; everything else is final.
pub const RETRYABLE_STATUS: [u16; 5] = [500, 502, 503, 504, 524];

/// Hard page-count ceiling used when a site has no reliable stop signal.
pub const DEFAULT_PAGE_CEILING: u32 = 50;

/// Randomized pause between page fetches against the same server.
pub const POLITENESS_MIN_MS: u64 = 1_000;
pub const POLITENESS_MAX_MS: u64 = 3_000;
