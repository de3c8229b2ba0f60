//! Shared constants used across the application.

/// User agent string sent with content API requests.
pub const USER_AGENT: &str = concat!("spacetraveling/", env!("CARGO_PKG_VERSION"));

/// Reading speed used by the reading-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

/// Seconds after which a generated page is considered stale.
pub const REVALIDATE_SECS: u64 = 60 * 30;

/// Seconds a resolved master ref is reused before the API root is asked
/// again.
pub const MASTER_REF_TTL_SECS: u64 = 5;

/// Site name shown in page titles.
pub const SITE_NAME: &str = "spacetraveling";

/// How long a request for a post that is not cached waits for it to be
/// generated before the loading page is served instead.
pub const FALLBACK_WAIT_MS: u64 = 3000;

/// Upper bound for `/?pages=N`.
pub const MAX_LISTING_PAGES: usize = 50;

/// Entry count at which a page cache sweeps out expired entries.
pub const MAX_CACHED_PAGES: usize = 1024;
