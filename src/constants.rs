//! Constants for the coin dashboard SDK
//!
//! Defaults for everything tunable live here. `DashboardConfig` picks them up
//! and lets callers override a few of them at runtime (see `config.rs`).

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Query parameter carrying the demo API key
pub const API_KEY_PARAM: &str = "x_cg_demo_api_key";

/// Quote currency for every market query
pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// Coins per listing page
pub const DEFAULT_PER_PAGE: u32 = 50;

/// HTTP request timeout (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Attempts made by the retry wrapper before giving up
pub const MAX_FETCH_ATTEMPTS: u32 = 3;

/// Backoff before the second attempt (in milliseconds); doubles afterwards
pub const INITIAL_BACKOFF_MS: u64 = 1000;

/// How long a cached listing stays valid (in milliseconds)
pub const LISTING_CACHE_TTL_MS: i64 = 300_000;

/// Quiet period before raw search input becomes the effective query
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Characters kept from a coin description before it is cut off
pub const DESCRIPTION_EXCERPT_CHARS: usize = 500;

/// Storage key holding the watchlist (JSON array of coin ids)
pub const WATCHLIST_KEY: &str = "watchlist";

/// Storage key holding the cached listing payload
pub const CACHED_COINS_KEY: &str = "cachedCoins";

/// Storage key holding the cached listing fetch time (ms since epoch)
pub const CACHE_TIME_KEY: &str = "cacheTime";

/// Env var overriding the API key
pub const API_KEY_ENV: &str = "COINGECKO_API_KEY";

/// Env var overriding the API base URL
pub const API_URL_ENV: &str = "COINGECKO_API_URL";

/// Env var pointing at the durable profile store file
pub const PROFILE_PATH_ENV: &str = "COINWATCH_PROFILE_PATH";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coinwatch-sdk/0.1.0";
