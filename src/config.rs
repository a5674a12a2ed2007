//! Runtime configuration for the dashboard SDK
//!
//! Defaults come from `constants.rs`. [`DashboardConfig::from_env`] applies
//! the few overrides that differ between deployments: the API key, the API
//! base URL, and where the durable profile store lives.

use crate::constants::{
    API_KEY_ENV, API_URL_ENV, COINGECKO_API_URL, DEFAULT_PER_PAGE, DEFAULT_VS_CURRENCY,
    LISTING_CACHE_TTL_MS, MAX_FETCH_ATTEMPTS, PROFILE_PATH_ENV, REQUEST_TIMEOUT_SECS,
    SEARCH_DEBOUNCE_MS,
};
use crate::retry::RetryPolicy;
use std::path::PathBuf;
use std::time::Duration;

/// Dashboard SDK configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// API base URL, without a trailing slash
    pub base_url: String,
    /// Demo API key appended to every request
    pub api_key: Option<String>,
    /// Quote currency code
    pub vs_currency: String,
    /// Coins per listing page
    pub per_page: u32,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Attempts made by the retry wrapper
    pub max_attempts: u32,
    /// Listing cache validity window in milliseconds
    pub cache_ttl_ms: i64,
    /// Search input quiet period
    pub search_debounce: Duration,
    /// JSON file backing the watchlist; in-memory when unset
    pub profile_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            api_key: None,
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            per_page: DEFAULT_PER_PAGE,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            max_attempts: MAX_FETCH_ATTEMPTS,
            cache_ttl_ms: LISTING_CACHE_TTL_MS,
            search_debounce: Duration::from_millis(SEARCH_DEBOUNCE_MS),
            profile_path: None,
        }
    }
}

impl DashboardConfig {
    /// Builds a configuration from defaults plus environment overrides
    ///
    /// Reads `COINGECKO_API_KEY`, `COINGECKO_API_URL` and
    /// `COINWATCH_PROFILE_PATH`. Empty values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(key) = non_empty(API_KEY_ENV) {
            config.api_key = Some(key);
        } else {
            tracing::warn!("{} not set, requests will be sent without an API key", API_KEY_ENV);
        }
        if let Some(url) = non_empty(API_URL_ENV) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = non_empty(PROFILE_PATH_ENV) {
            config.profile_path = Some(PathBuf::from(path));
        }

        config
    }

    /// Retry policy derived from `max_attempts`
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_max_attempts(self.max_attempts)
    }
}
