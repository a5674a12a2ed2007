//! # Coin Dashboard SDK
//!
//! Data layer for a cryptocurrency dashboard on top of the CoinGecko REST
//! API: a market listing with a short-lived session cache, per-coin detail
//! and price charts, a debounced search filter, and a durable watchlist.
//!
//! ## Usage
//!
//! ```no_run
//! use coinwatch_sdk::{Dashboard, DashboardConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dashboard = Dashboard::new(DashboardConfig::from_env())?;
//!
//! // Served from the session cache for five minutes after a fetch
//! let coins = dashboard.listing().await?;
//! println!("{} coins", coins.len());
//!
//! // Star a coin
//! dashboard.watchlist().toggle("bitcoin")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Defaults live in the `constants` module. `DashboardConfig::from_env`
//! overrides them from:
//!
//! - `COINGECKO_API_KEY`: demo API key appended to every request
//! - `COINGECKO_API_URL`: API base URL
//! - `COINWATCH_PROFILE_PATH`: JSON file holding the watchlist
//!
//! ## Architecture
//!
//! ```text
//! Dashboard
//!     ├── ListingCache (session store, 5 min TTL)
//!     ├── ChartLoader ──┐
//!     └── Watchlist     │   (profile store)
//!                       ↓
//! MarketDataClient → fetch_with_retry → FetchClient (CoinGecko)
//! ```
//!
//! ## Error Handling
//!
//! ```no_run
//! use coinwatch_sdk::{ChartRange, Dashboard, DashboardConfig, Outcome};
//!
//! # async fn example(dashboard: Dashboard) {
//! match dashboard.chart("bitcoin", ChartRange::Day).await {
//!     Ok(Outcome::Current(chart)) => println!("{} points", chart.points.len()),
//!     Ok(Outcome::Superseded) => {}
//!     Err(e) if e.is_no_data() => println!("No chart data available"),
//!     Err(e) if e.is_not_found() => println!("Coin not found"),
//!     Err(e) if e.is_rate_limited() => println!("Rate limited, try again shortly"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # }
//! ```

pub mod cache;
pub mod chart;
pub mod client;
pub mod clock;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod provider;
pub mod providers;
pub mod retry;
pub mod search;
pub mod sequencer;
pub mod storage;
pub mod types;
pub mod watchlist;

// Re-export commonly used types
pub use chart::{build_series, ChartRange, PriceChart, Trend};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{ChartError, Error, ProviderError, StorageError};
pub use retry::{fetch_with_retry, RetryDecision, RetryPolicy};
pub use search::{filter, Debouncer};
pub use sequencer::Outcome;
pub use types::{CoinDetail, CoinSummary, MarketChart, PricePoint};
pub use watchlist::Watchlist;
