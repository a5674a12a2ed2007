//! Dashboard facade
//!
//! Wires the fetch client, session cache, watchlist and chart loader
//! together and exposes the operations the view layer calls.

use crate::{
    cache::ListingCache,
    chart::{ChartLoader, ChartRange, PriceChart},
    client::MarketDataClient,
    clock::{Clock, SystemClock},
    config::DashboardConfig,
    error::Error,
    provider::FetchClient,
    providers::CoinGeckoClient,
    search,
    sequencer::Outcome,
    storage::{FileStore, KeyValueStore, MemoryStore},
    types::{CoinDetail, CoinSummary},
    watchlist::Watchlist,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Entry point for dashboard data
///
/// # Example
/// ```no_run
/// use coinwatch_sdk::{Dashboard, DashboardConfig, ChartRange};
///
/// # async fn example() -> Result<(), coinwatch_sdk::Error> {
/// let dashboard = Dashboard::new(DashboardConfig::from_env())?;
///
/// let coins = dashboard.listing().await?;
/// for coin in dashboard.search(&coins, "btc") {
///     println!("{} ({})", coin.name, coin.display_symbol());
/// }
///
/// dashboard.watchlist().add("bitcoin")?;
/// if let Some(chart) = dashboard.chart("bitcoin", ChartRange::Week).await?.into_current() {
///     println!("{} points, trend {:?}", chart.points.len(), chart.trend);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Dashboard {
    client: MarketDataClient,
    listing: ListingCache,
    watchlist: Watchlist,
    charts: ChartLoader,
    per_page: u32,
    search_debounce: Duration,
}

impl Dashboard {
    /// Creates a dashboard backed by the CoinGecko API
    ///
    /// The session cache is in memory. The watchlist goes to the file at
    /// `config.profile_path`, or stays in memory when that is unset.
    pub fn new(config: DashboardConfig) -> Result<Self, Error> {
        let fetcher: Arc<dyn FetchClient> = Arc::new(CoinGeckoClient::new(&config)?);
        let profile: Arc<dyn KeyValueStore> = match &config.profile_path {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };

        tracing::info!(
            provider = fetcher.provider_name(),
            base_url = %config.base_url,
            durable_watchlist = config.profile_path.is_some(),
            "Creating dashboard"
        );

        Ok(Self::with_components(
            &config,
            fetcher,
            Arc::new(MemoryStore::new()),
            profile,
            Arc::new(SystemClock),
        ))
    }

    /// Creates a dashboard from explicit collaborators
    ///
    /// This is primarily for testing with mock fetch clients and clocks.
    pub fn with_components(
        config: &DashboardConfig,
        fetcher: Arc<dyn FetchClient>,
        session: Arc<dyn KeyValueStore>,
        profile: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let client = MarketDataClient::new(fetcher, config.retry_policy(), &config.vs_currency);
        let listing = ListingCache::new(
            client.clone(),
            session,
            clock,
            config.cache_ttl_ms,
            config.per_page,
        );

        Self {
            charts: ChartLoader::new(client.clone()),
            listing,
            watchlist: Watchlist::new(profile),
            client,
            per_page: config.per_page,
            search_debounce: config.search_debounce,
        }
    }

    /// First listing page, served from the session cache when fresh
    pub async fn listing(&self) -> Result<Vec<CoinSummary>, Error> {
        self.listing.get_listing().await
    }

    /// A listing page; only page 1 is cached, other pages always fetch
    pub async fn listing_page(&self, page: u32) -> Result<Vec<CoinSummary>, Error> {
        if page <= 1 {
            return self.listing().await;
        }
        Ok(self.client.markets(page, self.per_page).await?)
    }

    /// Coins in `listing` matching `query` by name or symbol
    pub fn search<'a>(&self, listing: &'a [CoinSummary], query: &str) -> Vec<&'a CoinSummary> {
        search::filter(listing, query)
    }

    /// Detail for one coin, always fetched fresh
    ///
    /// A missing coin surfaces as an error for which `is_not_found()` holds.
    pub async fn coin(&self, id: &str) -> Result<CoinDetail, Error> {
        Ok(self.client.coin(id).await?)
    }

    /// Price chart for the coin/range currently selected
    pub async fn chart(&self, id: &str, range: ChartRange) -> Result<Outcome<PriceChart>, Error> {
        self.charts.load(id, range).await
    }

    /// Debounces raw search input with the configured quiet period
    ///
    /// The receiver holds the effective query to pass to [`Dashboard::search`].
    /// Must be called from within a tokio runtime.
    pub fn debounced_search(
        &self,
        input: mpsc::Receiver<String>,
    ) -> (watch::Receiver<String>, JoinHandle<()>) {
        search::spawn_debounced(input, self.search_debounce)
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    /// Market rows for every watched coin, ordered by market cap
    pub async fn watchlist_coins(&self) -> Result<Vec<CoinSummary>, Error> {
        let ids = self.watchlist.list()?;
        Ok(self.client.markets_by_ids(&ids).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::ProviderError;
    use crate::provider::mock::MockClient;
    use serde_json::json;

    fn dashboard(mock: Arc<MockClient>) -> (Arc<ManualClock>, Dashboard) {
        dashboard_with(mock, &DashboardConfig::default())
    }

    fn dashboard_with(
        mock: Arc<MockClient>,
        config: &DashboardConfig,
    ) -> (Arc<ManualClock>, Dashboard) {
        let clock = Arc::new(ManualClock::new(0));
        let dashboard = Dashboard::with_components(
            config,
            mock,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            clock.clone(),
        );
        (clock, dashboard)
    }

    fn page(page: u32) -> String {
        format!("/coins/markets?vs_currency=usd&per_page=50&page={page}")
    }

    #[tokio::test]
    async fn test_only_first_page_is_cached() {
        let mock = Arc::new(MockClient::new());
        mock.push_ok(&page(1), json!([{ "id": "bitcoin", "symbol": "btc", "name": "Bitcoin" }]));
        mock.push_ok(&page(2), json!([{ "id": "dogecoin", "symbol": "doge", "name": "Dogecoin" }]));
        let (_, dashboard) = dashboard(mock.clone());

        dashboard.listing_page(1).await.unwrap();
        dashboard.listing_page(1).await.unwrap();
        let second = dashboard.listing_page(2).await.unwrap();
        dashboard.listing_page(2).await.unwrap();

        assert_eq!(second[0].id, "dogecoin");
        assert_eq!(mock.calls(), vec![page(1), page(2), page(2)]);
    }

    #[tokio::test]
    async fn test_listing_refetched_after_ttl() {
        let mock = Arc::new(MockClient::new());
        mock.push_ok(&page(1), json!([]));
        let (clock, dashboard) = dashboard(mock.clone());

        dashboard.listing().await.unwrap();
        clock.advance_ms(300_000);
        dashboard.listing().await.unwrap();

        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_watchlist_coins() {
        let mock = Arc::new(MockClient::new());
        mock.push_ok(
            "/coins/markets?vs_currency=usd&ids=solana,bitcoin&order=market_cap_desc",
            json!([
                { "id": "bitcoin", "symbol": "btc", "name": "Bitcoin" },
                { "id": "solana", "symbol": "sol", "name": "Solana" }
            ]),
        );
        let (_, dashboard) = dashboard(mock.clone());

        assert!(dashboard.watchlist_coins().await.unwrap().is_empty());
        assert_eq!(mock.call_count(), 0);

        dashboard.watchlist().add("solana").unwrap();
        dashboard.watchlist().add("bitcoin").unwrap();
        let coins = dashboard.watchlist_coins().await.unwrap();
        assert_eq!(coins.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_coin_is_not_found() {
        let mock = Arc::new(MockClient::new());
        mock.push_err("/coins/nope", ProviderError::from_status(404, "coin not found"));
        let (_, dashboard) = dashboard(mock);

        let err = dashboard.coin("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_search_over_cached_listing() {
        let mock = Arc::new(MockClient::new());
        mock.push_ok(
            &page(1),
            json!([
                { "id": "bitcoin", "symbol": "btc", "name": "Bitcoin" },
                { "id": "ethereum", "symbol": "eth", "name": "Ethereum" }
            ]),
        );
        let (_, dashboard) = dashboard(mock);

        let coins = dashboard.listing().await.unwrap();
        let hits = dashboard.search(&coins, "ETH");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "ethereum");
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_search_uses_configured_delay() {
        let config = DashboardConfig {
            search_debounce: Duration::from_millis(1_000),
            ..DashboardConfig::default()
        };
        let (_, dashboard) = dashboard_with(Arc::new(MockClient::new()), &config);
        let (tx, rx) = mpsc::channel(8);
        let (mut query, _handle) = dashboard.debounced_search(rx);

        tx.send("sol".to_string()).await.unwrap();
        // Past the default 300ms, still inside the configured second
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!query.has_changed().unwrap());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(query.has_changed().unwrap());
        assert_eq!(*query.borrow_and_update(), "sol");
    }
}
