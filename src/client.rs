//! Typed access to the market-data endpoints
//!
//! Builds endpoint paths, sends them through the retry wrapper and decodes
//! the JSON into the types in `types.rs`.

use crate::{
    error::ProviderError,
    provider::FetchClient,
    retry::{fetch_decoded_with_retry, RetryPolicy},
    types::{CoinDetail, CoinSummary, MarketChart},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Market-data API client with retry
#[derive(Clone)]
pub struct MarketDataClient {
    fetcher: Arc<dyn FetchClient>,
    policy: RetryPolicy,
    vs_currency: String,
}

impl MarketDataClient {
    pub fn new(fetcher: Arc<dyn FetchClient>, policy: RetryPolicy, vs_currency: &str) -> Self {
        Self {
            fetcher,
            policy,
            vs_currency: vs_currency.to_string(),
        }
    }

    pub fn vs_currency(&self) -> &str {
        &self.vs_currency
    }

    pub fn provider_name(&self) -> &'static str {
        self.fetcher.provider_name()
    }

    // ── Endpoints ────────────────────────────────────────────────────────

    pub fn markets_endpoint(&self, page: u32, per_page: u32) -> String {
        format!(
            "/coins/markets?vs_currency={}&per_page={}&page={}",
            self.vs_currency, per_page, page
        )
    }

    pub fn markets_by_ids_endpoint(&self, ids: &[String]) -> String {
        let ids = ids
            .iter()
            .map(|id| urlencoding::encode(id).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "/coins/markets?vs_currency={}&ids={}&order=market_cap_desc",
            self.vs_currency, ids
        )
    }

    pub fn coin_endpoint(&self, id: &str) -> String {
        format!("/coins/{}", urlencoding::encode(id))
    }

    pub fn market_chart_endpoint(&self, id: &str, days: u32) -> String {
        format!(
            "/coins/{}/market_chart?vs_currency={}&days={}",
            urlencoding::encode(id),
            self.vs_currency,
            days
        )
    }

    // ── Requests ─────────────────────────────────────────────────────────

    /// One page of the market-cap ordered listing
    pub async fn markets(&self, page: u32, per_page: u32) -> Result<Vec<CoinSummary>, ProviderError> {
        let coins: Vec<CoinSummary> = self.get(&self.markets_endpoint(page, per_page)).await?;
        tracing::debug!(page, per_page, count = coins.len(), "Fetched market listing");
        Ok(coins)
    }

    /// Listing rows for specific coin ids, ordered by market cap
    ///
    /// An empty id list returns an empty result without a request.
    pub async fn markets_by_ids(&self, ids: &[String]) -> Result<Vec<CoinSummary>, ProviderError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.get(&self.markets_by_ids_endpoint(ids)).await
    }

    /// Full detail for one coin; never cached
    pub async fn coin(&self, id: &str) -> Result<CoinDetail, ProviderError> {
        self.get(&self.coin_endpoint(id)).await
    }

    /// Price history for one coin over `days`
    pub async fn market_chart(&self, id: &str, days: u32) -> Result<MarketChart, ProviderError> {
        self.get(&self.market_chart_endpoint(id, days)).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ProviderError> {
        fetch_decoded_with_retry(self.fetcher.as_ref(), endpoint, &self.policy, |body| {
            decode(endpoint, body)
        })
        .await
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: Value) -> Result<T, ProviderError> {
    serde_json::from_value(body).map_err(|e| {
        ProviderError::InvalidResponse(format!("Unexpected response shape for {}: {}", endpoint, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockClient;
    use serde_json::json;

    fn client(mock: Arc<MockClient>) -> MarketDataClient {
        MarketDataClient::new(mock, RetryPolicy::default(), "usd")
    }

    #[test]
    fn test_endpoints() {
        let api = client(Arc::new(MockClient::new()));
        assert_eq!(
            api.markets_endpoint(2, 50),
            "/coins/markets?vs_currency=usd&per_page=50&page=2"
        );
        assert_eq!(
            api.markets_by_ids_endpoint(&["bitcoin".into(), "usd-coin".into()]),
            "/coins/markets?vs_currency=usd&ids=bitcoin,usd-coin&order=market_cap_desc"
        );
        assert_eq!(api.coin_endpoint("wrapped bitcoin"), "/coins/wrapped%20bitcoin");
        assert_eq!(
            api.market_chart_endpoint("solana", 30),
            "/coins/solana/market_chart?vs_currency=usd&days=30"
        );
    }

    #[tokio::test]
    async fn test_markets_decodes_rows() {
        let mock = Arc::new(MockClient::new());
        mock.push_ok(
            "/coins/markets?vs_currency=usd&per_page=2&page=1",
            json!([
                { "id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "current_price": 67000.0 },
                { "id": "ethereum", "symbol": "eth", "name": "Ethereum", "current_price": 3500.0 }
            ]),
        );

        let coins = client(mock.clone()).markets(1, 2).await.unwrap();
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[1].id, "ethereum");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_markets_by_ids_empty_skips_request() {
        let mock = Arc::new(MockClient::new());
        let coins = client(mock.clone()).markets_by_ids(&[]).await.unwrap();
        assert!(coins.is_empty());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_shape_is_invalid_response() {
        let mock = Arc::new(MockClient::new());
        mock.push_ok("/coins/bitcoin", json!({ "symbol": 1 }));

        let err = client(mock.clone()).coin("bitcoin").await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_shape_then_valid_listing_recovers() {
        let mock = Arc::new(MockClient::new());
        let endpoint = "/coins/markets?vs_currency=usd&per_page=50&page=1";
        mock.push_ok(endpoint, json!({ "status": "oops" }));
        mock.push_ok(endpoint, json!([]));

        let coins = client(mock.clone()).markets(1, 50).await.unwrap();
        assert!(coins.is_empty());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_coin_not_found_surfaces() {
        let mock = Arc::new(MockClient::new());
        mock.push_err("/coins/nope", ProviderError::from_status(404, "coin not found"));

        let err = client(mock.clone()).coin("nope").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(mock.call_count(), 1);
    }
}
