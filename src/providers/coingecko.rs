//! CoinGecko fetch client implementation

use crate::{
    config::DashboardConfig,
    constants::{API_KEY_PARAM, USER_AGENT},
    error::ProviderError,
    provider::FetchClient,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// CoinGecko fetch client
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    /// Creates a new CoinGecko client from dashboard configuration
    pub fn new(config: &DashboardConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::Network)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Builds the full request URL, appending the API key parameter
    ///
    /// The key is joined with `&` when the endpoint already carries a query
    /// string and with `?` otherwise.
    pub fn build_url(&self, endpoint: &str) -> String {
        let url = format!("{}{}", self.base_url, endpoint);
        match &self.api_key {
            Some(key) => {
                let sep = if endpoint.contains('?') { '&' } else { '?' };
                format!(
                    "{}{}{}={}",
                    url,
                    sep,
                    API_KEY_PARAM,
                    urlencoding::encode(key)
                )
            }
            None => url,
        }
    }
}

#[async_trait]
impl FetchClient for CoinGeckoClient {
    async fn get_json(&self, endpoint: &str) -> Result<Value, ProviderError> {
        let url = self.build_url(endpoint);
        tracing::debug!(endpoint, "Fetching from CoinGecko");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::Network(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(endpoint, status = status.as_u16(), "CoinGecko request failed");
            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        let response_text = response.text().await.map_err(ProviderError::Network)?;

        serde_json::from_str(&response_text).map_err(|e| {
            ProviderError::InvalidResponse(format!(
                "Failed to parse CoinGecko response: {}. Response: {}",
                e, response_text
            ))
        })
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
