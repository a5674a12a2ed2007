//! Market data types returned by the CoinGecko API

use crate::constants::DESCRIPTION_EXCERPT_CHARS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the `/coins/markets` listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSummary {
    /// Stable CoinGecko identifier (e.g. "bitcoin")
    pub id: String,

    #[serde(default)]
    pub symbol: String,

    #[serde(default)]
    pub name: String,

    /// Logo URL
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub current_price: Option<f64>,

    #[serde(default)]
    pub market_cap: Option<f64>,

    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    #[serde(default)]
    pub total_volume: Option<f64>,

    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

impl CoinSummary {
    /// Creates a summary with only identity fields set
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            image: None,
            current_price: None,
            market_cap: None,
            market_cap_rank: None,
            total_volume: None,
            price_change_percentage_24h: None,
        }
    }

    /// Ticker in upper case, as displayed in tables
    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }

    /// True when the 24h change is zero or positive (missing counts as zero)
    pub fn is_up_24h(&self) -> bool {
        self.price_change_percentage_24h.unwrap_or(0.0) >= 0.0
    }
}

/// Logo URLs in the sizes the detail endpoint returns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinImage {
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

/// Nested `market_data` block of `/coins/{id}`, keyed by currency code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: HashMap<String, f64>,

    #[serde(default)]
    pub market_cap: HashMap<String, f64>,

    #[serde(default)]
    pub total_volume: HashMap<String, f64>,

    #[serde(default)]
    pub circulating_supply: Option<f64>,

    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

/// Full coin record from `/coins/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,

    #[serde(default)]
    pub symbol: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub image: CoinImage,

    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    /// Description text keyed by language code
    #[serde(default)]
    pub description: HashMap<String, String>,

    #[serde(default)]
    pub market_data: Option<MarketData>,
}

impl CoinDetail {
    /// Current price in the given currency
    pub fn price_in(&self, currency: &str) -> Option<f64> {
        self.market_data
            .as_ref()
            .and_then(|m| m.current_price.get(currency).copied())
    }

    /// Market cap in the given currency
    pub fn market_cap_in(&self, currency: &str) -> Option<f64> {
        self.market_data
            .as_ref()
            .and_then(|m| m.market_cap.get(currency).copied())
    }

    /// 24h traded volume in the given currency
    pub fn volume_in(&self, currency: &str) -> Option<f64> {
        self.market_data
            .as_ref()
            .and_then(|m| m.total_volume.get(currency).copied())
    }

    pub fn circulating_supply(&self) -> Option<f64> {
        self.market_data.as_ref().and_then(|m| m.circulating_supply)
    }

    pub fn price_change_percentage_24h(&self) -> Option<f64> {
        self.market_data
            .as_ref()
            .and_then(|m| m.price_change_percentage_24h)
    }

    /// Largest available logo
    pub fn best_image(&self) -> Option<&str> {
        self.image
            .large
            .as_deref()
            .or(self.image.small.as_deref())
            .or(self.image.thumb.as_deref())
    }

    /// English description cut to a fixed length, with an ellipsis when cut
    ///
    /// Returns `None` when there is no English description at all.
    pub fn description_excerpt(&self) -> Option<String> {
        let text = self.description.get("en").filter(|d| !d.is_empty())?;
        if text.chars().count() <= DESCRIPTION_EXCERPT_CHARS {
            return Some(text.clone());
        }
        let cut: String = text.chars().take(DESCRIPTION_EXCERPT_CHARS).collect();
        Some(format!("{cut}..."))
    }
}

/// A single `[timestamp_ms, price]` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct PricePoint {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp_ms: i64, price: f64) -> Self {
        Self {
            timestamp_ms,
            price,
        }
    }
}

impl From<(f64, f64)> for PricePoint {
    fn from((timestamp, price): (f64, f64)) -> Self {
        Self {
            timestamp_ms: timestamp as i64,
            price,
        }
    }
}

impl From<PricePoint> for (f64, f64) {
    fn from(point: PricePoint) -> Self {
        (point.timestamp_ms as f64, point.price)
    }
}

/// Body of `/coins/{id}/market_chart`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<PricePoint>,
}
