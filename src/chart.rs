//! Price-range chart data adapter
//!
//! Converts raw `[timestamp, price]` points into labeled points with a trend
//! classification. Rendering is left to the caller.

use crate::{
    client::MarketDataClient,
    error::{ChartError, Error},
    sequencer::{Outcome, RequestSequencer},
    types::PricePoint,
};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Selectable chart ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartRange {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl ChartRange {
    pub fn days(&self) -> u32 {
        match self {
            ChartRange::Day => 1,
            ChartRange::Week => 7,
            ChartRange::Month => 30,
            ChartRange::Quarter => 90,
            ChartRange::Year => 365,
        }
    }

    /// Short label for range selector buttons
    pub fn label(&self) -> &'static str {
        match self {
            ChartRange::Day => "24h",
            ChartRange::Week => "7d",
            ChartRange::Month => "30d",
            ChartRange::Quarter => "90d",
            ChartRange::Year => "1Y",
        }
    }

    pub fn all() -> &'static [ChartRange] {
        &[
            ChartRange::Day,
            ChartRange::Week,
            ChartRange::Month,
            ChartRange::Quarter,
            ChartRange::Year,
        ]
    }

    pub fn from_days(days: u32) -> Option<Self> {
        Self::all().iter().copied().find(|r| r.days() == days)
    }
}

/// Direction of the series from its first to its last price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Positive,
    Negative,
}

impl Trend {
    /// Line color
    pub fn color(&self) -> &'static str {
        match self {
            Trend::Positive => "#10b981",
            Trend::Negative => "#ef4444",
        }
    }

    /// Area fill color
    pub fn fill_color(&self) -> &'static str {
        match self {
            Trend::Positive => "rgba(16, 185, 129, 0.1)",
            Trend::Negative => "rgba(239, 68, 68, 0.1)",
        }
    }
}

/// A point ready for plotting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub label: String,
    pub timestamp_ms: i64,
    pub price: f64,
}

/// Labeled series plus what a renderer needs for axes and colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChart {
    pub dataset_label: String,
    pub range_days: u32,
    pub points: Vec<LabeledPoint>,
    pub trend: Trend,
    pub min_price: f64,
    pub max_price: f64,
}

impl PriceChart {
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }
}

/// Formats a timestamp for the given range, in UTC
///
/// Up to one day: `03:45 PM`. Up to a week: `Mon, Jan 5`. Longer: `Jan 5`.
pub fn format_label(timestamp_ms: i64, range_days: u32) -> String {
    let Some(at) = Utc.timestamp_millis_opt(timestamp_ms).single() else {
        return timestamp_ms.to_string();
    };
    let pattern = if range_days <= 1 {
        "%I:%M %p"
    } else if range_days <= 7 {
        "%a, %b %-d"
    } else {
        "%b %-d"
    };
    at.format(pattern).to_string()
}

/// Builds a labeled series from ascending price points
///
/// The trend compares only the first and last prices.
pub fn build_series(raw: &[PricePoint], range_days: u32) -> Result<PriceChart, ChartError> {
    let (Some(first), Some(last)) = (raw.first(), raw.last()) else {
        return Err(ChartError::NoData);
    };

    let trend = if last.price >= first.price {
        Trend::Positive
    } else {
        Trend::Negative
    };

    let (min_price, max_price) = raw.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.price), hi.max(p.price))
    });

    let points = raw
        .iter()
        .map(|p| LabeledPoint {
            label: format_label(p.timestamp_ms, range_days),
            timestamp_ms: p.timestamp_ms,
            price: p.price,
        })
        .collect();

    Ok(PriceChart {
        dataset_label: "Price (USD)".to_string(),
        range_days,
        points,
        trend,
        min_price,
        max_price,
    })
}

/// Loads chart data for the coin/range currently on screen
///
/// Switching coin or range issues a new request; a response for an older
/// selection comes back as [`Outcome::Superseded`].
pub struct ChartLoader {
    client: MarketDataClient,
    sequencer: RequestSequencer,
}

impl ChartLoader {
    pub fn new(client: MarketDataClient) -> Self {
        Self {
            client,
            sequencer: RequestSequencer::new(),
        }
    }

    pub async fn load(&self, id: &str, range: ChartRange) -> Result<Outcome<PriceChart>, Error> {
        let ticket = self.sequencer.issue();
        let days = range.days();
        let chart = self.client.market_chart(id, days).await;

        if !self.sequencer.is_current(ticket) {
            tracing::debug!(id, days, "Chart response superseded, discarding");
            return Ok(Outcome::Superseded);
        }

        let chart = chart?;
        let series = build_series(&chart.prices, days)?;
        tracing::debug!(id, days, points = series.points.len(), "Built price chart");
        Ok(Outcome::Current(series))
    }
}
