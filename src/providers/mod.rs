//! Fetch client implementations

pub mod coingecko;

pub use coingecko::CoinGeckoClient;
