//! Market data clients (CoinGecko prices/charts, CryptoCompare news)
//!
//! Everything the signal engine consumes comes in through the
//! `MarketSource` trait so the core stays testable without network
//! access. Fetch failures surface to the caller; nothing here retries.

mod coingecko;
mod news;

pub use coingecko::CoinGeckoClient;
pub use news::NewsClient;

use crate::error::Result;
use crate::types::MarketChart;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One row of the market listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinSummary {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    /// 1 = largest capitalization; the provider omits rank for coins
    /// it cannot size
    pub market_cap_rank: Option<u32>,
    pub price_change_percentage_24h: Option<f64>,
    pub total_volume: f64,
}

/// A news article attached to a coin detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_on: i64,
    pub body: String,
}

/// Trait for market-data providers
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Fetch one page of the market listing, ordered by market cap
    async fn top_coins(&self, page: u32) -> Result<Vec<CoinSummary>>;

    /// Fetch the price/volume chart for a coin over a lookback window
    async fn market_chart(&self, coin_id: &str, days: u32) -> Result<MarketChart>;

    /// Fetch the market-cap rank for a coin
    async fn coin_rank(&self, coin_id: &str) -> Result<u32>;
}
