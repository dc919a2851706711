//! CoinGecko REST client
//!
//! Listing, chart and rank lookups against the public CoinGecko v3 API.

use crate::config::MarketDataConfig;
use crate::error::{ArcadeError, Result};
use crate::market_data::{CoinSummary, MarketSource};
use crate::types::{MarketChart, PricePoint, VolumePoint};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const COINS_PER_PAGE: u32 = 50;

pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Raw chart payload: `[timestamp_ms, value]` pair arrays
#[derive(Debug, Deserialize)]
struct ChartResponse {
    prices: Vec<(i64, f64)>,
    total_volumes: Vec<(i64, f64)>,
}

#[derive(Debug, Deserialize)]
struct CoinDetailResponse {
    market_cap_rank: Option<u32>,
}

impl CoinGeckoClient {
    /// `api_key` comes from the caller (the binary reads
    /// COINGECKO_API_KEY); the public API works without one at lower
    /// rate limits.
    pub fn new(cfg: &MarketDataConfig, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.coingecko_url.clone(),
            api_key,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("CoinGecko returned {}: {}", status, body);
            return Err(ArcadeError::Provider {
                provider: "coingecko",
                message: format!("{status}: {body}"),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MarketSource for CoinGeckoClient {
    fn name(&self) -> &'static str {
        "coingecko"
    }

    async fn top_coins(&self, page: u32) -> Result<Vec<CoinSummary>> {
        let query = format!(
            "/coins/markets?vs_currency=usd&order=market_cap_desc&per_page={}&page={}&price_change_percentage=24h",
            COINS_PER_PAGE, page
        );
        let coins: Vec<CoinSummary> = self.get_json(&query).await?;
        debug!("fetched {} coins (page {})", coins.len(), page);
        Ok(coins)
    }

    async fn market_chart(&self, coin_id: &str, days: u32) -> Result<MarketChart> {
        let query = format!("/coins/{coin_id}/market_chart?vs_currency=usd&days={days}");
        let raw: ChartResponse = self.get_json(&query).await?;

        Ok(MarketChart {
            prices: raw
                .prices
                .into_iter()
                .map(|(ts, price)| PricePoint { ts, price })
                .collect(),
            volumes: raw
                .total_volumes
                .into_iter()
                .map(|(ts, volume)| VolumePoint { ts, volume })
                .collect(),
        })
    }

    async fn coin_rank(&self, coin_id: &str) -> Result<u32> {
        let query = format!(
            "/coins/{coin_id}?localization=false&tickers=false&market_data=true&community_data=false&developer_data=false"
        );
        let detail: CoinDetailResponse = self.get_json(&query).await?;
        // Unranked coins are treated as deep small-caps
        Ok(detail.market_cap_rank.unwrap_or(u32::MAX))
    }
}
