//! CryptoCompare news client
//!
//! Fetches the latest articles for a coin symbol. No API key means no
//! news section, not an error, matching how the site degrades.

use crate::config::MarketDataConfig;
use crate::error::{ArcadeError, Result};
use crate::market_data::NewsArticle;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// CryptoCompare wraps every payload in a typed envelope
const SUCCESS_TYPE: u32 = 100;
const MAX_ARTICLES: usize = 4;

pub struct NewsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsEnvelope {
    #[serde(rename = "Type")]
    kind: u32,
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Data", default)]
    data: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    id: String,
    title: String,
    url: String,
    source: String,
    published_on: i64,
    body: String,
}

impl NewsClient {
    /// `api_key` comes from the caller (the binary reads
    /// CRYPTOCOMPARE_API_KEY); `None` disables fetching entirely.
    pub fn new(cfg: &MarketDataConfig, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.cryptocompare_url.clone(),
            api_key,
        })
    }

    /// Latest articles tagged with `symbol` (e.g. "BTC"), newest first.
    pub async fn latest_news(&self, symbol: &str) -> Result<Vec<NewsArticle>> {
        let Some(api_key) = &self.api_key else {
            warn!("no CryptoCompare API key configured, skipping news fetch");
            return Ok(Vec::new());
        };

        let url = format!(
            "{}/news/?lang=EN&categories={}&api_key={}",
            self.base_url, symbol, api_key
        );
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ArcadeError::Provider {
                provider: "cryptocompare",
                message: status.to_string(),
            });
        }

        let envelope: NewsEnvelope = response.json().await?;
        if envelope.kind != SUCCESS_TYPE {
            warn!(
                "CryptoCompare returned non-success type {}: {}",
                envelope.kind, envelope.message
            );
            return Ok(Vec::new());
        }

        debug!("fetched {} articles for {}", envelope.data.len(), symbol);
        Ok(envelope
            .data
            .into_iter()
            .take(MAX_ARTICLES)
            .map(|a| NewsArticle {
                id: a.id,
                title: a.title,
                url: a.url,
                source: a.source,
                published_on: a.published_on,
                body: a.body,
            })
            .collect())
    }
}
