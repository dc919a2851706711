//! CryptoArcade CLI
//!
//! Fetches a chart for one coin, derives the signal set and prints a
//! recommendation. Uses the hosted model when GEMINI_API_KEY is set,
//! the deterministic rule-based backend otherwise.

use anyhow::{Context, Result};
use cryptoarcade::config::AppConfig;
use cryptoarcade::market_data::{CoinGeckoClient, MarketSource, NewsClient};
use cryptoarcade::recommendation::{
    HostedModelClient, RecommendationRequest, Recommender, RuleBasedRecommender,
};
use cryptoarcade::signals::SignalEngine;
use cryptoarcade::types::{InvestmentHorizon, RiskProfile};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    info!("starting with config: {}", config.digest());

    let coin_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.app.default_coin.clone());

    let source = CoinGeckoClient::new(&config.market_data, std::env::var("COINGECKO_API_KEY").ok())?;
    let chart = source
        .market_chart(&coin_id, config.market_data.lookback_days)
        .await
        .with_context(|| format!("failed to fetch chart for {coin_id}"))?;
    let rank = source
        .coin_rank(&coin_id)
        .await
        .with_context(|| format!("failed to fetch rank for {coin_id}"))?;
    info!(
        "fetched {} price samples and {} volume samples from {}",
        chart.prices.len(),
        chart.volumes.len(),
        source.name()
    );
    if let (Some(first), Some(last)) = (chart.prices.first(), chart.prices.last()) {
        if let (Some(from), Some(to)) = (first.datetime(), last.datetime()) {
            info!("chart window: {} .. {}", from, to);
        }
    }

    let engine = SignalEngine::new(config.signals.clone());
    let signals = engine.derive(&chart, rank);
    println!("signals for {coin_id}: {signals:?}");

    let request = RecommendationRequest {
        risk_profile: RiskProfile::default(),
        investment_horizon: InvestmentHorizon::default(),
        experience_years: 1,
        preferences: String::new(),
        coin_id: coin_id.clone(),
        signals,
    };

    let recommender: Box<dyn Recommender> = match std::env::var("GEMINI_API_KEY") {
        Ok(key) => Box::new(HostedModelClient::new(&config.recommendation, key)?),
        Err(_) => {
            info!("GEMINI_API_KEY not set, using rule-based recommender");
            Box::new(RuleBasedRecommender)
        }
    };
    let response = recommender
        .generate(&request)
        .await
        .context("recommendation backend failed")?;

    println!(
        "[{}] {} | confidence {} | allocate {:.1}% | hold {} days",
        recommender.name(),
        response.risk_tier,
        response.confidence,
        response.suggested_allocation_pct,
        response.suggested_hold_days
    );
    println!("{}", response.reason_summary);

    // News is keyed by ticker symbol, so look it up in the listing
    let listing = source.top_coins(1).await.unwrap_or_default();
    if let Some(coin) = listing.iter().find(|c| c.id == coin_id) {
        let news = NewsClient::new(&config.market_data, std::env::var("CRYPTOCOMPARE_API_KEY").ok())?;
        for article in news.latest_news(&coin.symbol.to_uppercase()).await? {
            println!("news: {} ({})", article.title, article.source);
        }
    }

    Ok(())
}
