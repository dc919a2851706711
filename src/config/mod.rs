//! Configuration management for CryptoArcade
//!
//! Loads from YAML files + environment variables via .env

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: ArcadeConfig,
    pub signals: SignalsConfig,
    pub market_data: MarketDataConfig,
    pub recommendation: RecommendationConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArcadeConfig {
    /// Build tag for logging
    pub tag: String,
    /// Default coin id when none is given
    pub default_coin: String,
}

/// Domain bounds for the signal derivation module.
///
/// These are the saturation ranges the normalizer maps onto [0, 1].
/// They are tunables, not derived values; the defaults reflect typical
/// short-window crypto behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct SignalsConfig {
    /// Net price change saturates at +/- this fraction (0.5 = +/-50%)
    pub net_change_limit: f64,
    /// Relative slope saturates at +/- this fraction
    pub slope_limit: f64,
    /// Relative stddev mapping to score 0
    pub volatility_floor: f64,
    /// Relative stddev mapping to score 1
    pub volatility_ceiling: f64,
    /// Volume ratio mapping to score 0
    pub spike_floor: f64,
    /// Volume ratio mapping to score 1 (5 = a 5x spike saturates)
    pub spike_ceiling: f64,
    /// Weight of net change in the momentum blend
    pub momentum_change_weight: f64,
    /// Weight of relative slope in the momentum blend
    pub momentum_slope_weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketDataConfig {
    /// CoinGecko-compatible API base URL
    pub coingecko_url: String,
    /// CryptoCompare API base URL (news)
    pub cryptocompare_url: String,
    /// Chart lookback window in days
    pub lookback_days: u32,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    /// Hosted text-generation endpoint
    pub model_url: String,
    /// Model identifier sent with each request
    pub model_name: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Wallet balance seeded at login
    pub initial_balance: f64,
    /// Largest single top-up accepted
    pub max_top_up: f64,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .set_default("app.tag", env!("CARGO_PKG_VERSION"))?
            .set_default("app.default_coin", "bitcoin")?
            // Signal domain defaults
            .set_default("signals.net_change_limit", 0.5)?
            .set_default("signals.slope_limit", 0.2)?
            .set_default("signals.volatility_floor", 0.01)?
            .set_default("signals.volatility_ceiling", 0.15)?
            .set_default("signals.spike_floor", 1.0)?
            .set_default("signals.spike_ceiling", 5.0)?
            .set_default("signals.momentum_change_weight", 0.6)?
            .set_default("signals.momentum_slope_weight", 0.4)?
            // Market data defaults
            .set_default("market_data.coingecko_url", "https://api.coingecko.com/api/v3")?
            .set_default(
                "market_data.cryptocompare_url",
                "https://min-api.cryptocompare.com/data/v2",
            )?
            .set_default("market_data.lookback_days", 7)?
            .set_default("market_data.timeout_ms", 10_000)?
            // Recommendation defaults
            .set_default(
                "recommendation.model_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("recommendation.model_name", "gemini-2.0-flash")?
            .set_default("recommendation.timeout_ms", 30_000)?
            // Session defaults
            .set_default("session.initial_balance", 1000.0)?
            .set_default("session.max_top_up", 10_000.0)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (ARCADE_*)
            .add_source(Environment::with_prefix("ARCADE").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Reject bound pairs that would make the normalizer degenerate
    pub fn validate(&self) -> Result<()> {
        let s = &self.signals;
        if s.volatility_ceiling <= s.volatility_floor {
            bail!("signals.volatility_ceiling must exceed signals.volatility_floor");
        }
        if s.spike_ceiling <= s.spike_floor {
            bail!("signals.spike_ceiling must exceed signals.spike_floor");
        }
        if s.net_change_limit <= 0.0 || s.slope_limit <= 0.0 {
            bail!("signal saturation limits must be positive");
        }
        let weight_sum = s.momentum_change_weight + s.momentum_slope_weight;
        if (weight_sum - 1.0).abs() > 1e-9 {
            bail!("momentum blend weights must sum to 1.0, got {weight_sum}");
        }
        Ok(())
    }

    /// Generate a digest of the config (without secrets) for logging
    pub fn digest(&self) -> String {
        format!(
            "tag={} coin={} lookback={}d model={} balance={:.0}",
            self.app.tag,
            self.app.default_coin,
            self.market_data.lookback_days,
            self.recommendation.model_name,
            self.session.initial_balance
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            net_change_limit: 0.5,
            slope_limit: 0.2,
            volatility_floor: 0.01,
            volatility_ceiling: 0.15,
            spike_floor: 1.0,
            spike_ceiling: 5.0,
            momentum_change_weight: 0.6,
            momentum_slope_weight: 0.4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_signal_bounds_match_tuning() {
        let s = SignalsConfig::default();
        assert_eq!(s.net_change_limit, 0.5);
        assert_eq!(s.slope_limit, 0.2);
        assert_eq!(s.volatility_floor, 0.01);
        assert_eq!(s.volatility_ceiling, 0.15);
        assert_eq!(s.spike_floor, 1.0);
        assert_eq!(s.spike_ceiling, 5.0);
        assert!((s.momentum_change_weight + s.momentum_slope_weight - 1.0).abs() < 1e-12);
    }
}
