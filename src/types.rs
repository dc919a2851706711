//! Core types used throughout CryptoArcade
//!
//! Defines common data structures for market charts, derived signals
//! and user profiles.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single price sample from the market-data provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds
    pub ts: i64,
    /// Price in the quote currency (USD)
    pub price: f64,
}

/// A single traded-volume sample from the market-data provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    /// Unix timestamp in milliseconds
    pub ts: i64,
    /// Total volume over the sample interval
    pub volume: f64,
}

impl PricePoint {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.ts).single()
    }
}

/// One fetched chart window for a coin: chronologically ordered price and
/// volume series. Immutable once fetched; lives for one request cycle.
///
/// Chronological ordering is a caller guarantee, not validated here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<PricePoint>,
    pub volumes: Vec<VolumePoint>,
}

impl MarketChart {
    /// Price values only, in series order
    pub fn price_values(&self) -> Vec<f64> {
        self.prices.iter().map(|p| p.price).collect()
    }

    /// Volume values only, in series order
    pub fn volume_values(&self) -> Vec<f64> {
        self.volumes.iter().map(|v| v.volume).collect()
    }
}

/// Ordinal market-capitalization size class, derived from rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketCapBucket {
    Mega,
    Large,
    Mid,
    Small,
}

impl fmt::Display for MarketCapBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketCapBucket::Mega => write!(f, "Mega"),
            MarketCapBucket::Large => write!(f, "Large"),
            MarketCapBucket::Mid => write!(f, "Mid"),
            MarketCapBucket::Small => write!(f, "Small"),
        }
    }
}

/// The four derived features consumed by the recommendation request.
///
/// Pure output, no identity: recomputed on every call, never cached.
/// All float fields are finite and in [0, 1] for finite input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalSet {
    /// Normalized recent directional price movement
    pub momentum_score: f64,
    /// Normalized relative price dispersion over the window
    pub volatility_score: f64,
    /// Normalized excess of the latest volume over its trailing average
    pub volume_spike: f64,
    /// Size class from market-cap rank
    pub market_cap_bucket: MarketCapBucket,
}

/// User risk appetite, as captured by the recommendation form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskProfile {
    VeryLow,
    Low,
    Medium,
    High,
    SuperHigh,
}

impl Default for RiskProfile {
    fn default() -> Self {
        RiskProfile::Medium
    }
}

impl RiskProfile {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(' ', "").as_str() {
            "verylow" => Some(RiskProfile::VeryLow),
            "low" => Some(RiskProfile::Low),
            "medium" => Some(RiskProfile::Medium),
            "high" => Some(RiskProfile::High),
            "superhigh" => Some(RiskProfile::SuperHigh),
            _ => None,
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskProfile::VeryLow => write!(f, "Very Low"),
            RiskProfile::Low => write!(f, "Low"),
            RiskProfile::Medium => write!(f, "Medium"),
            RiskProfile::High => write!(f, "High"),
            RiskProfile::SuperHigh => write!(f, "Super High"),
        }
    }
}

/// How long the user intends to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestmentHorizon {
    Short,
    Medium,
    Long,
}

impl Default for InvestmentHorizon {
    fn default() -> Self {
        InvestmentHorizon::Medium
    }
}

impl InvestmentHorizon {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "short" => Some(InvestmentHorizon::Short),
            "medium" => Some(InvestmentHorizon::Medium),
            "long" => Some(InvestmentHorizon::Long),
            _ => None,
        }
    }
}

impl fmt::Display for InvestmentHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvestmentHorizon::Short => write!(f, "Short"),
            InvestmentHorizon::Medium => write!(f, "Medium"),
            InvestmentHorizon::Long => write!(f, "Long"),
        }
    }
}
