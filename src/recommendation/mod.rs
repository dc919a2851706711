//! Recommendation layer
//!
//! Turns a user profile plus the derived signal set into a structured
//! recommendation. The hosted model sits behind the `Recommender` trait
//! so the signal core and the callers are testable without network
//! access; `RuleBasedRecommender` is the deterministic fallback used
//! when no model key is configured.

mod hosted;
mod prompt;

pub use hosted::HostedModelClient;
pub use prompt::render_prompt;

use crate::error::Result;
use crate::types::{InvestmentHorizon, MarketCapBucket, RiskProfile, SignalSet};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Everything the recommendation service needs for one coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub risk_profile: RiskProfile,
    pub investment_horizon: InvestmentHorizon,
    /// Years of crypto investing experience
    pub experience_years: u32,
    /// Free-form coin/sector preferences from the form
    pub preferences: String,
    pub coin_id: String,
    pub signals: SignalSet,
}

/// Structured reply displayed in the recommendation modal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(rename = "riskTier")]
    pub risk_tier: String,
    /// 0-100
    pub confidence: u8,
    #[serde(rename = "suggestedAllocationPct")]
    pub suggested_allocation_pct: f64,
    #[serde(rename = "suggestedHoldDays")]
    pub suggested_hold_days: u32,
    #[serde(rename = "reasonSummary")]
    pub reason_summary: String,
}

/// Trait for recommendation backends
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &'static str;

    /// Generate a recommendation for one request
    async fn generate(&self, request: &RecommendationRequest) -> Result<RecommendationResponse>;
}

/// Deterministic threshold-based backend.
///
/// Used in tests and as the fallback when no model key is configured.
/// Same request always yields the same response.
pub struct RuleBasedRecommender;

#[async_trait]
impl Recommender for RuleBasedRecommender {
    fn name(&self) -> &'static str {
        "rule_based"
    }

    async fn generate(&self, request: &RecommendationRequest) -> Result<RecommendationResponse> {
        let s = &request.signals;

        let risk_tier = match (s.market_cap_bucket, s.volatility_score) {
            (MarketCapBucket::Mega, v) if v < 0.5 => "Low",
            (MarketCapBucket::Mega, _) | (MarketCapBucket::Large, _) => "Medium",
            (MarketCapBucket::Mid, _) => "High",
            (MarketCapBucket::Small, _) => "Very High",
        };

        // Confidence rises with momentum agreement and falls with
        // dispersion; bounded away from both extremes.
        let raw = 50.0 + 30.0 * (s.momentum_score - 0.5).abs() * 2.0
            - 15.0 * s.volatility_score
            + 10.0 * s.volume_spike;
        let confidence = raw.clamp(20.0, 90.0).round() as u8;

        let base_allocation: f64 = match s.market_cap_bucket {
            MarketCapBucket::Mega => 10.0,
            MarketCapBucket::Large => 6.0,
            MarketCapBucket::Mid => 3.0,
            MarketCapBucket::Small => 1.0,
        };
        let risk_scale = match request.risk_profile {
            RiskProfile::VeryLow => 0.25,
            RiskProfile::Low => 0.5,
            RiskProfile::Medium => 1.0,
            RiskProfile::High => 1.5,
            RiskProfile::SuperHigh => 2.0,
        };
        let suggested_allocation_pct = (base_allocation * risk_scale).min(25.0);

        let suggested_hold_days = match request.investment_horizon {
            InvestmentHorizon::Short => 7,
            InvestmentHorizon::Medium => 60,
            InvestmentHorizon::Long => 365,
        };

        let direction = if s.momentum_score >= 0.5 { "positive" } else { "negative" };
        let reason_summary = format!(
            "{} is a {}-cap asset showing {} momentum ({:.2}) with volatility {:.2} and a volume spike of {:.2}.",
            request.coin_id, s.market_cap_bucket, direction, s.momentum_score,
            s.volatility_score, s.volume_spike
        );

        Ok(RecommendationResponse {
            risk_tier: risk_tier.to_string(),
            confidence,
            suggested_allocation_pct,
            suggested_hold_days,
            reason_summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(bucket: MarketCapBucket, momentum: f64) -> RecommendationRequest {
        RecommendationRequest {
            risk_profile: RiskProfile::Medium,
            investment_horizon: InvestmentHorizon::Medium,
            experience_years: 3,
            preferences: "BTC, ETH".to_string(),
            coin_id: "bitcoin".to_string(),
            signals: SignalSet {
                momentum_score: momentum,
                volatility_score: 0.3,
                volume_spike: 0.1,
                market_cap_bucket: bucket,
            },
        }
    }

    #[tokio::test]
    async fn rule_based_is_deterministic() {
        let backend = RuleBasedRecommender;
        let req = request(MarketCapBucket::Mega, 0.8);
        let a = backend.generate(&req).await.unwrap();
        let b = backend.generate(&req).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn small_caps_rank_riskier_than_mega_caps() {
        let backend = RuleBasedRecommender;
        let mega = backend
            .generate(&request(MarketCapBucket::Mega, 0.6))
            .await
            .unwrap();
        let small = backend
            .generate(&request(MarketCapBucket::Small, 0.6))
            .await
            .unwrap();
        assert_eq!(small.risk_tier, "Very High");
        assert!(small.suggested_allocation_pct < mega.suggested_allocation_pct);
        assert!(mega.confidence <= 100);
    }
}
