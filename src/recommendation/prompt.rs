//! Prompt template for the hosted recommendation model
//!
//! Field order and wording track the recommendation modal's contract:
//! the model must answer with a JSON object matching
//! `RecommendationResponse`.

use crate::recommendation::RecommendationRequest;

/// Render the full prompt for one request.
pub fn render_prompt(request: &RecommendationRequest) -> String {
    let s = &request.signals;
    format!(
        "You are an AI-powered crypto recommendation engine. You provide \
personalized crypto recommendations based on user profile, investment \
horizon, and experience. Use the following information to formulate your \
recommendation. Always respond in a valid JSON format with exactly these \
keys: riskTier (string), confidence (number 0-100), suggestedAllocationPct \
(number), suggestedHoldDays (number), reasonSummary (string).\n\
\n\
User Risk Profile: {risk_profile}\n\
Investment Horizon: {horizon}\n\
Experience (Years): {experience}\n\
Preferences: {preferences}\n\
\n\
Coin Id: {coin_id}\n\
Market Cap Bucket: {bucket}\n\
24h Volume Spike: {volume_spike}\n\
7d Momentum Score: {momentum}\n\
Volatility Score: {volatility}\n\
\n\
Consider these factors when determining the risk tier, confidence, \
allocation, hold days, and reason summary. Always respond in a valid JSON \
format.",
        risk_profile = request.risk_profile,
        horizon = request.investment_horizon,
        experience = request.experience_years,
        preferences = request.preferences,
        coin_id = request.coin_id,
        bucket = s.market_cap_bucket,
        volume_spike = s.volume_spike,
        momentum = s.momentum_score,
        volatility = s.volatility_score,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InvestmentHorizon, MarketCapBucket, RiskProfile, SignalSet};

    #[test]
    fn prompt_carries_every_field() {
        let request = RecommendationRequest {
            risk_profile: RiskProfile::SuperHigh,
            investment_horizon: InvestmentHorizon::Long,
            experience_years: 7,
            preferences: "meme coins".to_string(),
            coin_id: "dogecoin".to_string(),
            signals: SignalSet {
                momentum_score: 0.75,
                volatility_score: 0.4,
                volume_spike: 0.9,
                market_cap_bucket: MarketCapBucket::Mid,
            },
        };

        let prompt = render_prompt(&request);
        assert!(prompt.contains("User Risk Profile: Super High"));
        assert!(prompt.contains("Investment Horizon: Long"));
        assert!(prompt.contains("Experience (Years): 7"));
        assert!(prompt.contains("Preferences: meme coins"));
        assert!(prompt.contains("Coin Id: dogecoin"));
        assert!(prompt.contains("Market Cap Bucket: Mid"));
        assert!(prompt.contains("7d Momentum Score: 0.75"));
        assert!(prompt.contains("Volatility Score: 0.4"));
        assert!(prompt.contains("24h Volume Spike: 0.9"));
    }
}
