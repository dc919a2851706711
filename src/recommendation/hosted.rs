//! Hosted text-generation backend
//!
//! Sends the rendered prompt to a Gemini-style generateContent endpoint
//! and parses the JSON object out of the model's reply. Model output is
//! untrusted: ranges are clamped before the response reaches a caller.

use crate::config::RecommendationConfig;
use crate::error::{ArcadeError, Result};
use crate::recommendation::{render_prompt, RecommendationRequest, RecommendationResponse, Recommender};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub struct HostedModelClient {
    client: reqwest::Client,
    base_url: String,
    model_name: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateBody {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateReply {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ReplyContent,
}

#[derive(Debug, Deserialize)]
struct ReplyContent {
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: String,
}

impl HostedModelClient {
    pub fn new(cfg: &RecommendationConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.model_url.clone(),
            model_name: cfg.model_name.clone(),
            api_key,
        })
    }

    /// Pull the JSON object out of the reply text. Models wrap payloads
    /// in markdown fences or prose, so scan for the outermost braces.
    fn extract_json(text: &str) -> Result<Value> {
        let start = text.find('{');
        let end = text.rfind('}');
        match (start, end) {
            (Some(start), Some(end)) if end > start => {
                Ok(serde_json::from_str(&text[start..=end])?)
            }
            _ => Err(ArcadeError::Model(format!(
                "no JSON object in model reply: {text}"
            ))),
        }
    }

    fn parse_response(value: Value) -> Result<RecommendationResponse> {
        let mut response: RecommendationResponse = serde_json::from_value(value)?;
        // confidence is already u8-bounded by the type; keep the rest sane
        response.suggested_allocation_pct = response.suggested_allocation_pct.clamp(0.0, 100.0);
        if response.confidence > 100 {
            response.confidence = 100;
        }
        Ok(response)
    }
}

#[async_trait]
impl Recommender for HostedModelClient {
    fn name(&self) -> &'static str {
        "hosted_model"
    }

    async fn generate(&self, request: &RecommendationRequest) -> Result<RecommendationResponse> {
        let prompt = render_prompt(request);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model_name, self.api_key
        );
        let body = GenerateBody {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!("requesting recommendation for {}", request.coin_id);
        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("model endpoint returned {}: {}", status, text);
            return Err(ArcadeError::Model(format!("{status}: {text}")));
        }

        let reply: GenerateReply = response.json().await?;
        let text = reply
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| ArcadeError::Model("empty model reply".to_string()))?;

        let parsed = Self::extract_json(text)?;
        Self::parse_response(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_from_fenced_reply() {
        let text = "Here you go:\n```json\n{\"riskTier\":\"Low\",\"confidence\":72,\
\"suggestedAllocationPct\":8.5,\"suggestedHoldDays\":90,\
\"reasonSummary\":\"steady mega-cap\"}\n```";
        let value = HostedModelClient::extract_json(text).unwrap();
        let response = HostedModelClient::parse_response(value).unwrap();
        assert_eq!(response.risk_tier, "Low");
        assert_eq!(response.confidence, 72);
        assert_eq!(response.suggested_hold_days, 90);
    }

    #[test]
    fn reply_without_json_is_a_model_error() {
        let err = HostedModelClient::extract_json("I cannot help with that").unwrap_err();
        assert!(matches!(err, ArcadeError::Model(_)));
    }

    #[test]
    fn allocation_outside_range_is_clamped() {
        let value: Value = serde_json::json!({
            "riskTier": "High",
            "confidence": 88,
            "suggestedAllocationPct": 250.0,
            "suggestedHoldDays": 14,
            "reasonSummary": "overenthusiastic model"
        });
        let response = HostedModelClient::parse_response(value).unwrap();
        assert_eq!(response.suggested_allocation_pct, 100.0);
    }
}
