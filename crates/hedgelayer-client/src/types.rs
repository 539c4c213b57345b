// Domain types mirrored from the Hedge Layer service.
// Only the subset needed for CLI display and API interaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskType {
    Flood,
    Hurricane,
    Wildfire,
    Earthquake,
    Storm,
    Tornado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Residential,
    Commercial,
    Vehicle,
    Other,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Residential => "residential",
            AssetType::Commercial => "commercial",
            AssetType::Vehicle => "vehicle",
            AssetType::Other => "other",
        }
    }
}

impl RiskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskType::Flood => "flood",
            RiskType::Hurricane => "hurricane",
            RiskType::Wildfire => "wildfire",
            RiskType::Earthquake => "earthquake",
            RiskType::Storm => "storm",
            RiskType::Tornado => "tornado",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub location: String,
    pub asset_type: AssetType,
    pub risk_types: Vec<RiskType>,
    pub asset_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub id: String,
    pub question: String,
    pub slug: String,
    pub condition_id: String,
    pub clob_token_ids: String,
    /// JSON-encoded two-element array of outcome prices, as served upstream
    pub outcome_prices: String,
    pub outcomes: String,
    pub volume: String,
    pub liquidity: String,
    pub end_date: String,
    pub active: bool,
    pub closed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Market {
    /// Parse the upstream `outcomePrices` string into (yes, no) prices.
    pub fn parsed_outcome_prices(&self) -> Option<(f64, f64)> {
        let parsed: Vec<Value> = serde_json::from_str(&self.outcome_prices).ok()?;
        if parsed.len() != 2 {
            return None;
        }
        let price = |v: &Value| -> Option<f64> {
            match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            }
        };
        Some((price(&parsed[0])?, price(&parsed[1])?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedMarket {
    pub market: Market,
    pub correlation_score: f64,
    pub match_reason: String,
    pub matched_risk_type: RiskType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HedgePosition {
    pub market: Market,
    pub correlation_weight: f64,
    pub yes_price: f64,
    pub position_size: f64,
    pub estimated_cost: f64,
    pub potential_payout: f64,
    pub coverage_explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage_estimate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity_depth: Option<f64>,
    #[serde(default)]
    pub was_capped: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HedgeBundle {
    pub positions: Vec<HedgePosition>,
    pub total_cost: f64,
    pub total_coverage: f64,
    pub hedge_efficiency: f64,
    pub asset_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderbookLevel {
    pub price: String,
    pub size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orderbook {
    pub bids: Vec<OrderbookLevel>,
    pub asks: Vec<OrderbookLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spread {
    pub bid: f64,
    pub ask: f64,
    pub spread: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlippageResult {
    pub avg_price: f64,
    pub worst_price: f64,
    pub slippage: f64,
    pub fillable_size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: String,
    pub user_id: String,
    pub status: String,
    pub risk_profile: Option<RiskProfile>,
    pub hedge_bundle: Option<HedgeBundle>,
    #[serde(default)]
    pub messages: Vec<Value>,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub handle: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One turn of the assessment chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Body of a streaming POST to the chat endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<String>,
}

// ============================================================================
// ENDPOINT RESPONSE ENVELOPES
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct MarketSearchResponse {
    pub markets: Vec<Market>,
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderbookResponse {
    pub book: Orderbook,
    pub spread: Option<Spread>,
    pub ask_depth: f64,
    pub slippage: Option<SlippageResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentListResponse {
    pub assessments: Vec<Assessment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedAssessment {
    pub id: String,
}
