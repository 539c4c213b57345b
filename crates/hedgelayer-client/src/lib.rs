pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use config::{Config, ConfigError, DEFAULT_API_URL};
pub use error::{ApiError, Result};
pub use types::{
    AssetType, Assessment, AssessmentListResponse, ChatMessage, ChatRequest, CreatedAssessment,
    HedgeBundle, HedgePosition, MappedMarket, Market, MarketSearchResponse, Orderbook,
    OrderbookLevel, OrderbookResponse, RiskProfile, RiskType, SlippageResult, Spread, UserProfile,
};
