//! Alpaca v2 REST message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response from GET /v2/account
///
/// Alpaca reports all money amounts as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub buying_power: String,
    /// Reg T buying power, preferred over `buying_power` when present
    #[serde(default)]
    pub regt_buying_power: Option<String>,
    pub cash: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub trading_blocked: Option<bool>,
}

/// Response from GET /v2/stocks/{symbol}/trades/latest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestTradeResponse {
    pub symbol: String,
    pub trade: TradeData,
}

/// A single trade print
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeData {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "p")]
    pub price: f64,
    #[serde(rename = "s", default)]
    pub size: f64,
    /// Exchange code
    #[serde(rename = "x", default)]
    pub exchange: Option<String>,
    #[serde(rename = "i", default)]
    pub trade_id: Option<u64>,
}

/// Position from GET /v2/positions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionResponse {
    pub symbol: String,
    pub qty: String,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub avg_entry_price: Option<String>,
    #[serde(default)]
    pub market_value: Option<String>,
}

/// Response from POST /v2/orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub qty: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}
