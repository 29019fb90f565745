//! Broker-facing types shared by the gateway and the trader loop

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::{Result, TradingError};

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
}

/// How long an order stays working at the broker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Good-till-canceled
    Gtc,
}

/// Latest trade print for a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestTrade {
    pub symbol: String,
    pub price: Decimal,
    /// Shares in the print (may be zero if not reported)
    pub size: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Account facts the trader needs each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub buying_power: Decimal,
    pub cash: Decimal,
}

impl AccountSnapshot {
    pub fn new(buying_power: Decimal, cash: Decimal) -> Self {
        Self { buying_power, cash }
    }

    /// True when the account can fund a purchase at all
    pub fn has_buying_power(&self) -> bool {
        self.buying_power > Decimal::ZERO && self.cash > Decimal::ZERO
    }
}

/// A market order ready to be sent to the broker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub qty: Decimal,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
}

impl OrderRequest {
    /// Market order, good-till-canceled
    pub fn market(symbol: impl Into<String>, side: Side, qty: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            qty,
            side,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Gtc,
        }
    }
}

/// Broker acknowledgement of a submitted order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAck {
    pub id: String,
    pub status: String,
}

/// Convert a raw feed price into a decimal price.
///
/// NaN, infinities and non-positive values are rejected with `InvalidPrice`.
pub fn price_from_f64(raw: f64) -> Result<Decimal> {
    if !raw.is_finite() {
        return Err(TradingError::InvalidPrice(format!(
            "price must be finite, got {}",
            raw
        )));
    }
    let price = Decimal::from_f64(raw)
        .ok_or_else(|| TradingError::InvalidPrice(format!("unrepresentable price {}", raw)))?;
    if price <= Decimal::ZERO {
        return Err(TradingError::invalid_price(price));
    }
    Ok(price.normalize())
}
