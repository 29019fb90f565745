//! Common test utilities and fixtures

#![allow(dead_code)]

use std::collections::VecDeque;

use rust_decimal::Decimal;
use tick_momentum::common::types::LatestTrade;
use tick_momentum::config::types::ApiCredentials;
use tick_momentum::{AccountSnapshot, Result};

/// Symbol used throughout the tests
pub const SYMBOL: &str = "GOOGL";

pub fn test_credentials() -> ApiCredentials {
    ApiCredentials::new("PKTESTKEY".to_string(), "test_secret".to_string())
}

/// A latest-trade print at a fixed timestamp
pub fn trade(symbol: &str, price: Decimal) -> LatestTrade {
    LatestTrade {
        symbol: symbol.to_string(),
        price,
        size: Decimal::from(100),
        timestamp: chrono::DateTime::parse_from_rfc3339("2024-01-02T15:04:05Z")
            .unwrap()
            .with_timezone(&chrono::Utc),
    }
}

pub fn funded_account() -> AccountSnapshot {
    AccountSnapshot::new(Decimal::from(1000), Decimal::from(1000))
}

pub fn empty_account() -> AccountSnapshot {
    AccountSnapshot::new(Decimal::ZERO, Decimal::ZERO)
}

/// Feed that hands out the given prices in order, one per call
pub fn price_feed(
    prices: &[Decimal],
) -> impl FnMut(&str) -> Result<LatestTrade> + Send + 'static {
    let mut queue: VecDeque<Decimal> = prices.iter().copied().collect();
    move |symbol| {
        let price = queue.pop_front().expect("price feed exhausted");
        Ok(trade(symbol, price))
    }
}

/// Seven strict increases after a starting price
pub fn rising_prices(start: i64) -> Vec<Decimal> {
    (start..=start + 7).map(Decimal::from).collect()
}

/// Sample API responses for testing
pub mod api_responses {
    pub const ACCOUNT: &str = r#"{
        "id": "904837e3-3b76-47ec-b432-046db621571b",
        "status": "ACTIVE",
        "currency": "USD",
        "buying_power": "4000.00",
        "regt_buying_power": "2000.50",
        "cash": "1000.25",
        "trading_blocked": false
    }"#;

    pub const LATEST_TRADE: &str = r#"{
        "symbol": "GOOGL",
        "trade": {
            "t": "2024-01-02T15:04:05.123456789Z",
            "x": "V",
            "p": 140.25,
            "s": 100,
            "c": ["@"],
            "i": 52983525029461,
            "z": "C"
        }
    }"#;

    pub const POSITIONS: &str = r#"[
        {"symbol": "AAPL", "qty": "3", "side": "long"},
        {"symbol": "GOOGL", "qty": "12", "side": "long", "avg_entry_price": "139.10"}
    ]"#;

    pub const ORDER_ACCEPTED: &str = r#"{
        "id": "61e69015-8549-4bfd-b9c3-01e75843f47d",
        "client_order_id": "eb9e2aaa-f71a-4f51-b5b4-52a6c565dad4",
        "status": "accepted",
        "symbol": "GOOGL",
        "qty": "7",
        "side": "buy"
    }"#;

    pub const FORBIDDEN: &str = r#"{"code": 40310000, "message": "insufficient buying power"}"#;
}
