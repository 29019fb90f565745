//! Trait definitions for broker gateways

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::errors::Result;
use super::types::{AccountSnapshot, LatestTrade, OrderAck, OrderRequest};

/// Trait for brokerage connections (Alpaca, paper brokers, mocks)
///
/// The trader loop is the only caller. Every method is a single request;
/// retries happen by the loop trying again on its next tick.
#[async_trait]
pub trait BrokerGateway: Send + Sync {
    /// Fetch buying power and cash
    ///
    /// Fails with `TradingError::AccountQuery` when the account is unavailable.
    async fn query_account(&self) -> Result<AccountSnapshot>;

    /// Fetch the most recent trade for a symbol
    ///
    /// Fails with `TradingError::PriceFetch`, including when the feed
    /// reports a price that is not finite and positive.
    async fn get_latest_price(&self, symbol: &str) -> Result<LatestTrade>;

    /// Quantity currently held in a symbol (zero when there is no position)
    async fn get_position_qty(&self, symbol: &str) -> Result<Decimal>;

    /// Submit an order without waiting for a fill
    ///
    /// Fails with `TradingError::OrderSubmission` when the broker rejects it.
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck>;

    /// Name of the broker, for logs
    fn broker_name(&self) -> &'static str;
}
