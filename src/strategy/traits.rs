use rust_decimal::Decimal;

use crate::common::errors::Result;
use crate::strategy::types::{Intent, StrategyContext};

/// Core strategy trait
///
/// Strategies receive one price per tick and emit an [`Intent`].
/// They own their momentum state and read account facts from the
/// provided context.
///
/// # Implementation Notes
///
/// - `on_tick` must not block or do I/O; the trader fetches everything first
/// - Calls must be serialized: a strategy is not safe for concurrent ticks
/// - Order sizing is handled separately by the trader
pub trait Strategy: Send + Sync {
    /// Unique identifier for this strategy
    fn name(&self) -> &str;

    /// Called with each new trade price
    ///
    /// # Returns
    /// * `Ok(Intent::Hold)` - No action
    /// * `Ok(Intent::Buy)` / `Ok(Intent::SellAll)` - Submit an order
    /// * `Err(TradingError::InvalidPrice)` - The price broke the contract;
    ///   no state was changed
    fn on_tick(&mut self, price: Decimal, ctx: &StrategyContext) -> Result<Intent>;

    /// Called when the order for `intent` was not placed
    ///
    /// Default implementation does nothing.
    fn on_order_failed(&mut self, _intent: Intent) {}

    /// Called once before the first tick
    fn on_register(&mut self) {}

    /// Called when the trader is shutting down
    fn on_shutdown(&mut self) {}
}
