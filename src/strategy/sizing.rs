use rust_decimal::Decimal;

use crate::common::errors::{Result, TradingError};
use crate::common::types::{OrderRequest, Side};
use crate::strategy::types::Intent;

/// Whole shares affordable with `buying_power` at `price`
///
/// Rounds down; fractional shares are never ordered.
pub fn buy_quantity(buying_power: Decimal, price: Decimal) -> Result<Decimal> {
    if price <= Decimal::ZERO {
        return Err(TradingError::invalid_price(price));
    }
    if buying_power <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    Ok((buying_power / price).floor())
}

/// Turn an intent into a market order
///
/// Returns `None` for `Hold` and for zero quantities, which are never sent.
pub fn size_order(intent: Intent, symbol: &str, quantity: Decimal) -> Option<OrderRequest> {
    let side = match intent {
        Intent::Buy => Side::Buy,
        Intent::SellAll => Side::Sell,
        Intent::Hold => return None,
    };
    if quantity <= Decimal::ZERO {
        return None;
    }
    Some(OrderRequest::market(symbol, side, quantity))
}
