//! tick_momentum Library
//!
//! A single-asset momentum trading engine: a pure tick-by-tick decision
//! state machine, an Alpaca REST broker gateway, and the polling trader
//! that connects the two.

pub mod alpaca;
pub mod common;
pub mod config;
pub mod strategy;
pub mod trader;

// Re-export commonly used types
pub use alpaca::AlpacaRestClient;
pub use common::errors::{Result, TradingError};
pub use common::traits::BrokerGateway;
pub use common::types::{AccountSnapshot, LatestTrade, OrderAck, OrderRequest, Side, TimeInForce};
pub use config::types::AppConfig;
pub use trader::{TickOutcome, Trader, TraderSettings, TraderStats};

// Strategy types
pub use strategy::{
    evaluate, Evaluation, Intent, LargeMovePolicy, MomentumParams,
    MomentumStrategy, Position, PositionSource, Reason, Strategy, StrategyContext, TickState,
};
