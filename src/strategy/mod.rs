//! Strategy module for trade decision making
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TRADER LOOP (async)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  every poll interval:                                       │
//! │    - query account      (skip tick on failure)              │
//! │    - fetch latest trade (skip tick on failure)              │
//! └─────────────────────────────────────────────────────────────┘
//!        │ price, has_buying_power
//!        ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ENGINE (sync, pure)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  evaluate(TickState, price, has_buying_power)               │
//! │       → (Buy | SellAll | Hold, next TickState)              │
//! └─────────────────────────────────────────────────────────────┘
//!        │ intent
//!        ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  sizing → market GTC order → BrokerGateway                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`evaluate`]: The pure transition function
//! - [`TickState`]: Momentum state carried between ticks
//! - [`Strategy`]: Trait the trader drives
//! - [`MomentumStrategy`]: Owns a `TickState` and implements `Strategy`
//! - [`buy_quantity`] / [`size_order`]: Intent to order translation

mod engine;
mod momentum;
mod sizing;
mod traits;
mod types;

pub use engine::{evaluate, Evaluation};

pub use types::{
    Intent,
    LargeMovePolicy,
    MomentumParams,
    Position,
    PositionSource,
    Reason,
    StrategyContext,
    TickState,
};

pub use traits::Strategy;

pub use momentum::MomentumStrategy;

pub use sizing::{buy_quantity, size_order};
