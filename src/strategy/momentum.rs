use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::engine::evaluate;
use super::traits::Strategy;
use super::types::{Intent, MomentumParams, Position, Reason, StrategyContext, TickState};
use crate::common::errors::Result;

/// Consecutive-tick momentum strategy for a single symbol
///
/// Threads a [`TickState`] through [`evaluate`] on every tick.
#[derive(Debug, Clone)]
pub struct MomentumStrategy {
    symbol: String,
    params: MomentumParams,
    state: TickState,
}

impl MomentumStrategy {
    pub fn new(symbol: impl Into<String>, params: MomentumParams) -> Self {
        Self {
            symbol: symbol.into(),
            params,
            state: TickState::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn params(&self) -> &MomentumParams {
        &self.params
    }

    /// Current momentum state
    pub fn state(&self) -> &TickState {
        &self.state
    }

    pub fn position(&self) -> Position {
        self.state.position
    }

    fn log_reason(&self, price: Decimal, reason: Reason) {
        match reason {
            Reason::FirstTick => info!(symbol = %self.symbol, %price, "First price observed"),
            Reason::CountingUp { consecutive } => info!(
                symbol = %self.symbol,
                %price,
                consecutive,
                "Price has gone up"
            ),
            Reason::SpikeRejected => warn!(
                symbol = %self.symbol,
                %price,
                "Upward move too large to trust, not buying"
            ),
            Reason::ThresholdReached => info!(
                symbol = %self.symbol,
                %price,
                threshold = self.params.buy_threshold_ticks,
                "Consecutive upward ticks reached, buying with all buying power"
            ),
            Reason::LargeMoveEntry => info!(
                symbol = %self.symbol,
                %price,
                "Upward move outran previous drop, buying with all buying power"
            ),
            Reason::BuySuppressed => warn!(
                symbol = %self.symbol,
                %price,
                "Buy signal suppressed, no available buying power or cash"
            ),
            Reason::RisingWhileLong => info!(
                symbol = %self.symbol,
                %price,
                "Price is increasing, holding position"
            ),
            Reason::ExitOnDrop => info!(
                symbol = %self.symbol,
                %price,
                "Price has decreased, selling all shares"
            ),
            Reason::FallingWhileFlat => debug!(
                symbol = %self.symbol,
                %price,
                "Price has decreased, resetting consecutive upward ticks"
            ),
            Reason::Unchanged => debug!(symbol = %self.symbol, %price, "Price is stable"),
        }
    }
}

impl Strategy for MomentumStrategy {
    fn name(&self) -> &str {
        "tick_momentum"
    }

    fn on_tick(&mut self, price: Decimal, ctx: &StrategyContext) -> Result<Intent> {
        let mut base = self.state.clone();
        if let Some(confirmed) = ctx.confirmed_position {
            if confirmed != base.position {
                warn!(
                    symbol = %self.symbol,
                    believed = %base.position,
                    %confirmed,
                    "Position belief differs from broker, reconciling"
                );
            }
            base.reconcile_position(confirmed);
        }

        let evaluation = evaluate(&base, price, ctx.has_buying_power, &self.params)?;
        self.log_reason(price, evaluation.reason);
        self.state = evaluation.state;
        Ok(evaluation.intent)
    }

    fn on_order_failed(&mut self, intent: Intent) {
        let restored = match intent {
            Intent::Buy => Position::Flat,
            Intent::SellAll => Position::Long,
            Intent::Hold => return,
        };
        warn!(
            symbol = %self.symbol,
            %intent,
            position = %restored,
            "Order not placed, restoring position belief"
        );
        self.state.reconcile_position(restored);
    }

    fn on_register(&mut self) {
        info!(
            symbol = %self.symbol,
            threshold = self.params.buy_threshold_ticks,
            multiplier = %self.params.spike_multiplier,
            policy = ?self.params.large_move_policy,
            "Momentum strategy registered"
        );
    }

    fn on_shutdown(&mut self) {
        info!(
            symbol = %self.symbol,
            position = %self.state.position,
            "Momentum strategy stopped, state is not persisted"
        );
    }
}
