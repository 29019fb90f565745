use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The engine's belief about what it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Flat,
    Long,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Flat => write!(f, "flat"),
            Position::Long => write!(f, "long"),
        }
    }
}

/// Trading intent emitted for a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Buy with all available buying power
    Buy,
    /// Sell the whole position
    SellAll,
    Hold,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Buy => write!(f, "BUY"),
            Intent::SellAll => write!(f, "SELL_ALL"),
            Intent::Hold => write!(f, "HOLD"),
        }
    }
}

/// Why the engine chose its intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// No previous price to compare against
    FirstTick,
    /// Upward tick counted toward the buy threshold
    CountingUp { consecutive: u32 },
    /// Upward move too large relative to the previous move
    SpikeRejected,
    /// Buy threshold of consecutive upward ticks reached
    ThresholdReached,
    /// Upward move at least `spike_multiplier` times the last drop (early entry policy)
    LargeMoveEntry,
    /// A buy was due but the account has no buying power
    BuySuppressed,
    /// Price rose while holding
    RisingWhileLong,
    /// Price fell while holding
    ExitOnDrop,
    /// Price fell while flat
    FallingWhileFlat,
    /// Price unchanged
    Unchanged,
}

/// What an anomalously large upward move means while flat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LargeMovePolicy {
    /// Hold: the spike is not trusted as momentum
    #[default]
    Reject,
    /// Buy immediately when the move is at least `spike_multiplier` times
    /// the last downward move
    EarlyEntry,
}

/// Where the engine's position comes from each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    /// Track the position from emitted intents only
    #[default]
    Belief,
    /// Overwrite the belief with the broker-reported holding before each tick
    Broker,
}

/// Tunable constants of the momentum rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumParams {
    pub buy_threshold_ticks: u32,
    pub spike_multiplier: Decimal,
    pub large_move_policy: LargeMovePolicy,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            buy_threshold_ticks: 7,
            spike_multiplier: dec!(2),
            large_move_policy: LargeMovePolicy::Reject,
        }
    }
}

/// Momentum state carried from one tick to the next
///
/// Created once at startup and never persisted; a restart forgets all
/// momentum history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickState {
    /// Price seen on the previous tick
    pub last_price: Option<Decimal>,
    pub position: Position,
    /// Upward ticks in a row while flat, reset by any drop or buy
    pub consecutive_upward_ticks: u32,
    /// Size of the most recent upward move, cleared by any drop
    pub last_upward_change: Option<Decimal>,
    /// Size of the most recent downward move
    pub last_downward_change: Option<Decimal>,
}

impl TickState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the position belief with a confirmed one.
    ///
    /// Becoming long resets the upward tick counter.
    pub fn reconcile_position(&mut self, confirmed: Position) {
        if self.position == Position::Flat && confirmed == Position::Long {
            self.consecutive_upward_ticks = 0;
        }
        self.position = confirmed;
    }
}

/// Per-tick facts supplied by the trader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrategyContext {
    /// True iff the account has buying power and cash
    pub has_buying_power: bool,
    /// Broker-confirmed position, when the trader reconciles against the broker
    pub confirmed_position: Option<Position>,
}

impl StrategyContext {
    pub fn new(has_buying_power: bool) -> Self {
        Self {
            has_buying_power,
            confirmed_position: None,
        }
    }

    pub fn with_confirmed_position(mut self, position: Position) -> Self {
        self.confirmed_position = Some(position);
        self
    }
}
