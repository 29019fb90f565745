//! Tick-by-tick momentum transition function
//!
//! `evaluate` is pure: it takes the previous [`TickState`], one price and the
//! buying power fact, and returns the intent together with the next state.
//! Rules are checked in a fixed order and the first match wins:
//!
//! 1. first tick: remember the price, hold
//! 2. upward tick: count toward the buy threshold while flat, track the
//!    move size while long
//! 3. downward tick: exit if long, reset the counter, remember the drop
//! 4. unchanged price: hold

use std::cmp::Ordering;

use rust_decimal::Decimal;

use super::types::{Intent, LargeMovePolicy, MomentumParams, Position, Reason, TickState};
use crate::common::errors::{Result, TradingError};

/// Outcome of evaluating one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub intent: Intent,
    pub reason: Reason,
    pub state: TickState,
}

impl Evaluation {
    pub fn into_parts(self) -> (Intent, TickState) {
        (self.intent, self.state)
    }
}

/// Evaluate one tick against the previous state.
///
/// `has_buying_power = false` turns a due buy into a hold while leaving the
/// momentum bookkeeping exactly as if the buy had fired (counter reset,
/// upward change recorded); only the position stays flat.
///
/// Returns `TradingError::InvalidPrice` for a non-positive price; the
/// previous state is then left as it was.
pub fn evaluate(
    state: &TickState,
    current_price: Decimal,
    has_buying_power: bool,
    params: &MomentumParams,
) -> Result<Evaluation> {
    if current_price <= Decimal::ZERO {
        return Err(TradingError::invalid_price(current_price));
    }

    let mut next = state.clone();

    let Some(last_price) = state.last_price else {
        next.last_price = Some(current_price);
        return Ok(Evaluation {
            intent: Intent::Hold,
            reason: Reason::FirstTick,
            state: next,
        });
    };

    let (intent, reason) = match current_price.cmp(&last_price) {
        Ordering::Greater => {
            on_upward_tick(&mut next, current_price - last_price, has_buying_power, params)
        }
        Ordering::Less => on_downward_tick(&mut next, last_price - current_price),
        Ordering::Equal => (Intent::Hold, Reason::Unchanged),
    };

    next.last_price = Some(current_price);

    Ok(Evaluation {
        intent,
        reason,
        state: next,
    })
}

fn on_upward_tick(
    state: &mut TickState,
    change: Decimal,
    has_buying_power: bool,
    params: &MomentumParams,
) -> (Intent, Reason) {
    if state.position == Position::Long {
        state.last_upward_change = Some(change);
        return (Intent::Hold, Reason::RisingWhileLong);
    }

    state.consecutive_upward_ticks += 1;

    if state.consecutive_upward_ticks >= params.buy_threshold_ticks {
        return enter_long(state, change, has_buying_power, Reason::ThresholdReached);
    }

    let multiplier = params.spike_multiplier;
    match params.large_move_policy {
        LargeMovePolicy::Reject => {
            let spike_over_rise = state
                .last_upward_change
                .is_some_and(|prev| exceeds(change, prev, multiplier));
            let spike_over_drop = state
                .last_downward_change
                .is_some_and(|prev| exceeds(change, prev, multiplier));
            if spike_over_rise || spike_over_drop {
                return (Intent::Hold, Reason::SpikeRejected);
            }
        }
        LargeMovePolicy::EarlyEntry => {
            let outruns_drop = state
                .last_downward_change
                .is_some_and(|prev| reaches(change, prev, multiplier));
            if outruns_drop {
                return enter_long(state, change, has_buying_power, Reason::LargeMoveEntry);
            }
        }
    }

    (
        Intent::Hold,
        Reason::CountingUp {
            consecutive: state.consecutive_upward_ticks,
        },
    )
}

/// `change > prev * multiplier`; a scaled baseline past `Decimal::MAX`
/// cannot be exceeded.
fn exceeds(change: Decimal, prev: Decimal, multiplier: Decimal) -> bool {
    prev.checked_mul(multiplier).is_some_and(|baseline| change > baseline)
}

/// `change >= prev * multiplier`, with the same overflow rule as [`exceeds`]
fn reaches(change: Decimal, prev: Decimal, multiplier: Decimal) -> bool {
    prev.checked_mul(multiplier).is_some_and(|baseline| change >= baseline)
}

fn enter_long(
    state: &mut TickState,
    change: Decimal,
    has_buying_power: bool,
    reason: Reason,
) -> (Intent, Reason) {
    state.consecutive_upward_ticks = 0;
    state.last_upward_change = Some(change);

    if !has_buying_power {
        return (Intent::Hold, Reason::BuySuppressed);
    }

    state.position = Position::Long;
    (Intent::Buy, reason)
}

fn on_downward_tick(state: &mut TickState, change: Decimal) -> (Intent, Reason) {
    let outcome = match state.position {
        Position::Long => {
            state.position = Position::Flat;
            (Intent::SellAll, Reason::ExitOnDrop)
        }
        Position::Flat => (Intent::Hold, Reason::FallingWhileFlat),
    };

    state.consecutive_upward_ticks = 0;
    state.last_downward_change = Some(change);
    state.last_upward_change = None;

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn run(prices: &[Decimal], has_buying_power: bool) -> (Vec<Intent>, TickState) {
        run_with(TickState::new(), prices, has_buying_power, &MomentumParams::default())
    }

    fn run_with(
        mut state: TickState,
        prices: &[Decimal],
        has_buying_power: bool,
        params: &MomentumParams,
    ) -> (Vec<Intent>, TickState) {
        let mut intents = Vec::new();
        for price in prices {
            let (intent, next) = evaluate(&state, *price, has_buying_power, params)
                .unwrap()
                .into_parts();
            intents.push(intent);
            state = next;
        }
        (intents, state)
    }

    fn rising_eight() -> Vec<Decimal> {
        (100..=107).map(Decimal::from).collect()
    }

    #[test]
    fn test_first_tick_holds_and_records_price() {
        let (intents, state) = run(&[dec!(100)], true);
        assert_eq!(intents, vec![Intent::Hold]);
        assert_eq!(
            state,
            TickState {
                last_price: Some(dec!(100)),
                ..TickState::default()
            }
        );
    }

    #[test]
    fn test_seventh_consecutive_rise_buys() {
        let (intents, state) = run(&rising_eight(), true);
        assert_eq!(&intents[..7], &[Intent::Hold; 7]);
        assert_eq!(intents[7], Intent::Buy);
        assert_eq!(state.position, Position::Long);
        assert_eq!(state.consecutive_upward_ticks, 0);
        assert_eq!(state.last_upward_change, Some(dec!(1)));
        assert_eq!(state.last_price, Some(dec!(107)));
    }

    #[test]
    fn test_drop_while_long_sells_all() {
        let state = TickState {
            last_price: Some(dec!(109)),
            position: Position::Long,
            last_upward_change: Some(dec!(1)),
            ..TickState::default()
        };
        let (intents, state) =
            run_with(state, &[dec!(110), dec!(108)], true, &MomentumParams::default());
        assert_eq!(intents, vec![Intent::Hold, Intent::SellAll]);
        assert_eq!(state.position, Position::Flat);
        assert_eq!(state.last_downward_change, Some(dec!(2)));
        assert_eq!(state.last_upward_change, None);
        assert_eq!(state.consecutive_upward_ticks, 0);
    }

    #[test]
    fn test_rise_while_long_tracks_upward_change() {
        let state = TickState {
            last_price: Some(dec!(100)),
            position: Position::Long,
            ..TickState::default()
        };
        let eval = evaluate(&state, dec!(103.5), true, &MomentumParams::default()).unwrap();
        assert_eq!(eval.intent, Intent::Hold);
        assert_eq!(eval.reason, Reason::RisingWhileLong);
        assert_eq!(eval.state.last_upward_change, Some(dec!(3.5)));
        assert_eq!(eval.state.consecutive_upward_ticks, 0);
    }

    #[test]
    fn test_no_buying_power_suppresses_buy_but_resets_counter() {
        let (intents, state) = run(&rising_eight(), false);
        assert_eq!(intents, vec![Intent::Hold; 8]);
        assert_eq!(state.position, Position::Flat);
        assert_eq!(state.consecutive_upward_ticks, 0);
        assert_eq!(state.last_upward_change, Some(dec!(1)));
    }

    #[test]
    fn test_suppressed_buy_reason() {
        let state = TickState {
            last_price: Some(dec!(100)),
            consecutive_upward_ticks: 6,
            ..TickState::default()
        };
        let eval = evaluate(&state, dec!(101), false, &MomentumParams::default()).unwrap();
        assert_eq!(eval.intent, Intent::Hold);
        assert_eq!(eval.reason, Reason::BuySuppressed);
    }

    #[test]
    fn test_drop_while_flat_resets_counter() {
        let (intents, state) = run(&[dec!(100), dec!(101), dec!(102), dec!(99)], true);
        assert_eq!(intents, vec![Intent::Hold; 4]);
        assert_eq!(state.consecutive_upward_ticks, 0);
        assert_eq!(state.last_downward_change, Some(dec!(3)));
        assert_eq!(state.last_upward_change, None);
    }

    #[test]
    fn test_spike_over_last_drop_is_rejected_but_counted() {
        // drop of 1, then a rise of 3 (> 2 x 1)
        let eval_state = TickState {
            last_price: Some(dec!(100)),
            last_downward_change: Some(dec!(1)),
            ..TickState::default()
        };
        let eval = evaluate(&eval_state, dec!(103), true, &MomentumParams::default()).unwrap();
        assert_eq!(eval.intent, Intent::Hold);
        assert_eq!(eval.reason, Reason::SpikeRejected);
        assert_eq!(eval.state.consecutive_upward_ticks, 1);
        assert_eq!(eval.state.last_upward_change, None);
    }

    #[test]
    fn test_spike_over_last_rise_is_rejected() {
        let state = TickState {
            last_price: Some(dec!(100)),
            consecutive_upward_ticks: 2,
            last_upward_change: Some(dec!(0.5)),
            ..TickState::default()
        };
        let eval = evaluate(&state, dec!(101.5), true, &MomentumParams::default()).unwrap();
        assert_eq!(eval.reason, Reason::SpikeRejected);
        assert_eq!(eval.state.consecutive_upward_ticks, 3);
    }

    #[test]
    fn test_exactly_double_is_not_a_spike() {
        let state = TickState {
            last_price: Some(dec!(100)),
            last_downward_change: Some(dec!(1)),
            ..TickState::default()
        };
        let eval = evaluate(&state, dec!(102), true, &MomentumParams::default()).unwrap();
        assert_eq!(eval.reason, Reason::CountingUp { consecutive: 1 });
    }

    #[test]
    fn test_threshold_wins_over_spike_rejection() {
        let state = TickState {
            last_price: Some(dec!(100)),
            consecutive_upward_ticks: 6,
            last_downward_change: Some(dec!(0.1)),
            ..TickState::default()
        };
        let eval = evaluate(&state, dec!(105), true, &MomentumParams::default()).unwrap();
        assert_eq!(eval.intent, Intent::Buy);
        assert_eq!(eval.reason, Reason::ThresholdReached);
    }

    #[test]
    fn test_early_entry_policy_buys_on_large_rise() {
        let params = MomentumParams {
            large_move_policy: LargeMovePolicy::EarlyEntry,
            ..MomentumParams::default()
        };
        let state = TickState {
            last_price: Some(dec!(100)),
            consecutive_upward_ticks: 1,
            last_downward_change: Some(dec!(1)),
            ..TickState::default()
        };
        let eval = evaluate(&state, dec!(102), true, &params).unwrap();
        assert_eq!(eval.intent, Intent::Buy);
        assert_eq!(eval.reason, Reason::LargeMoveEntry);
        assert_eq!(eval.state.position, Position::Long);
        assert_eq!(eval.state.consecutive_upward_ticks, 0);
        assert_eq!(eval.state.last_upward_change, Some(dec!(2)));
    }

    #[test]
    fn test_early_entry_policy_never_rejects() {
        let params = MomentumParams {
            large_move_policy: LargeMovePolicy::EarlyEntry,
            ..MomentumParams::default()
        };
        let state = TickState {
            last_price: Some(dec!(100)),
            last_upward_change: Some(dec!(0.1)),
            ..TickState::default()
        };
        let eval = evaluate(&state, dec!(101), true, &params).unwrap();
        assert_eq!(eval.intent, Intent::Hold);
        assert_eq!(eval.reason, Reason::CountingUp { consecutive: 1 });
    }

    #[test]
    fn test_unchanged_price_changes_nothing() {
        let state = TickState {
            last_price: Some(dec!(100)),
            position: Position::Long,
            consecutive_upward_ticks: 0,
            last_upward_change: Some(dec!(1)),
            last_downward_change: Some(dec!(2)),
        };
        let eval = evaluate(&state, dec!(100), true, &MomentumParams::default()).unwrap();
        assert_eq!(eval.intent, Intent::Hold);
        assert_eq!(eval.reason, Reason::Unchanged);
        assert_eq!(eval.state, state);
    }

    #[test]
    fn test_invalid_price_is_rejected() {
        let state = TickState {
            last_price: Some(dec!(100)),
            ..TickState::default()
        };
        for bad in [dec!(0), dec!(-5)] {
            let err = evaluate(&state, bad, true, &MomentumParams::default()).unwrap_err();
            assert!(matches!(err, TradingError::InvalidPrice(_)));
        }
    }

    #[test]
    fn test_custom_threshold() {
        let params = MomentumParams {
            buy_threshold_ticks: 3,
            ..MomentumParams::default()
        };
        let prices = [dec!(10), dec!(11), dec!(12), dec!(13)];
        let (intents, state) = run_with(TickState::new(), &prices, true, &params);
        assert_eq!(
            intents,
            vec![Intent::Hold, Intent::Hold, Intent::Hold, Intent::Buy]
        );
        assert_eq!(state.position, Position::Long);
    }

    #[test]
    fn test_huge_drop_then_rise_does_not_overflow() {
        let prices = [dec!(70000000000000000000000000000), dec!(1), dec!(2)];

        for policy in [LargeMovePolicy::Reject, LargeMovePolicy::EarlyEntry] {
            let params = MomentumParams {
                large_move_policy: policy,
                ..MomentumParams::default()
            };
            let (intents, state) = run_with(TickState::new(), &prices, true, &params);

            assert_eq!(intents, vec![Intent::Hold; 3]);
            assert_eq!(state.consecutive_upward_ticks, 1);
            assert_eq!(state.position, Position::Flat);
        }
    }

    #[test]
    fn test_huge_multiplier_is_never_a_spike() {
        let params = MomentumParams {
            spike_multiplier: Decimal::MAX,
            ..MomentumParams::default()
        };
        let state = run_with(TickState::new(), &[dec!(100), dec!(98)], true, &params).1;

        let eval = evaluate(&state, dec!(99), true, &params).unwrap();
        assert_eq!(eval.reason, Reason::CountingUp { consecutive: 1 });
    }
}
