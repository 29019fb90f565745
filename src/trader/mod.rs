//! Trader module - drives a strategy against a broker gateway
//!
//! One task, one tick at a time: query the account, fetch the latest trade,
//! evaluate, place at most one order, wait for the next interval.

mod runner;

pub use runner::{TickOutcome, Trader, TraderSettings, TraderStats};
