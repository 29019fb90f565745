//! Alpaca module - Broker gateway over the Alpaca v2 REST API

pub mod auth;
pub mod messages;
pub mod rest;

pub use rest::AlpacaRestClient;
