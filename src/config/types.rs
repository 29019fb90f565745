//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::common::errors::{Result, TradingError};
use crate::strategy::{LargeMovePolicy, MomentumParams, PositionSource};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Alpaca brokerage configuration
    #[serde(default)]
    pub alpaca: AlpacaConfig,
    /// Momentum strategy configuration
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

impl AppConfig {
    /// Canonical form for values that may come from several sources
    pub fn normalize(&mut self) {
        self.strategy.symbol = self.strategy.symbol.trim().to_uppercase();
        self.settings.log_level = self.settings.log_level.trim().to_string();
    }

    /// Reject configurations the trader cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.alpaca.api_key.as_deref().unwrap_or("").is_empty()
            || self.alpaca.api_secret.as_deref().unwrap_or("").is_empty()
        {
            return Err(TradingError::Configuration(
                "Alpaca API key and secret are required".to_string(),
            ));
        }
        for (name, value) in [
            ("trading_url", &self.alpaca.trading_url),
            ("data_url", &self.alpaca.data_url),
        ] {
            Url::parse(value).map_err(|e| {
                TradingError::Configuration(format!("Invalid alpaca.{} '{}': {}", name, value, e))
            })?;
        }

        self.strategy.validate()?;

        if self.settings.poll_interval_ms == 0 {
            return Err(TradingError::Configuration(
                "settings.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Alpaca brokerage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlpacaConfig {
    /// API key ID
    #[serde(default)]
    pub api_key: Option<String>,
    /// API secret key
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Base URL for the trading API (account, positions, orders)
    #[serde(default = "default_alpaca_trading_url")]
    pub trading_url: String,
    /// Base URL for the market data API
    #[serde(default = "default_alpaca_data_url")]
    pub data_url: String,
}

impl AlpacaConfig {
    /// API credentials, if both halves are present
    pub fn credentials(&self) -> Option<ApiCredentials> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) => Some(ApiCredentials::new(key.clone(), secret.clone())),
            _ => None,
        }
    }
}

impl Default for AlpacaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            trading_url: default_alpaca_trading_url(),
            data_url: default_alpaca_data_url(),
        }
    }
}

fn default_alpaca_trading_url() -> String {
    "https://paper-api.alpaca.markets".to_string()
}

fn default_alpaca_data_url() -> String {
    "https://data.alpaca.markets".to_string()
}

/// Momentum strategy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// The single instrument to trade
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Consecutive upward ticks required before buying
    #[serde(default = "default_buy_threshold_ticks")]
    pub buy_threshold_ticks: u32,
    /// Multiple of the previous move that marks an upward move as a spike
    #[serde(default = "default_spike_multiplier")]
    pub spike_multiplier: Decimal,
    /// What an outsized upward move does while flat
    #[serde(default)]
    pub large_move_policy: LargeMovePolicy,
    /// Where the engine takes its position from
    #[serde(default)]
    pub position_source: PositionSource,
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(TradingError::Configuration(
                "strategy.symbol must not be empty".to_string(),
            ));
        }
        if self.buy_threshold_ticks == 0 {
            return Err(TradingError::Configuration(
                "strategy.buy_threshold_ticks must be at least 1".to_string(),
            ));
        }
        if self.spike_multiplier <= Decimal::ZERO {
            return Err(TradingError::Configuration(format!(
                "strategy.spike_multiplier must be positive, got {}",
                self.spike_multiplier
            )));
        }
        Ok(())
    }

    /// Engine parameters derived from this configuration
    pub fn params(&self) -> MomentumParams {
        MomentumParams {
            buy_threshold_ticks: self.buy_threshold_ticks,
            spike_multiplier: self.spike_multiplier,
            large_move_policy: self.large_move_policy,
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            buy_threshold_ticks: default_buy_threshold_ticks(),
            spike_multiplier: default_spike_multiplier(),
            large_move_policy: LargeMovePolicy::default(),
            position_source: PositionSource::default(),
        }
    }
}

fn default_symbol() -> String {
    "GOOGL".to_string()
}

fn default_buy_threshold_ticks() -> u32 {
    7
}

fn default_spike_multiplier() -> Decimal {
    dec!(2)
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// File that receives a copy of all log output
    #[serde(default = "default_log_file")]
    pub log_file: Option<String>,
    /// Delay between ticks in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Sell any existing position before the first tick
    #[serde(default = "default_liquidate_on_startup")]
    pub liquidate_on_startup: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: default_log_file(),
            poll_interval_ms: default_poll_interval(),
            request_timeout_seconds: default_request_timeout(),
            liquidate_on_startup: default_liquidate_on_startup(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> Option<String> {
    Some("trading_bot.log".to_string())
}

fn default_poll_interval() -> u64 {
    500
}

fn default_request_timeout() -> u64 {
    30
}

fn default_liquidate_on_startup() -> bool {
    true
}

/// API credentials for authenticated requests
#[derive(Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl ApiCredentials {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
