//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::{Result, TradingError};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. `APCA_API_KEY_ID` / `APCA_API_SECRET_KEY` for credentials
/// 2. Environment variables (prefixed with APP_, sections split by `__`)
/// 3. Configuration file (TOML format)
/// 4. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    // Alpaca's own env var names, as used by its SDKs
    if let Ok(key) = std::env::var("APCA_API_KEY_ID") {
        builder = builder
            .set_override("alpaca.api_key", key)
            .map_err(|e| TradingError::Configuration(e.to_string()))?;
    }
    if let Ok(secret) = std::env::var("APCA_API_SECRET_KEY") {
        builder = builder
            .set_override("alpaca.api_secret", secret)
            .map_err(|e| TradingError::Configuration(e.to_string()))?;
    }

    let config = builder
        .build()
        .map_err(|e| TradingError::Configuration(e.to_string()))?;

    let mut config: AppConfig = config
        .try_deserialize()
        .map_err(|e| TradingError::Configuration(e.to_string()))?;
    config.normalize();
    Ok(config)
}
