//! Error types for the application

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using our TradingError
pub type Result<T> = std::result::Result<T, TradingError>;

/// Main error type for engine and broker operations
#[derive(Error, Debug)]
pub enum TradingError {
    /// Account / buying power query failed
    #[error("Account query failed: {0}")]
    AccountQuery(String),

    /// Latest trade retrieval failed
    #[error("Price fetch failed for {symbol}: {message}")]
    PriceFetch { symbol: String, message: String },

    /// Position listing failed
    #[error("Position query failed for {symbol}: {message}")]
    PositionQuery { symbol: String, message: String },

    /// Buy/sell order was rejected or could not be sent
    #[error("Order submission failed: {0}")]
    OrderSubmission(String),

    /// Non-positive or non-finite price handed to the engine
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TradingError {
    /// Build an `InvalidPrice` error for a decimal price
    pub fn invalid_price(price: Decimal) -> Self {
        TradingError::InvalidPrice(format!("price must be positive, got {}", price))
    }

    /// Broker I/O failures the trader loop retries on the next tick
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TradingError::AccountQuery(_)
                | TradingError::PriceFetch { .. }
                | TradingError::PositionQuery { .. }
                | TradingError::OrderSubmission(_)
                | TradingError::HttpRequest(_)
                | TradingError::InvalidResponse(_)
        )
    }
}
