//! REST API client for Alpaca trading and market data

use async_trait::async_trait;
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::auth::AuthHeaders;
use super::messages::*;
use crate::common::errors::{Result, TradingError};
use crate::common::traits::BrokerGateway;
use crate::common::types::{price_from_f64, AccountSnapshot, LatestTrade, OrderAck, OrderRequest};
use crate::config::types::{AlpacaConfig, ApiCredentials};

/// REST API client for Alpaca
#[derive(Debug, Clone)]
pub struct AlpacaRestClient {
    /// HTTP client
    client: Client,
    /// Base URL for the trading API
    trading_url: String,
    /// Base URL for the market data API
    data_url: String,
    auth: AuthHeaders,
}

impl AlpacaRestClient {
    /// Create a new REST client
    pub fn new(trading_url: &str, data_url: &str, credentials: &ApiCredentials) -> Result<Self> {
        Self::with_timeout(trading_url, data_url, credentials, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(
        trading_url: &str,
        data_url: &str,
        credentials: &ApiCredentials,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TradingError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            trading_url: trading_url.trim_end_matches('/').to_string(),
            data_url: data_url.trim_end_matches('/').to_string(),
            auth: AuthHeaders::from_credentials(credentials)?,
        })
    }

    /// Create a client from application configuration
    pub fn from_config(config: &AlpacaConfig, timeout: Duration) -> Result<Self> {
        let credentials = config.credentials().ok_or_else(|| {
            TradingError::Configuration("Alpaca API key and secret are required".to_string())
        })?;
        Self::with_timeout(&config.trading_url, &config.data_url, &credentials, timeout)
    }

    /// Check that the credentials are accepted
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<bool> {
        let url = format!("{}/v2/account", self.trading_url);
        let response = self.auth.apply_to_request(self.client.get(&url)).send().await?;
        Ok(response.status().is_success())
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Collapse whitespace and cap the length of an error body for logs
    fn compact_error_body(body: &str) -> String {
        let normalized = body.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.chars().count() > 180 {
            let truncated: String = normalized.chars().take(180).collect();
            format!("{}...", truncated)
        } else {
            normalized
        }
    }

    /// Describe a non-2xx response, preferring Alpaca's `message` field
    async fn describe_failure(response: Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| Self::compact_error_body(&body));
        format!("status {}: {}", status, detail)
    }

    fn parse_amount(field: &str, raw: &str) -> Result<Decimal> {
        Decimal::from_str(raw.trim())
            .map_err(|e| TradingError::InvalidResponse(format!("Invalid {} '{}': {}", field, raw, e)))
    }

    fn convert_account(response: AccountResponse) -> Result<AccountSnapshot> {
        let buying_power = match response.regt_buying_power.as_deref() {
            Some(regt) => Self::parse_amount("regt_buying_power", regt)?,
            None => Self::parse_amount("buying_power", &response.buying_power)?,
        };
        let cash = Self::parse_amount("cash", &response.cash)?;
        Ok(AccountSnapshot::new(buying_power, cash))
    }

    fn convert_trade(symbol: &str, response: LatestTradeResponse) -> Result<LatestTrade> {
        let price = price_from_f64(response.trade.price).map_err(|e| TradingError::PriceFetch {
            symbol: symbol.to_string(),
            message: e.to_string(),
        })?;
        let size = Decimal::try_from(response.trade.size).unwrap_or(Decimal::ZERO);
        Ok(LatestTrade {
            symbol: response.symbol,
            price,
            size,
            timestamp: response.trade.timestamp,
        })
    }
}

#[async_trait]
impl BrokerGateway for AlpacaRestClient {
    #[instrument(skip(self))]
    async fn query_account(&self) -> Result<AccountSnapshot> {
        let url = format!("{}/v2/account", self.trading_url);
        debug!("Fetching account from: {}", url);

        let response = self
            .auth
            .apply_to_request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| TradingError::AccountQuery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TradingError::AccountQuery(
                Self::describe_failure(response).await,
            ));
        }

        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| TradingError::AccountQuery(format!("Invalid account body: {}", e)))?;
        let snapshot = Self::convert_account(account)
            .map_err(|e| TradingError::AccountQuery(e.to_string()))?;

        info!(
            buying_power = %snapshot.buying_power,
            cash = %snapshot.cash,
            "Account balance"
        );
        Ok(snapshot)
    }

    #[instrument(skip(self))]
    async fn get_latest_price(&self, symbol: &str) -> Result<LatestTrade> {
        let url = format!("{}/v2/stocks/{}/trades/latest", self.data_url, symbol);
        debug!("Fetching latest trade from: {}", url);

        let fetch_error = |message: String| TradingError::PriceFetch {
            symbol: symbol.to_string(),
            message,
        };

        let response = self
            .auth
            .apply_to_request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_error(Self::describe_failure(response).await));
        }

        let trade: LatestTradeResponse = response
            .json()
            .await
            .map_err(|e| fetch_error(format!("Invalid trade body: {}", e)))?;
        Self::convert_trade(symbol, trade)
    }

    #[instrument(skip(self))]
    async fn get_position_qty(&self, symbol: &str) -> Result<Decimal> {
        let url = format!("{}/v2/positions", self.trading_url);
        debug!("Listing positions from: {}", url);

        let query_error = |message: String| TradingError::PositionQuery {
            symbol: symbol.to_string(),
            message,
        };

        let response = self
            .auth
            .apply_to_request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| query_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(query_error(Self::describe_failure(response).await));
        }

        let positions: Vec<PositionResponse> = response
            .json()
            .await
            .map_err(|e| query_error(format!("Invalid positions body: {}", e)))?;

        match positions.iter().find(|p| p.symbol.eq_ignore_ascii_case(symbol)) {
            Some(position) => Self::parse_amount("qty", &position.qty)
                .map_err(|e| query_error(e.to_string())),
            None => Ok(Decimal::ZERO),
        }
    }

    #[instrument(skip(self), fields(symbol = %order.symbol, side = %order.side, qty = %order.qty))]
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck> {
        let url = format!("{}/v2/orders", self.trading_url);

        let response = self
            .auth
            .apply_to_request(self.client.post(&url))
            .json(order)
            .send()
            .await
            .map_err(|e| TradingError::OrderSubmission(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TradingError::OrderSubmission(
                Self::describe_failure(response).await,
            ));
        }

        let ack: OrderResponse = response
            .json()
            .await
            .map_err(|e| TradingError::OrderSubmission(format!("Invalid order body: {}", e)))?;

        Ok(OrderAck {
            id: ack.id,
            status: ack.status,
        })
    }

    fn broker_name(&self) -> &'static str {
        "Alpaca"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn creds() -> ApiCredentials {
        ApiCredentials::new("key".to_string(), "secret".to_string())
    }

    #[test]
    fn test_client_creation() {
        let client = AlpacaRestClient::new(
            "https://paper-api.alpaca.markets",
            "https://data.alpaca.markets",
            &creds(),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_url_normalization() {
        let client = AlpacaRestClient::new(
            "https://paper-api.alpaca.markets/",
            "https://data.alpaca.markets/",
            &creds(),
        )
        .unwrap();
        assert!(!client.trading_url.ends_with('/'));
        assert!(!client.data_url.ends_with('/'));
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let config = AlpacaConfig::default();
        assert!(matches!(
            AlpacaRestClient::from_config(&config, Duration::from_secs(5)),
            Err(TradingError::Configuration(_))
        ));
    }

    #[test]
    fn test_compact_error_body() {
        assert_eq!(
            AlpacaRestClient::compact_error_body("  forbidden \n  request "),
            "forbidden request"
        );
        let long = "x".repeat(400);
        let compact = AlpacaRestClient::compact_error_body(&long);
        assert_eq!(compact.len(), 183);
        assert!(compact.ends_with("..."));
    }

    #[test]
    fn test_convert_account_prefers_regt() {
        let account = AccountResponse {
            id: None,
            status: None,
            buying_power: "4000".to_string(),
            regt_buying_power: Some("2000.50".to_string()),
            cash: "1000".to_string(),
            currency: None,
            trading_blocked: None,
        };
        let snapshot = AlpacaRestClient::convert_account(account).unwrap();
        assert_eq!(snapshot.buying_power, dec!(2000.50));
        assert_eq!(snapshot.cash, dec!(1000));
    }

    #[test]
    fn test_convert_account_rejects_garbage() {
        let account = AccountResponse {
            id: None,
            status: None,
            buying_power: "lots".to_string(),
            regt_buying_power: None,
            cash: "1000".to_string(),
            currency: None,
            trading_blocked: None,
        };
        assert!(matches!(
            AlpacaRestClient::convert_account(account),
            Err(TradingError::InvalidResponse(_))
        ));
    }
}
