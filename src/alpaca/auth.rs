//! Authentication utilities for the Alpaca API
//!
//! Alpaca authenticates every request with the key pair in two headers;
//! there is no request signing.

use crate::common::errors::{Result, TradingError};
use crate::config::types::ApiCredentials;

/// Header carrying the API key ID
pub const KEY_ID_HEADER: &str = "APCA-API-KEY-ID";
/// Header carrying the API secret key
pub const SECRET_KEY_HEADER: &str = "APCA-API-SECRET-KEY";

/// Authentication headers for API requests
#[derive(Clone)]
pub struct AuthHeaders {
    pub key_id: String,
    pub secret_key: String,
}

impl AuthHeaders {
    /// Build headers from credentials, rejecting blank keys
    pub fn from_credentials(credentials: &ApiCredentials) -> Result<Self> {
        if credentials.api_key.trim().is_empty() || credentials.api_secret.trim().is_empty() {
            return Err(TradingError::Configuration(
                "Alpaca credentials must not be blank".to_string(),
            ));
        }
        Ok(Self {
            key_id: credentials.api_key.clone(),
            secret_key: credentials.api_secret.clone(),
        })
    }

    /// Add authentication headers to a reqwest RequestBuilder
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(KEY_ID_HEADER, &self.key_id)
            .header(SECRET_KEY_HEADER, &self.secret_key)
    }
}

impl std::fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHeaders")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}
