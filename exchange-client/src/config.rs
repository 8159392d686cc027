//! Configuration for the exchange client

use std::env;

/// Configuration for the exchange client
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Base URL of the exchange API
    pub base_url: String,
    /// API key used as a bearer token
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("EXCHANGE_API_URL")
                .unwrap_or_else(|_| "https://api.exchange.trustbank.local/v1".to_string()),
            api_key: env::var("EXCHANGE_API_KEY").unwrap_or_default(),
            timeout_secs: env::var("EXCHANGE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl ExchangeConfig {
    /// Create a new configuration using environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create a new configuration with custom values
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> Self {
        Self {
            base_url,
            api_key,
            timeout_secs,
        }
    }
}
