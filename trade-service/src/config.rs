//! Configuration for the trade service

use std::env;
use std::str::FromStr;

use common::decimal::{dec, Rate};
use common::model::currency::CurrencyLimits;

/// Configuration for the trade service
#[derive(Debug, Clone)]
pub struct TradeServiceConfig {
    /// Client-side quote lifetime in seconds
    pub quote_ttl_secs: u64,
    /// Trade status poll interval in seconds
    pub poll_interval_secs: u64,
    /// Platform fee rate applied to the converted amount
    pub platform_fee_rate: Rate,
    /// Processing fee rate for externally settled payment methods
    pub processing_fee_rate: Rate,
    /// Per-currency trading limits
    pub limits: Vec<CurrencyLimits>,
}

impl Default for TradeServiceConfig {
    fn default() -> Self {
        Self {
            quote_ttl_secs: env::var("QUOTE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(14),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            platform_fee_rate: env::var("PLATFORM_FEE_RATE")
                .ok()
                .and_then(|s| Rate::from_str(&s).ok())
                .unwrap_or(dec!(0.01)),
            processing_fee_rate: env::var("PROCESSING_FEE_RATE")
                .ok()
                .and_then(|s| Rate::from_str(&s).ok())
                .unwrap_or(dec!(0.015)),
            limits: CurrencyLimits::defaults(),
        }
    }
}

impl TradeServiceConfig {
    /// Create a new configuration using environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Look up the trading limits for a currency
    pub fn limits_for(&self, currency: &str) -> Option<&CurrencyLimits> {
        let currency = currency.to_uppercase();
        self.limits.iter().find(|l| l.currency == currency)
    }
}
