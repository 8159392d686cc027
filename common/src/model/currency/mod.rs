//! Currency trading limits

use serde::{Deserialize, Serialize};

use crate::decimal::{dec, Amount};

/// Per-currency [min, max] bound on tradable amounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyLimits {
    /// Currency symbol
    pub currency: String,
    /// Smallest tradable amount
    pub min_amount: Amount,
    /// Largest amount tradable without an explicit acknowledgement
    pub max_amount: Amount,
}

impl CurrencyLimits {
    /// Create limits for a currency
    pub fn new(currency: &str, min_amount: Amount, max_amount: Amount) -> Self {
        Self {
            currency: currency.to_uppercase(),
            min_amount,
            max_amount,
        }
    }

    /// Default limits table as configured on the trading screens
    pub fn defaults() -> Vec<CurrencyLimits> {
        vec![
            CurrencyLimits::new("BTC", dec!(0.0001), dec!(1)),
            CurrencyLimits::new("ETH", dec!(0.001), dec!(10)),
            CurrencyLimits::new("USDT", dec!(10), dec!(100000)),
            CurrencyLimits::new("NGN", dec!(1000), dec!(10000000)),
        ]
    }
}
