//! Quote models and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Amount, Rate};

/// Request for a time-boxed price quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Currency being sold (e.g., "BTC")
    pub from_currency: String,
    /// Currency being bought (e.g., "NGN")
    pub to_currency: String,
    /// Amount of the from-currency to convert
    pub from_amount: Amount,
}

impl QuoteRequest {
    /// Create a new quote request
    pub fn new(from_currency: &str, to_currency: &str, from_amount: Amount) -> Self {
        Self {
            from_currency: from_currency.to_uppercase(),
            to_currency: to_currency.to_uppercase(),
            from_amount,
        }
    }
}

/// A time-boxed price offer for converting one currency amount into another
///
/// Quotes are immutable: once issued they are either confirmed within the
/// expiry window or discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Unique quote ID issued by the exchange
    pub id: Uuid,
    /// Currency being sold
    pub from_currency: String,
    /// Currency being bought
    pub to_currency: String,
    /// Amount of the from-currency
    pub from_amount: Amount,
    /// Amount of the to-currency the exchange will deliver
    pub to_amount: Amount,
    /// Quoted conversion rate
    pub quoted_price: Rate,
    /// Instant after which the quote can no longer be confirmed
    pub expires_at: DateTime<Utc>,
}

impl Quote {
    /// Check whether the quote has expired at the given instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whole seconds remaining until expiry (zero once expired)
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> u64 {
        let remaining = (self.expires_at - now).num_seconds();
        if remaining > 0 { remaining as u64 } else { 0 }
    }
}
