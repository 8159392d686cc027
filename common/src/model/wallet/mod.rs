//! Wallet models and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Amount;

/// Wallet balance held at the external exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    /// Owning user ID
    pub user_id: Uuid,
    /// Currency symbol (e.g., "BTC", "NGN")
    pub currency: String,
    /// Total balance
    pub total: Amount,
    /// Available balance (not held by pending operations)
    pub available: Amount,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Balance {
    /// Create a new balance with zero amounts
    pub fn new(user_id: Uuid, currency: String) -> Self {
        Self {
            user_id,
            currency,
            total: Amount::ZERO,
            available: Amount::ZERO,
            updated_at: Utc::now(),
        }
    }

    /// Add funds to the balance
    pub fn deposit(&mut self, amount: Amount) {
        self.total += amount;
        self.available += amount;
        self.updated_at = Utc::now();
    }

    /// Remove funds from the balance
    pub fn debit(&mut self, amount: Amount) -> Result<(), String> {
        if amount > self.available {
            return Err(format!("Insufficient available balance: {} {}", self.available, self.currency));
        }

        self.total -= amount;
        self.available -= amount;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Withdrawal request submitted to the external exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Withdrawing user
    pub user_id: Uuid,
    /// Currency to withdraw
    pub currency: String,
    /// Amount to withdraw
    pub amount: Amount,
    /// Destination address or account
    pub destination: String,
}
