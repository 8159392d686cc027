//! Trade models and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Amount, Rate};
use crate::model::payment::PaymentMethod;
use crate::model::quote::Quote;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    /// Buying crypto with fiat
    Buy,
    /// Selling crypto for fiat
    Sell,
    /// Atomic crypto-to-crypto conversion
    Swap,
}

/// Trade lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    /// Trade has been created but payment has not started
    Pending,
    /// Payment is in flight
    Processing,
    /// Trade settled successfully
    Completed,
    /// Trade failed and will not settle
    Failed,
}

impl TradeStatus {
    /// Check whether the status is terminal (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(self, TradeStatus::Completed | TradeStatus::Failed)
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TradeStatus::Pending => "pending",
            TradeStatus::Processing => "processing",
            TradeStatus::Completed => "completed",
            TradeStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Fee breakdown applied to a trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeFees {
    /// Platform fee charged by trustBank
    pub platform: Amount,
    /// Processing fee charged for the payment method
    pub processing: Amount,
    /// Sum of all fees
    pub total: Amount,
}

impl TradeFees {
    /// Create a fee breakdown from its components
    pub fn new(platform: Amount, processing: Amount) -> Self {
        Self {
            platform,
            processing,
            total: platform + processing,
        }
    }

    /// Zero fees
    pub fn zero() -> Self {
        Self::new(Amount::ZERO, Amount::ZERO)
    }
}

/// Trade model representing a confirmed quote awaiting settlement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade ID
    pub id: Uuid,
    /// Initiating user ID
    pub user_id: Uuid,
    /// ID of the quote this trade was created from
    pub quote_id: Uuid,
    /// Trade direction
    pub trade_type: TradeType,
    /// Settlement currency the trade is paid in (the quote's target
    /// currency)
    pub currency: String,
    /// Amount of the source currency being converted
    pub amount: Amount,
    /// Rate locked in by the quote
    pub rate: Rate,
    /// Total charged to the user (converted amount plus fees)
    pub total: Amount,
    /// Fee breakdown
    pub fees: TradeFees,
    /// Payment method chosen for settlement
    pub payment_method: PaymentMethod,
    /// Current lifecycle status
    pub status: TradeStatus,
    /// Reference assigned by the external exchange
    pub external_reference: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Trade {
    /// Create a trade from a confirmed quote
    ///
    /// Every trade references exactly one quote; the quote must be consumed
    /// by the caller once the trade exists.
    pub fn from_quote(
        quote: &Quote,
        user_id: Uuid,
        trade_type: TradeType,
        payment_method: PaymentMethod,
        fees: TradeFees,
    ) -> Self {
        let now = Utc::now();
        let total = quote.to_amount + fees.total;
        Self {
            id: Uuid::new_v4(),
            user_id,
            quote_id: quote.id,
            trade_type,
            currency: quote.to_currency.clone(),
            amount: quote.from_amount,
            rate: quote.quoted_price,
            total,
            fees,
            payment_method,
            status: TradeStatus::Pending,
            external_reference: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the trade has reached a terminal status
    pub fn is_settled(&self) -> bool {
        self.status.is_terminal()
    }

    /// Apply a status transition, terminal statuses are absorbing
    pub fn transition(&mut self, status: TradeStatus) {
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        self.updated_at = Utc::now();
    }
}
