//! Payment models and related types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::decimal::Amount;
use crate::error::Error;

/// Payment method chosen for settling a trade
///
/// `Crypto`, `QrCode` and `MobileMoney` are declared for wire compatibility
/// with the exchange but have no processor yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Internal wallet balance
    Wallet,
    /// Bank transfer with externally issued account details
    BankTransfer,
    /// Card charge
    Card,
    /// On-chain crypto payment (placeholder)
    Crypto,
    /// QR code payment (placeholder)
    QrCode,
    /// Mobile money payment (placeholder)
    MobileMoney,
}

impl PaymentMethod {
    /// Canonical string form used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Wallet => "wallet",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Card => "card",
            PaymentMethod::Crypto => "crypto",
            PaymentMethod::QrCode => "qr_code",
            PaymentMethod::MobileMoney => "mobile_money",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wallet" => Ok(PaymentMethod::Wallet),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "card" => Ok(PaymentMethod::Card),
            "crypto" => Ok(PaymentMethod::Crypto),
            "qr_code" => Ok(PaymentMethod::QrCode),
            "mobile_money" => Ok(PaymentMethod::MobileMoney),
            other => Err(Error::UnsupportedPaymentMethod(other.to_string())),
        }
    }
}

/// Status reported by a payment processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Payment initialized but awaiting completion
    Pending,
    /// Payment in flight
    Processing,
    /// Payment completed
    Completed,
    /// Payment failed
    Failed,
}

/// Details handed to a payment processor when initializing a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Trade being settled
    pub trade_id: Uuid,
    /// Paying user
    pub user_id: Uuid,
    /// Settlement currency
    pub currency: String,
    /// Amount to collect
    pub amount: Amount,
}

/// Result produced by a payment processor
///
/// Never persisted on its own; callers fold it into the trade's status and
/// metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    /// Whether the payment step succeeded
    pub success: bool,
    /// Processor- or exchange-assigned reference
    pub reference: String,
    /// Payment status after this step
    pub status: PaymentStatus,
    /// URL the user must visit to complete payment, when applicable
    pub redirect_url: Option<String>,
    /// Processor-specific metadata (account details, expiry, reasons)
    pub metadata: Value,
}

impl PaymentResult {
    /// Successful result with no redirect
    pub fn completed(reference: &str) -> Self {
        Self {
            success: true,
            reference: reference.to_string(),
            status: PaymentStatus::Completed,
            redirect_url: None,
            metadata: Value::Null,
        }
    }

    /// Pending result awaiting an external step
    pub fn pending(reference: &str, metadata: Value) -> Self {
        Self {
            success: true,
            reference: reference.to_string(),
            status: PaymentStatus::Pending,
            redirect_url: None,
            metadata,
        }
    }
}
