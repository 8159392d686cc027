//! Exchange API trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::decimal::Amount;
use common::error::Result;
use common::model::payment::{PaymentDetails, PaymentResult};
use common::model::quote::{Quote, QuoteRequest};
use common::model::trade::TradeStatus;
use common::model::wallet::{Balance, WithdrawalRequest};

/// Acknowledgement returned when a quote is confirmed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfirmation {
    /// Trade ID assigned by the exchange
    pub trade_id: Uuid,
    /// Settlement reference assigned by the exchange
    pub reference: String,
    /// Initial trade status
    pub status: TradeStatus,
    /// Instant the swap was accepted
    pub confirmed_at: DateTime<Utc>,
}

/// Interface to the hosted exchange's REST surface
///
/// Implementations must be safe to share across tasks; services hold them as
/// `Arc<dyn ExchangeApi>`.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Request a time-boxed quote (POST /quote)
    async fn create_quote(&self, request: &QuoteRequest) -> Result<Quote>;

    /// Confirm a held quote, executing the swap (POST /confirm)
    async fn confirm_quote(&self, user_id: Uuid, quote_id: Uuid) -> Result<SwapConfirmation>;

    /// Fetch a wallet balance (GET /wallet/balance)
    async fn get_balance(&self, user_id: Uuid, currency: &str) -> Result<Balance>;

    /// Fetch a deposit address (GET /wallet/address)
    async fn get_deposit_address(&self, user_id: Uuid, currency: &str) -> Result<String>;

    /// Submit a withdrawal, returning its reference (POST /wallet/withdraw)
    async fn withdraw(&self, request: &WithdrawalRequest) -> Result<String>;

    /// Debit a wallet towards a trade (POST /wallet/transfer)
    async fn transfer(
        &self,
        user_id: Uuid,
        currency: &str,
        amount: Amount,
        reference: &str,
    ) -> Result<PaymentResult>;

    /// Request bank account details for a bank-transfer payment
    /// (POST /payments/bank_transfer)
    async fn bank_transfer_details(&self, details: &PaymentDetails) -> Result<PaymentResult>;

    /// Verify a previously initialized payment (GET /payments/verify)
    async fn verify_payment(&self, reference: &str) -> Result<PaymentResult>;

    /// Fetch the current status of a trade (GET /trades/status)
    async fn trade_status(&self, trade_id: Uuid) -> Result<TradeStatus>;
}
