//! Bank transfer payment processor

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use common::error::Result;
use common::model::payment::{PaymentDetails, PaymentMethod, PaymentResult};
use common::model::trade::Trade;
use exchange_client::ExchangeApi;

use crate::processor::{details_for, PaymentProcessor};

/// Settles trades by bank transfer
///
/// The exchange issues a settlement account and a redirect URL; the transfer
/// itself happens out of band, so there is nothing to pre-validate.
pub struct BankTransferProcessor {
    exchange: Arc<dyn ExchangeApi>,
}

impl BankTransferProcessor {
    /// Create a new bank transfer processor
    pub fn new(exchange: Arc<dyn ExchangeApi>) -> Self {
        Self { exchange }
    }
}

#[async_trait]
impl PaymentProcessor for BankTransferProcessor {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::BankTransfer
    }

    async fn validate(&self, _trade: &Trade) -> Result<()> {
        Ok(())
    }

    async fn initialize(&self, details: &PaymentDetails) -> Result<PaymentResult> {
        self.exchange.bank_transfer_details(details).await
    }

    async fn process(&self, trade: &Trade) -> Result<PaymentResult> {
        let result = self.initialize(&details_for(trade)).await?;
        info!(
            "Bank transfer initialized for trade {}: reference {}",
            trade.id, result.reference
        );
        Ok(result)
    }

    async fn verify(&self, reference: &str) -> Result<PaymentResult> {
        self.exchange.verify_payment(reference).await
    }
}
