//! Wallet payment processor

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use common::error::{Error, Result};
use common::model::payment::{PaymentDetails, PaymentMethod, PaymentResult};
use common::model::trade::Trade;
use exchange_client::ExchangeApi;

use crate::processor::{details_for, PaymentProcessor};

/// Settles trades from the user's internal wallet balance
///
/// Validation checks the available balance before any transfer is issued, so
/// an underfunded wallet never reaches the exchange.
pub struct WalletProcessor {
    exchange: Arc<dyn ExchangeApi>,
}

impl WalletProcessor {
    /// Create a new wallet processor
    pub fn new(exchange: Arc<dyn ExchangeApi>) -> Self {
        Self { exchange }
    }
}

#[async_trait]
impl PaymentProcessor for WalletProcessor {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Wallet
    }

    async fn validate(&self, trade: &Trade) -> Result<()> {
        let balance = self.exchange.get_balance(trade.user_id, &trade.currency).await?;

        if balance.available < trade.total {
            return Err(Error::InsufficientBalance(format!(
                "wallet holds {} {} but the trade requires {}",
                balance.available, trade.currency, trade.total
            )));
        }

        debug!(
            "Wallet balance check passed for trade {}: {} {} available",
            trade.id, balance.available, trade.currency
        );
        Ok(())
    }

    async fn initialize(&self, details: &PaymentDetails) -> Result<PaymentResult> {
        let reference = format!("trade-{}", details.trade_id.simple());
        self.exchange
            .transfer(details.user_id, &details.currency, details.amount, &reference)
            .await
    }

    async fn process(&self, trade: &Trade) -> Result<PaymentResult> {
        self.validate(trade).await?;

        let result = self.initialize(&details_for(trade)).await?;
        info!(
            "Wallet payment of {} {} settled for trade {} ({})",
            trade.total, trade.currency, trade.id, result.reference
        );
        Ok(result)
    }

    async fn verify(&self, reference: &str) -> Result<PaymentResult> {
        self.exchange.verify_payment(reference).await
    }
}
