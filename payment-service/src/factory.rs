//! Payment processor dispatch

use std::str::FromStr;
use std::sync::Arc;

use common::error::{Error, Result};
use common::model::payment::PaymentMethod;
use exchange_client::ExchangeApi;

use crate::bank_transfer::BankTransferProcessor;
use crate::card::CardProcessor;
use crate::processor::PaymentProcessor;
use crate::wallet::WalletProcessor;

/// Resolves the payment processor for a trade's declared payment method
///
/// Selection is a pure lookup: known methods map to their processor, the
/// declared-but-unimplemented methods and unknown strings fail with
/// `UnsupportedPaymentMethod`.
pub struct PaymentProcessorFactory {
    wallet: Arc<WalletProcessor>,
    bank_transfer: Arc<BankTransferProcessor>,
    card: Arc<CardProcessor>,
}

impl PaymentProcessorFactory {
    /// Create a factory with processors backed by the given exchange
    pub fn new(exchange: Arc<dyn ExchangeApi>) -> Self {
        Self {
            wallet: Arc::new(WalletProcessor::new(exchange.clone())),
            bank_transfer: Arc::new(BankTransferProcessor::new(exchange)),
            card: Arc::new(CardProcessor::new()),
        }
    }

    /// Resolve the processor for a payment method
    pub fn processor(&self, method: PaymentMethod) -> Result<Arc<dyn PaymentProcessor>> {
        match method {
            PaymentMethod::Wallet => Ok(self.wallet.clone()),
            PaymentMethod::BankTransfer => Ok(self.bank_transfer.clone()),
            PaymentMethod::Card => Ok(self.card.clone()),
            other => Err(Error::UnsupportedPaymentMethod(format!(
                "{} has no registered processor",
                other
            ))),
        }
    }

    /// Resolve the processor for a payment method given as a string
    pub fn processor_for(&self, method: &str) -> Result<Arc<dyn PaymentProcessor>> {
        self.processor(PaymentMethod::from_str(method)?)
    }
}
