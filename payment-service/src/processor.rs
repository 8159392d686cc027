//! Payment processor trait

use async_trait::async_trait;

use common::error::Result;
use common::model::payment::{PaymentDetails, PaymentMethod, PaymentResult};
use common::model::trade::Trade;

/// Strategy object handling one payment method's lifecycle
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// The payment method this processor handles
    fn method(&self) -> PaymentMethod;

    /// Check that the trade can be settled with this method
    ///
    /// Must not mutate any external state; failures here guarantee no
    /// initialization call was made.
    async fn validate(&self, trade: &Trade) -> Result<()>;

    /// Initialize a payment from explicit details
    async fn initialize(&self, details: &PaymentDetails) -> Result<PaymentResult>;

    /// Validate and settle a trade end to end
    async fn process(&self, trade: &Trade) -> Result<PaymentResult>;

    /// Verify a previously initialized payment by its reference
    async fn verify(&self, reference: &str) -> Result<PaymentResult>;
}

/// Build the payment details for a trade
pub(crate) fn details_for(trade: &Trade) -> PaymentDetails {
    PaymentDetails {
        trade_id: trade.id,
        user_id: trade.user_id,
        currency: trade.currency.clone(),
        amount: trade.total,
    }
}
