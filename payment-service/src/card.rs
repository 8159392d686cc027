//! Card payment processor stub

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use common::error::Result;
use common::model::payment::{PaymentDetails, PaymentMethod, PaymentResult, PaymentStatus};
use common::model::trade::Trade;

use crate::processor::PaymentProcessor;

/// Card payments are not wired to a charge provider yet
///
/// Every call returns an explicit pending result instead of charging
/// anything, so callers can surface "coming soon" rather than a hard error.
pub struct CardProcessor;

impl CardProcessor {
    /// Create a new card processor stub
    pub fn new() -> Self {
        Self
    }

    fn not_implemented(reference: String) -> PaymentResult {
        PaymentResult {
            success: false,
            reference,
            status: PaymentStatus::Pending,
            redirect_url: None,
            metadata: json!({ "reason": "card payments are not yet available" }),
        }
    }
}

impl Default for CardProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentProcessor for CardProcessor {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Card
    }

    async fn validate(&self, _trade: &Trade) -> Result<()> {
        Ok(())
    }

    async fn initialize(&self, details: &PaymentDetails) -> Result<PaymentResult> {
        warn!("Card payment requested for trade {} but cards are not implemented", details.trade_id);
        Ok(Self::not_implemented(format!("card-{}", details.trade_id.simple())))
    }

    async fn process(&self, trade: &Trade) -> Result<PaymentResult> {
        warn!("Card payment requested for trade {} but cards are not implemented", trade.id);
        Ok(Self::not_implemented(format!("card-{}", trade.id.simple())))
    }

    async fn verify(&self, reference: &str) -> Result<PaymentResult> {
        Ok(Self::not_implemented(reference.to_string()))
    }
}
