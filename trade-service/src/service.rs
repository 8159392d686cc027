//! Trade service implementation

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use common::decimal::Amount;
use common::error::{Error, ErrorExt, Result};
use common::model::payment::{PaymentMethod, PaymentResult};
use common::model::quote::{Quote, QuoteRequest};
use common::model::trade::{Trade, TradeFees, TradeStatus, TradeType};
use exchange_client::ExchangeApi;
use payment_service::{PaymentProcessor, PaymentProcessorFactory};

use crate::config::TradeServiceConfig;

/// Outcome of a quote request
#[derive(Debug, Clone)]
pub enum QuoteOutcome {
    /// Quote obtained; the expiry countdown is running
    Quoted(Quote),
    /// Amount exceeds the configured maximum; the caller must acknowledge
    /// the large trade and retry before any quote is requested
    LargeTradeWarning {
        /// Currency the limit applies to
        currency: String,
        /// Requested amount
        amount: Amount,
        /// Configured maximum
        max_amount: Amount,
    },
}

/// A confirmed trade together with its payment result
#[derive(Debug, Clone)]
pub struct TradeExecution {
    /// The trade created from the confirmed quote
    pub trade: Trade,
    /// The payment processor's result, folded into the trade status
    pub payment: PaymentResult,
}

/// Slot holding the single live quote
///
/// The generation counter ties each countdown task to the quote it was
/// started for; a superseded countdown observes a newer generation and
/// exits without touching the slot.
struct HeldQuoteSlot {
    quote: Option<Quote>,
    generation: u64,
    remaining_secs: u64,
    countdown: Option<JoinHandle<()>>,
}

impl HeldQuoteSlot {
    fn empty() -> Self {
        Self {
            quote: None,
            generation: 0,
            remaining_secs: 0,
            countdown: None,
        }
    }

    /// Drop the held quote and stop its countdown
    fn clear(&mut self) {
        self.quote = None;
        self.remaining_secs = 0;
        self.generation += 1;
        if let Some(handle) = self.countdown.take() {
            handle.abort();
        }
    }
}

/// Service orchestrating the quote and trade lifecycle
///
/// All business logic (pricing, matching, custody) lives at the external
/// exchange; this service validates inputs, holds the live quote, and walks
/// a confirmation through payment.
pub struct TradeService {
    exchange: Arc<dyn ExchangeApi>,
    payments: Arc<PaymentProcessorFactory>,
    config: TradeServiceConfig,
    held: Arc<Mutex<HeldQuoteSlot>>,
}

impl TradeService {
    /// Create a new trade service
    pub fn new(exchange: Arc<dyn ExchangeApi>, config: TradeServiceConfig) -> Self {
        Self {
            payments: Arc::new(PaymentProcessorFactory::new(exchange.clone())),
            exchange,
            config,
            held: Arc::new(Mutex::new(HeldQuoteSlot::empty())),
        }
    }

    /// The payment processor factory backing this service
    pub fn payments(&self) -> Arc<PaymentProcessorFactory> {
        self.payments.clone()
    }

    /// Request a quote for converting `from_amount` of one currency into
    /// another
    ///
    /// Amounts below the currency minimum are rejected and amounts above
    /// the maximum return a [`QuoteOutcome::LargeTradeWarning`]; in both
    /// cases no request reaches the exchange. On success the previous quote
    /// (if any) is discarded and the expiry countdown starts.
    pub async fn request_quote(
        &self,
        request: QuoteRequest,
        large_trade_ack: bool,
    ) -> Result<QuoteOutcome> {
        if request.from_currency.is_empty() || request.to_currency.is_empty() {
            return Err(Error::InvalidInput("both currencies must be provided".to_string()));
        }
        if request.from_amount <= Amount::ZERO {
            return Err(Error::InvalidInput("amount must be positive".to_string()));
        }

        if let Some(limits) = self.config.limits_for(&request.from_currency) {
            if request.from_amount < limits.min_amount {
                return Err(Error::AmountTooLow(format!(
                    "{} {} is below the minimum of {}",
                    request.from_amount, limits.currency, limits.min_amount
                )));
            }
            if request.from_amount > limits.max_amount && !large_trade_ack {
                warn!(
                    "Large trade of {} {} requires acknowledgement (max {})",
                    request.from_amount, limits.currency, limits.max_amount
                );
                return Ok(QuoteOutcome::LargeTradeWarning {
                    currency: limits.currency.clone(),
                    amount: request.from_amount,
                    max_amount: limits.max_amount,
                });
            }
        }

        let quote = self
            .exchange
            .create_quote(&request)
            .await
            .with_context(|| {
                format!("requesting {}/{} quote", request.from_currency, request.to_currency)
            })?;
        info!(
            "Quote {} obtained: {} {} -> {} {} at {}",
            quote.id,
            quote.from_amount,
            quote.from_currency,
            quote.to_amount,
            quote.to_currency,
            quote.quoted_price
        );

        self.hold_quote(quote.clone()).await;
        Ok(QuoteOutcome::Quoted(quote))
    }

    /// Store a fresh quote and start its countdown, superseding any
    /// previous quote
    async fn hold_quote(&self, quote: Quote) {
        let quote_id = quote.id;
        let ttl = self.config.quote_ttl_secs;

        let mut slot = self.held.lock().await;
        slot.clear();
        slot.quote = Some(quote);
        slot.remaining_secs = ttl;

        let generation = slot.generation;
        let held = self.held.clone();
        slot.countdown = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately; the countdown starts on
            // the next one.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let mut slot = held.lock().await;
                if slot.generation != generation {
                    return;
                }
                slot.remaining_secs = slot.remaining_secs.saturating_sub(1);
                if slot.remaining_secs == 0 {
                    slot.quote = None;
                    slot.countdown = None;
                    debug!("Held quote {} expired", quote_id);
                    return;
                }
            }
        }));
    }

    /// The currently held quote, if one is live
    pub async fn held_quote(&self) -> Option<Quote> {
        self.held.lock().await.quote.clone()
    }

    /// Seconds left before the held quote is discarded
    pub async fn seconds_remaining(&self) -> u64 {
        let slot = self.held.lock().await;
        if slot.quote.is_some() { slot.remaining_secs } else { 0 }
    }

    /// Discard the held quote without confirming it
    pub async fn cancel_quote(&self) {
        self.held.lock().await.clear();
    }

    /// Consume the held quote after a successful confirmation
    async fn consume_quote(&self, quote_id: Uuid) {
        let mut slot = self.held.lock().await;
        if slot.quote.as_ref().map(|q| q.id) == Some(quote_id) {
            slot.clear();
        }
    }

    /// Fee breakdown for a trade settled with the given method
    fn fees_for(&self, method: PaymentMethod, converted: Amount) -> TradeFees {
        let platform = converted * self.config.platform_fee_rate;
        let processing = match method {
            // Wallet debits carry no external processing cost
            PaymentMethod::Wallet => Amount::ZERO,
            _ => converted * self.config.processing_fee_rate,
        };
        TradeFees::new(platform, processing)
    }

    /// Confirm the held quote into a trade and settle it with the given
    /// payment method
    ///
    /// Fails with `QuoteExpired` when no live quote is held. A failed
    /// confirm call leaves the quote in place so the caller can retry
    /// within the expiry window; a successful one consumes it. When payment
    /// fails after the exchange has confirmed, the error is a
    /// [`Error::PaymentFailed`] carrying the confirmed trade, which the
    /// caller can still poll or settle another way.
    pub async fn confirm_trade(
        &self,
        user_id: Uuid,
        trade_type: TradeType,
        payment_method: &str,
    ) -> Result<TradeExecution> {
        let processor = self.payments.processor_for(payment_method)?;

        let quote = {
            let slot = self.held.lock().await;
            slot.quote.clone()
        }
        .ok_or_else(|| {
            Error::QuoteExpired("no quote is currently held; request a new one".to_string())
        })?;

        let confirmation = self
            .exchange
            .confirm_quote(user_id, quote.id)
            .await
            .with_context(|| format!("confirming quote {}", quote.id))?;
        self.consume_quote(quote.id).await;
        info!(
            "Quote {} confirmed as trade {} ({})",
            quote.id, confirmation.trade_id, confirmation.reference
        );

        let fees = self.fees_for(processor.method(), quote.to_amount);
        let mut trade = Trade::from_quote(&quote, user_id, trade_type, processor.method(), fees);
        trade.id = confirmation.trade_id;
        trade.external_reference = Some(confirmation.reference);
        trade.transition(confirmation.status);

        match processor.process(&trade).await {
            Ok(payment) => {
                if payment.success {
                    trade.transition(TradeStatus::Processing);
                }
                Ok(TradeExecution { trade, payment })
            }
            Err(e) => {
                warn!("Payment for trade {} failed: {}", trade.id, e);
                Err(Error::PaymentFailed {
                    trade: Box::new(trade),
                    source: Box::new(e),
                })
            }
        }
    }
}
