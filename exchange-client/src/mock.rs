//! In-memory exchange double for tests and demos
//!
//! Mirrors the observable behavior of the hosted exchange: it issues quotes
//! against a configured rate table, enforces quote expiry server-side,
//! consumes quotes on confirmation, and walks trades through a scriptable
//! status sequence. Call counters expose how often each endpoint was hit so
//! tests can assert that validation short-circuits before any network call.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use common::decimal::{Amount, Rate};
use common::error::{Error, Result};
use common::model::payment::{PaymentDetails, PaymentResult, PaymentStatus};
use common::model::quote::{Quote, QuoteRequest};
use common::model::trade::TradeStatus;
use common::model::wallet::{Balance, WithdrawalRequest};

use crate::api::{ExchangeApi, SwapConfirmation};

/// Scripted status sequence for a trade; the last entry repeats
struct StatusScript {
    sequence: Vec<TradeStatus>,
    cursor: usize,
}

/// In-memory implementation of the exchange API
pub struct MockExchange {
    /// Balances by user ID and currency
    balances: DashMap<(Uuid, String), Balance>,
    /// Conversion rates by (from, to) currency pair
    rates: DashMap<(String, String), Rate>,
    /// Issued, unconsumed quotes
    quotes: DashMap<Uuid, Quote>,
    /// Status scripts by trade ID
    statuses: DashMap<Uuid, StatusScript>,
    /// Payment results by reference
    payments: DashMap<String, PaymentResult>,
    /// Server-side quote lifetime
    quote_ttl_secs: i64,
    /// Force the next confirm call to fail
    fail_next_confirm: AtomicBool,
    quote_calls: AtomicUsize,
    confirm_calls: AtomicUsize,
    transfer_calls: AtomicUsize,
    status_calls: AtomicUsize,
    bank_details_calls: AtomicUsize,
}

impl MockExchange {
    /// Create an empty mock exchange with the default 14 second quote TTL
    pub fn new() -> Self {
        Self {
            balances: DashMap::new(),
            rates: DashMap::new(),
            quotes: DashMap::new(),
            statuses: DashMap::new(),
            payments: DashMap::new(),
            quote_ttl_secs: 14,
            fail_next_confirm: AtomicBool::new(false),
            quote_calls: AtomicUsize::new(0),
            confirm_calls: AtomicUsize::new(0),
            transfer_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            bank_details_calls: AtomicUsize::new(0),
        }
    }

    /// Set the server-side quote lifetime in seconds
    pub fn with_quote_ttl(mut self, secs: i64) -> Self {
        self.quote_ttl_secs = secs;
        self
    }

    /// Register a conversion rate for a currency pair
    pub fn set_rate(&self, from: &str, to: &str, rate: Rate) {
        self.rates.insert((from.to_uppercase(), to.to_uppercase()), rate);
    }

    /// Credit a user's wallet
    pub fn fund(&self, user_id: Uuid, currency: &str, amount: Amount) {
        let key = (user_id, currency.to_uppercase());
        let mut balance = self
            .balances
            .entry(key.clone())
            .or_insert_with(|| Balance::new(user_id, key.1.clone()));
        balance.deposit(amount);
    }

    /// Script the status sequence a trade will report; the last entry repeats
    pub fn script_status(&self, trade_id: Uuid, sequence: Vec<TradeStatus>) {
        self.statuses.insert(trade_id, StatusScript { sequence, cursor: 0 });
    }

    /// Make the next confirm call fail with an exchange rejection
    pub fn fail_next_confirm(&self) {
        self.fail_next_confirm.store(true, Ordering::SeqCst);
    }

    /// Number of quote requests received
    pub fn quote_calls(&self) -> usize {
        self.quote_calls.load(Ordering::SeqCst)
    }

    /// Number of confirm requests received
    pub fn confirm_calls(&self) -> usize {
        self.confirm_calls.load(Ordering::SeqCst)
    }

    /// Number of wallet transfer requests received
    pub fn transfer_calls(&self) -> usize {
        self.transfer_calls.load(Ordering::SeqCst)
    }

    /// Number of trade status checks received
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Number of bank transfer detail requests received
    pub fn bank_details_calls(&self) -> usize {
        self.bank_details_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeApi for MockExchange {
    async fn create_quote(&self, request: &QuoteRequest) -> Result<Quote> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);

        let key = (request.from_currency.clone(), request.to_currency.clone());
        let rate = self
            .rates
            .get(&key)
            .map(|r| *r)
            .ok_or_else(|| {
                Error::ExchangeRejected(format!("no market for {}/{}", key.0, key.1))
            })?;

        let quote = Quote {
            id: Uuid::new_v4(),
            from_currency: request.from_currency.clone(),
            to_currency: request.to_currency.clone(),
            from_amount: request.from_amount,
            to_amount: request.from_amount * rate,
            quoted_price: rate,
            expires_at: Utc::now() + Duration::seconds(self.quote_ttl_secs),
        };

        debug!("Issued quote {} at rate {}", quote.id, rate);
        self.quotes.insert(quote.id, quote.clone());
        Ok(quote)
    }

    async fn confirm_quote(&self, _user_id: Uuid, quote_id: Uuid) -> Result<SwapConfirmation> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_next_confirm.swap(false, Ordering::SeqCst) {
            return Err(Error::ExchangeRejected("swap engine unavailable".to_string()));
        }

        // Consumed on confirmation; a quote can never back two trades
        let (_, quote) = self
            .quotes
            .remove(&quote_id)
            .ok_or_else(|| Error::QuoteNotFound(quote_id.to_string()))?;

        if quote.is_expired(Utc::now()) {
            return Err(Error::QuoteExpired(quote_id.to_string()));
        }

        let trade_id = Uuid::new_v4();
        self.statuses.entry(trade_id).or_insert_with(|| StatusScript {
            sequence: vec![TradeStatus::Pending, TradeStatus::Processing, TradeStatus::Completed],
            cursor: 0,
        });

        Ok(SwapConfirmation {
            trade_id,
            reference: format!("swap-{}", trade_id.simple()),
            status: TradeStatus::Pending,
            confirmed_at: Utc::now(),
        })
    }

    async fn get_balance(&self, user_id: Uuid, currency: &str) -> Result<Balance> {
        let key = (user_id, currency.to_uppercase());
        Ok(self
            .balances
            .get(&key)
            .map(|b| b.clone())
            .unwrap_or_else(|| Balance::new(user_id, key.1.clone())))
    }

    async fn get_deposit_address(&self, user_id: Uuid, currency: &str) -> Result<String> {
        Ok(format!("{}-{}-deposit", currency.to_lowercase(), user_id.simple()))
    }

    async fn withdraw(&self, request: &WithdrawalRequest) -> Result<String> {
        let key = (request.user_id, request.currency.to_uppercase());
        let mut balance = self
            .balances
            .get_mut(&key)
            .ok_or_else(|| Error::InsufficientBalance(format!("no {} balance", request.currency)))?;

        balance.debit(request.amount).map_err(Error::InsufficientBalance)?;
        Ok(format!("wd-{}", Uuid::new_v4().simple()))
    }

    async fn transfer(
        &self,
        user_id: Uuid,
        currency: &str,
        amount: Amount,
        reference: &str,
    ) -> Result<PaymentResult> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);

        let key = (user_id, currency.to_uppercase());
        let mut balance = self
            .balances
            .get_mut(&key)
            .ok_or_else(|| Error::InsufficientBalance(format!("no {} balance", currency)))?;

        balance.debit(amount).map_err(Error::InsufficientBalance)?;

        let result = PaymentResult::completed(reference);
        self.payments.insert(reference.to_string(), result.clone());
        Ok(result)
    }

    async fn bank_transfer_details(&self, details: &PaymentDetails) -> Result<PaymentResult> {
        self.bank_details_calls.fetch_add(1, Ordering::SeqCst);

        let reference = format!("bt-{}", details.trade_id.simple());
        let result = PaymentResult {
            success: true,
            reference: reference.clone(),
            status: PaymentStatus::Pending,
            redirect_url: Some(format!("https://pay.trustbank.local/transfer/{}", reference)),
            metadata: json!({
                "bank_name": "trustBank Settlement",
                "account_number": "0123456789",
                "account_name": "trustBank/Exchange",
                "expires_at": (Utc::now() + Duration::minutes(30)).to_rfc3339(),
            }),
        };

        self.payments.insert(reference, result.clone());
        Ok(result)
    }

    async fn verify_payment(&self, reference: &str) -> Result<PaymentResult> {
        self.payments
            .get(reference)
            .map(|p| p.clone())
            .ok_or_else(|| Error::ExchangeRejected(format!("unknown payment reference {}", reference)))
    }

    async fn trade_status(&self, trade_id: Uuid) -> Result<TradeStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);

        let mut script = self
            .statuses
            .get_mut(&trade_id)
            .ok_or_else(|| Error::TradeNotFound(trade_id.to_string()))?;

        let status = script
            .sequence
            .get(script.cursor)
            .copied()
            .or_else(|| script.sequence.last().copied())
            .ok_or_else(|| Error::Internal(format!("empty status script for {}", trade_id)))?;

        if script.cursor + 1 < script.sequence.len() {
            script.cursor += 1;
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::decimal::dec;

    #[tokio::test]
    async fn quote_is_consumed_by_confirmation() {
        let exchange = MockExchange::new();
        exchange.set_rate("BTC", "NGN", dec!(50000000));

        let quote = exchange
            .create_quote(&QuoteRequest::new("BTC", "NGN", dec!(0.5)))
            .await
            .unwrap();
        assert_eq!(quote.to_amount, dec!(25000000));

        let user = Uuid::new_v4();
        exchange.confirm_quote(user, quote.id).await.unwrap();

        // Second confirmation of the same quote must fail
        let err = exchange.confirm_quote(user, quote.id).await.unwrap_err();
        assert!(matches!(err, Error::QuoteNotFound(_)));
    }

    #[tokio::test]
    async fn expired_quote_is_rejected_server_side() {
        let exchange = MockExchange::new().with_quote_ttl(-1);
        exchange.set_rate("BTC", "NGN", dec!(50000000));

        let quote = exchange
            .create_quote(&QuoteRequest::new("BTC", "NGN", dec!(0.5)))
            .await
            .unwrap();

        let err = exchange.confirm_quote(Uuid::new_v4(), quote.id).await.unwrap_err();
        assert!(matches!(err, Error::QuoteExpired(_)));
    }

    #[tokio::test]
    async fn status_script_repeats_last_entry() {
        let exchange = MockExchange::new();
        let trade_id = Uuid::new_v4();
        exchange.script_status(trade_id, vec![TradeStatus::Pending, TradeStatus::Completed]);

        assert_eq!(exchange.trade_status(trade_id).await.unwrap(), TradeStatus::Pending);
        assert_eq!(exchange.trade_status(trade_id).await.unwrap(), TradeStatus::Completed);
        assert_eq!(exchange.trade_status(trade_id).await.unwrap(), TradeStatus::Completed);
        assert_eq!(exchange.status_calls(), 3);
    }

    #[tokio::test]
    async fn transfer_debits_the_wallet() {
        let exchange = MockExchange::new();
        let user = Uuid::new_v4();
        exchange.fund(user, "NGN", dec!(1000));

        exchange.transfer(user, "NGN", dec!(400), "ref-1").await.unwrap();
        let balance = exchange.get_balance(user, "NGN").await.unwrap();
        assert_eq!(balance.available, dec!(600));

        let err = exchange.transfer(user, "NGN", dec!(700), "ref-2").await.unwrap_err();
        assert!(matches!(err, Error::InsufficientBalance(_)));
    }
}
