// File: tests/integration_tests.rs

mod test_helpers;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rust_decimal_macros::dec;

use common::model::payment::PaymentStatus;
use common::model::quote::QuoteRequest;
use common::model::trade::{TradeStatus, TradeType};
use exchange_client::ExchangeApi;
use payment_service::PaymentProcessor;
use test_helpers::funded_setup;
use trade_service::{QuoteOutcome, StatusPoller};

#[tokio::test(start_paused = true)]
async fn full_wallet_trade_settles_end_to_end() {
    let (exchange, service, user_id) = funded_setup();

    // Quote
    let outcome = service
        .request_quote(QuoteRequest::new("BTC", "NGN", dec!(0.5)), false)
        .await
        .expect("quote request");
    let quote = match outcome {
        QuoteOutcome::Quoted(q) => q,
        _ => panic!("expected a quote"),
    };
    assert_eq!(quote.to_amount, dec!(25000000));

    // Confirm and pay from the wallet
    let execution = service
        .confirm_trade(user_id, TradeType::Sell, "wallet")
        .await
        .expect("confirm trade");
    assert_eq!(execution.trade.quote_id, quote.id);
    assert_eq!(execution.trade.status, TradeStatus::Processing);
    assert!(execution.payment.success);

    // Poll until settled
    let poller = StatusPoller::new(exchange.clone(), Duration::from_secs(5));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let handle = poller.watch(execution.trade.id, move |status| {
        sink.lock().unwrap().push(status);
    });
    handle.wait().await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.last().copied(), Some(TradeStatus::Completed));

    // The wallet was debited for the converted amount plus fees
    let balance = exchange.get_balance(user_id, "NGN").await.unwrap();
    assert_eq!(balance.available, dec!(4750000));

    // The consumed quote cannot back a second trade
    let retry = service.confirm_trade(user_id, TradeType::Sell, "wallet").await;
    assert!(retry.is_err());
}

#[tokio::test]
async fn bank_transfer_trade_stays_pending_until_verified() {
    let (exchange, service, user_id) = funded_setup();

    service
        .request_quote(QuoteRequest::new("BTC", "NGN", dec!(0.25)), false)
        .await
        .expect("quote request");

    let execution = service
        .confirm_trade(user_id, TradeType::Sell, "bank_transfer")
        .await
        .expect("confirm trade");

    // Bank transfers settle out of band: the result is pending with
    // redirect and account details, and nothing was debited
    assert_eq!(execution.payment.status, PaymentStatus::Pending);
    assert!(execution.payment.redirect_url.is_some());
    assert!(execution.payment.metadata.get("account_number").is_some());

    let balance = exchange.get_balance(user_id, "NGN").await.unwrap();
    assert_eq!(balance.available, dec!(30000000));

    // Bank transfer fees include the processing component
    assert_eq!(execution.trade.fees.platform, dec!(125000));
    assert_eq!(execution.trade.fees.processing, dec!(187500));

    // The initialized payment is verifiable by reference
    let processor = service.payments().processor_for("bank_transfer").unwrap();
    let verified = processor.verify(&execution.payment.reference).await.unwrap();
    assert_eq!(verified.status, PaymentStatus::Pending);
}

#[tokio::test]
async fn wallet_operations_round_trip_through_the_exchange() {
    let (exchange, _service, user_id) = funded_setup();

    let address = exchange.get_deposit_address(user_id, "BTC").await.unwrap();
    assert!(address.starts_with("btc-"));

    let withdrawal = common::model::wallet::WithdrawalRequest {
        user_id,
        currency: "NGN".to_string(),
        amount: dec!(10000000),
        destination: "0123456789".to_string(),
    };
    let reference = exchange.withdraw(&withdrawal).await.unwrap();
    assert!(reference.starts_with("wd-"));

    let balance = exchange.get_balance(user_id, "NGN").await.unwrap();
    assert_eq!(balance.available, dec!(20000000));
}
