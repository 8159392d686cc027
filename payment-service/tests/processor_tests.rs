use std::sync::Arc;

use chrono::Utc;
use common::decimal::{dec, Amount};
use common::error::Error;
use common::model::payment::{PaymentMethod, PaymentStatus};
use common::model::trade::{Trade, TradeFees, TradeStatus, TradeType};
use exchange_client::{ExchangeApi, MockExchange};
use payment_service::{PaymentProcessor, PaymentProcessorFactory};
use uuid::Uuid;

fn create_test_trade(user_id: Uuid, currency: &str, total: Amount, method: PaymentMethod) -> Trade {
    let now = Utc::now();
    Trade {
        id: Uuid::new_v4(),
        user_id,
        quote_id: Uuid::new_v4(),
        trade_type: TradeType::Sell,
        currency: currency.to_string(),
        amount: dec!(0.5),
        rate: dec!(50000000),
        total,
        fees: TradeFees::zero(),
        payment_method: method,
        status: TradeStatus::Pending,
        external_reference: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn dispatch_routes_each_method_to_its_processor() {
    let exchange = Arc::new(MockExchange::new());
    let factory = PaymentProcessorFactory::new(exchange);

    assert_eq!(factory.processor_for("wallet").unwrap().method(), PaymentMethod::Wallet);
    assert_eq!(
        factory.processor_for("bank_transfer").unwrap().method(),
        PaymentMethod::BankTransfer
    );
    assert_eq!(factory.processor_for("card").unwrap().method(), PaymentMethod::Card);
}

#[tokio::test]
async fn dispatch_rejects_unknown_and_placeholder_methods() {
    let exchange = Arc::new(MockExchange::new());
    let factory = PaymentProcessorFactory::new(exchange);

    for method in ["paypal", "cash", "", "WALLET"] {
        let err = factory.processor_for(method).err().unwrap();
        assert!(matches!(err, Error::UnsupportedPaymentMethod(_)), "{} must be rejected", method);
    }

    // Declared on the wire but without a processor
    for method in ["crypto", "qr_code", "mobile_money"] {
        let err = factory.processor_for(method).err().unwrap();
        assert!(matches!(err, Error::UnsupportedPaymentMethod(_)), "{} must be rejected", method);
    }
}

#[tokio::test]
async fn wallet_shortfall_fails_before_any_transfer() {
    let exchange = Arc::new(MockExchange::new());
    let factory = PaymentProcessorFactory::new(exchange.clone());
    let user = Uuid::new_v4();
    exchange.fund(user, "NGN", dec!(50));

    let trade = create_test_trade(user, "NGN", dec!(100), PaymentMethod::Wallet);
    let processor = factory.processor_for("wallet").unwrap();

    let err = processor.process(&trade).await.unwrap_err();
    assert!(matches!(err, Error::InsufficientBalance(_)));
    assert_eq!(exchange.transfer_calls(), 0, "validation must precede the transfer call");
}

#[tokio::test]
async fn wallet_payment_debits_the_balance() {
    let exchange = Arc::new(MockExchange::new());
    let factory = PaymentProcessorFactory::new(exchange.clone());
    let user = Uuid::new_v4();
    exchange.fund(user, "NGN", dec!(250));

    let trade = create_test_trade(user, "NGN", dec!(100), PaymentMethod::Wallet);
    let processor = factory.processor_for("wallet").unwrap();

    let result = processor.process(&trade).await.unwrap();
    assert!(result.success);
    assert_eq!(result.status, PaymentStatus::Completed);
    assert_eq!(exchange.transfer_calls(), 1);

    let balance = exchange.get_balance(user, "NGN").await.unwrap();
    assert_eq!(balance.available, dec!(150));

    // The settled payment is verifiable by its reference
    let verified = processor.verify(&result.reference).await.unwrap();
    assert_eq!(verified.status, PaymentStatus::Completed);
}

#[tokio::test]
async fn bank_transfer_exposes_redirect_and_account_details() {
    let exchange = Arc::new(MockExchange::new());
    let factory = PaymentProcessorFactory::new(exchange.clone());
    let user = Uuid::new_v4();

    // No pre-validation: an empty wallet is fine for bank transfers
    let trade = create_test_trade(user, "NGN", dec!(100000), PaymentMethod::BankTransfer);
    let processor = factory.processor_for("bank_transfer").unwrap();

    let result = processor.process(&trade).await.unwrap();
    assert!(result.success);
    assert_eq!(result.status, PaymentStatus::Pending);
    assert!(result.redirect_url.is_some());
    assert!(result.metadata.get("account_number").is_some());
    assert!(result.metadata.get("expires_at").is_some());
    assert_eq!(exchange.bank_details_calls(), 1);
}

#[tokio::test]
async fn card_is_an_explicit_not_implemented_stub() {
    let exchange = Arc::new(MockExchange::new());
    let factory = PaymentProcessorFactory::new(exchange.clone());
    let user = Uuid::new_v4();

    let trade = create_test_trade(user, "NGN", dec!(100), PaymentMethod::Card);
    let processor = factory.processor_for("card").unwrap();

    let result = processor.process(&trade).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.status, PaymentStatus::Pending);
    assert_eq!(
        result.metadata.get("reason").and_then(|r| r.as_str()),
        Some("card payments are not yet available")
    );

    // No charge of any kind reached the exchange
    assert_eq!(exchange.transfer_calls(), 0);
    assert_eq!(exchange.bank_details_calls(), 0);
}
