// File: tests/test_helpers.rs

use std::sync::Arc;

use rust_decimal_macros::dec;
use uuid::Uuid;

use common::model::currency::CurrencyLimits;
use exchange_client::MockExchange;
use trade_service::{TradeService, TradeServiceConfig};

/// Configuration used by the integration tests
pub fn test_config() -> TradeServiceConfig {
    TradeServiceConfig {
        quote_ttl_secs: 14,
        poll_interval_secs: 5,
        platform_fee_rate: dec!(0.01),
        processing_fee_rate: dec!(0.015),
        limits: CurrencyLimits::defaults(),
    }
}

/// An exchange with a BTC/NGN market and a funded user, plus the trade
/// service wired against it
pub fn funded_setup() -> (Arc<MockExchange>, TradeService, Uuid) {
    let exchange = Arc::new(MockExchange::new());
    exchange.set_rate("BTC", "NGN", dec!(50000000));

    let user_id = Uuid::new_v4();
    exchange.fund(user_id, "NGN", dec!(30000000));

    let service = TradeService::new(exchange.clone(), test_config());
    (exchange, service, user_id)
}
