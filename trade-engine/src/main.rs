//! Trade engine entry point

use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use rust_decimal_macros::dec;
use tracing::{info, debug, Level};
use tracing_subscriber::{FmtSubscriber, EnvFilter, fmt::format::FmtSpan};
use uuid::Uuid;

use common::error::Result;
use common::model::quote::QuoteRequest;
use common::model::trade::TradeType;
use exchange_client::{ExchangeApi, ExchangeConfig, HttpExchangeClient, MockExchange};
use trade_service::{QuoteOutcome, StatusPoller, TradeService, TradeServiceConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Run the full trade flow against an in-memory exchange
    #[clap(short, long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing with debug level if DEBUG=1 in .env
    let env_debug = std::env::var("DEBUG").unwrap_or_else(|_| "0".to_string());
    let log_level = if env_debug == "1" { Level::DEBUG } else { Level::INFO };

    // Create an environment filter
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .parse("trade_service=debug,payment_service=debug,exchange_client=debug")
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .finish();

    // Only set the global subscriber if it hasn't been set already
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        info!("Tracing initialized");
        if env_debug == "1" {
            debug!("Debug logging enabled");
        }
    }

    info!("Starting trustBank Trade Engine...");

    let config = TradeServiceConfig::from_env();

    if args.demo {
        run_demo(config).await
    } else {
        // Smoke-check the configured exchange connection, then exit;
        // nothing drives trades outside demo mode yet.
        let exchange_config = ExchangeConfig::from_env();
        info!("Exchange endpoint: {}", exchange_config.base_url);
        let _client = HttpExchangeClient::new(exchange_config)?;
        info!("Exchange client initialized; run with --demo for the full flow");
        Ok(())
    }
}

/// Run the quote -> confirm -> pay -> poll flow against a funded
/// in-memory exchange
async fn run_demo(config: TradeServiceConfig) -> Result<()> {
    info!("Running demo flow against the in-memory exchange");

    let mock = Arc::new(MockExchange::new());
    mock.set_rate("BTC", "NGN", dec!(50000000));

    let user_id = Uuid::new_v4();
    mock.fund(user_id, "NGN", dec!(30000000));
    info!("Funded demo user {} with 30,000,000 NGN", user_id);

    let exchange: Arc<dyn ExchangeApi> = mock.clone();
    let service = TradeService::new(exchange.clone(), config.clone());

    // Request a quote for half a bitcoin
    let outcome = service
        .request_quote(QuoteRequest::new("BTC", "NGN", dec!(0.5)), false)
        .await?;

    let quote = match outcome {
        QuoteOutcome::Quoted(quote) => quote,
        QuoteOutcome::LargeTradeWarning { currency, amount, max_amount } => {
            info!(
                "Large trade warning: {} {} exceeds the {} maximum of {}",
                amount, currency, currency, max_amount
            );
            return Ok(());
        }
    };
    info!(
        "Quote {}: {} BTC -> {} NGN, {} seconds to confirm",
        quote.id,
        quote.from_amount,
        quote.to_amount,
        service.seconds_remaining().await
    );

    // Confirm and settle from the wallet
    let execution = service.confirm_trade(user_id, TradeType::Sell, "wallet").await?;
    info!(
        "Trade {} confirmed: total {} NGN (fees {}), payment {}",
        execution.trade.id,
        execution.trade.total,
        execution.trade.fees.total,
        execution.payment.reference
    );

    // Poll until the exchange reports a terminal status
    let poller = StatusPoller::from_config(exchange.clone(), &config);
    let trade_id = execution.trade.id;
    let handle = poller.watch(trade_id, move |status| {
        info!("Trade {} is now {}", trade_id, status);
    });
    handle.wait().await;

    let balance = exchange.get_balance(user_id, "NGN").await?;
    info!("Demo complete; remaining wallet balance {} NGN", balance.available);

    Ok(())
}
