use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::model::trade::TradeStatus;
use exchange_client::MockExchange;
use trade_service::StatusPoller;
use uuid::Uuid;

fn collector() -> (Arc<Mutex<Vec<TradeStatus>>>, impl Fn(TradeStatus) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let callback = move |status| sink.lock().unwrap().push(status);
    (seen, callback)
}

#[tokio::test(start_paused = true)]
async fn polling_stops_once_completed() {
    let exchange = Arc::new(MockExchange::new());
    let trade_id = Uuid::new_v4();
    exchange.script_status(
        trade_id,
        vec![TradeStatus::Pending, TradeStatus::Processing, TradeStatus::Completed],
    );

    let poller = StatusPoller::new(exchange.clone(), Duration::from_secs(5));
    let (seen, callback) = collector();

    let handle = poller.watch(trade_id, callback);
    handle.wait().await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![TradeStatus::Pending, TradeStatus::Processing, TradeStatus::Completed]
    );
    assert_eq!(exchange.status_calls(), 3);

    // Long after settlement no further checks may be issued
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(exchange.status_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn polling_stops_once_failed() {
    let exchange = Arc::new(MockExchange::new());
    let trade_id = Uuid::new_v4();
    exchange.script_status(trade_id, vec![TradeStatus::Processing, TradeStatus::Failed]);

    let poller = StatusPoller::new(exchange.clone(), Duration::from_secs(5));
    let (seen, callback) = collector();

    let handle = poller.watch(trade_id, callback);
    handle.wait().await;

    assert_eq!(*seen.lock().unwrap(), vec![TradeStatus::Processing, TradeStatus::Failed]);
    assert_eq!(exchange.status_calls(), 2);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(exchange.status_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn teardown_stops_polling_early() {
    let exchange = Arc::new(MockExchange::new());
    let trade_id = Uuid::new_v4();
    // Never reaches a terminal status
    exchange.script_status(trade_id, vec![TradeStatus::Pending]);

    let poller = StatusPoller::new(exchange.clone(), Duration::from_secs(5));
    let (seen, callback) = collector();

    let handle = poller.watch(trade_id, callback);
    tokio::task::yield_now().await;
    assert!(exchange.status_calls() >= 1, "first check happens immediately");

    handle.stop();
    let calls_at_stop = exchange.status_calls();

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(exchange.status_calls(), calls_at_stop);
    assert!(seen.lock().unwrap().iter().all(|s| *s == TradeStatus::Pending));
}

#[tokio::test(start_paused = true)]
async fn a_failed_check_does_not_end_the_schedule() {
    let exchange = Arc::new(MockExchange::new());
    // The exchange does not know the trade yet, so the first checks error
    let trade_id = Uuid::new_v4();

    let poller = StatusPoller::new(exchange.clone(), Duration::from_secs(5));
    let (seen, callback) = collector();

    let handle = poller.watch(trade_id, callback);
    tokio::time::sleep(Duration::from_secs(11)).await;

    assert!(exchange.status_calls() >= 3, "polling must continue through errors");
    assert!(seen.lock().unwrap().is_empty(), "errors are logged, not reported");

    // Once the exchange learns about the trade, the same schedule picks it
    // up and runs to settlement
    exchange.script_status(trade_id, vec![TradeStatus::Processing, TradeStatus::Completed]);
    handle.wait().await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![TradeStatus::Processing, TradeStatus::Completed]
    );
}

#[tokio::test(start_paused = true)]
async fn polling_gives_up_after_repeated_failures() {
    let exchange = Arc::new(MockExchange::new());
    // The exchange never learns about this trade
    let trade_id = Uuid::new_v4();

    let poller = StatusPoller::new(exchange.clone(), Duration::from_secs(5));
    let (seen, callback) = collector();

    let handle = poller.watch(trade_id, callback);
    handle.wait().await;

    assert_eq!(exchange.status_calls(), 5, "the poll gives up after five straight failures");
    assert!(seen.lock().unwrap().is_empty());

    // Nothing keeps checking after the poll gave up
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(exchange.status_calls(), 5);
}
