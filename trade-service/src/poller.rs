//! Trade status polling

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use common::model::trade::TradeStatus;
use exchange_client::ExchangeApi;

use crate::config::TradeServiceConfig;

/// Consecutive failed status checks tolerated before a poll gives up
const MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Handle to a running status poll
///
/// Dropping the handle does not stop the poll; call [`PollHandle::stop`] to
/// tear it down early, or [`PollHandle::wait`] to block until a terminal
/// status is reached.
pub struct PollHandle {
    handle: JoinHandle<()>,
}

impl PollHandle {
    /// Stop polling immediately
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Whether the poll loop has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the poll loop to exit
    pub async fn wait(self) {
        let _ = self.handle.await;
    }
}

/// Polls a trade's status until it settles
///
/// Checks once immediately, then on a fixed interval. Polling stops for
/// good once a terminal status (completed or failed) is observed. A failed
/// check is logged and the schedule continues, but after
/// [`MAX_CONSECUTIVE_FAILURES`] failures in a row the poll gives up rather
/// than hold its task open against a dead endpoint.
pub struct StatusPoller {
    exchange: Arc<dyn ExchangeApi>,
    interval: Duration,
}

impl StatusPoller {
    /// Create a poller with an explicit interval
    pub fn new(exchange: Arc<dyn ExchangeApi>, interval: Duration) -> Self {
        Self { exchange, interval }
    }

    /// Create a poller using the configured interval
    pub fn from_config(exchange: Arc<dyn ExchangeApi>, config: &TradeServiceConfig) -> Self {
        Self::new(exchange, Duration::from_secs(config.poll_interval_secs))
    }

    /// Start polling a trade, reporting each observed status to the callback
    pub fn watch<F>(&self, trade_id: Uuid, on_status: F) -> PollHandle
    where
        F: Fn(TradeStatus) + Send + Sync + 'static,
    {
        let exchange = self.exchange.clone();
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut failures = 0u32;
            loop {
                // First tick completes immediately, giving the immediate
                // initial check.
                ticker.tick().await;
                match exchange.trade_status(trade_id).await {
                    Ok(status) => {
                        failures = 0;
                        debug!("Trade {} status: {}", trade_id, status);
                        on_status(status);
                        if status.is_terminal() {
                            debug!("Trade {} settled as {}, polling stopped", trade_id, status);
                            return;
                        }
                    }
                    Err(e) => {
                        failures += 1;
                        warn!(
                            "Status check for trade {} failed ({}/{}): {}",
                            trade_id, failures, MAX_CONSECUTIVE_FAILURES, e
                        );
                        if failures >= MAX_CONSECUTIVE_FAILURES {
                            warn!("Giving up on trade {} after repeated failed checks", trade_id);
                            return;
                        }
                    }
                }
            }
        });

        PollHandle { handle }
    }
}
