//! Trade orchestration for the trustBank exchange front-end
//!
//! Owns the quote lifecycle: validated quote requests, the client-side
//! expiry countdown, confirmation into a trade, payment hand-off, and
//! status polling until settlement.

pub mod config;
pub mod service;
pub mod poller;

pub use config::TradeServiceConfig;
pub use service::{QuoteOutcome, TradeExecution, TradeService};
pub use poller::{PollHandle, StatusPoller};
