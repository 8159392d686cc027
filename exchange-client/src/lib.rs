//! Client for the hosted exchange backing trustBank
//!
//! All balances, quoting, swap execution and settlement live at the external
//! exchange; this crate provides the typed seam the rest of the engine talks
//! through. The [`ExchangeApi`] trait is implemented by
//! [`HttpExchangeClient`] for the real REST surface and by [`MockExchange`]
//! for tests and demos.

pub mod api;
pub mod config;
pub mod http;
pub mod mock;

pub use api::{ExchangeApi, SwapConfirmation};
pub use config::ExchangeConfig;
pub use http::HttpExchangeClient;
pub use mock::MockExchange;
