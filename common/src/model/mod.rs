//! Domain models for the trade engine

pub mod quote;
pub mod trade;
pub mod payment;
pub mod wallet;
pub mod currency;
