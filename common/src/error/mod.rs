//! Error types for the trade engine
//!
//! This module provides a unified error handling system for all service
//! crates in the trade engine. It defines standard error types that can be
//! used across service boundaries and provides consistent error conversion.

use std::fmt::Display;
use thiserror::Error;

use crate::model::trade::Trade;

/// Trade engine error type
#[derive(Debug, Error)]
pub enum Error {
    /// Error for missing or malformed request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error when an amount is below the currency minimum
    #[error("Amount too low: {0}")]
    AmountTooLow(String),

    /// Error when an amount exceeds the currency maximum
    #[error("Amount too high: {0}")]
    AmountTooHigh(String),

    /// Error when a wallet has insufficient funds
    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),

    /// Error when a payment method has no registered processor
    #[error("Unsupported payment method: {0}")]
    UnsupportedPaymentMethod(String),

    /// Error when a quote has expired or is no longer held
    #[error("Quote expired: {0}")]
    QuoteExpired(String),

    /// Error when a quote cannot be found
    #[error("Quote not found: {0}")]
    QuoteNotFound(String),

    /// Error when a trade cannot be found
    #[error("Trade not found: {0}")]
    TradeNotFound(String),

    /// Error returned by the external exchange
    #[error("Exchange error: {0}")]
    ExchangeRejected(String),

    /// Error when payment fails after a quote was confirmed into a trade
    ///
    /// Carries the confirmed trade so the caller can still poll its status
    /// or surface its reference; only the payment step is lost.
    #[error("Payment failed: {source}")]
    PaymentFailed {
        /// The trade the exchange created from the confirmed quote
        trade: Box<Trade>,
        /// The underlying payment error
        source: Box<Error>,
    },

    /// Generic validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Decimal conversion error
    #[error("Decimal conversion error: {0}")]
    DecimalError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait to add context to error results
pub trait ErrorExt<T> {
    /// Add context information to an error
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T> ErrorExt<T> for Result<T> {
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        self.map_err(|e| {
            let context = context_fn().to_string();
            match e {
                Error::InvalidInput(msg) => Error::InvalidInput(format!("{}: {}", context, msg)),
                Error::AmountTooLow(msg) => Error::AmountTooLow(format!("{}: {}", context, msg)),
                Error::AmountTooHigh(msg) => Error::AmountTooHigh(format!("{}: {}", context, msg)),
                Error::InsufficientBalance(msg) => Error::InsufficientBalance(format!("{}: {}", context, msg)),
                Error::UnsupportedPaymentMethod(msg) => Error::UnsupportedPaymentMethod(format!("{}: {}", context, msg)),
                Error::QuoteExpired(msg) => Error::QuoteExpired(format!("{}: {}", context, msg)),
                Error::QuoteNotFound(msg) => Error::QuoteNotFound(format!("{}: {}", context, msg)),
                Error::TradeNotFound(msg) => Error::TradeNotFound(format!("{}: {}", context, msg)),
                Error::ExchangeRejected(msg) => Error::ExchangeRejected(format!("{}: {}", context, msg)),
                Error::PaymentFailed { trade, source } => Error::PaymentFailed { trade, source },
                Error::ValidationError(msg) => Error::ValidationError(format!("{}: {}", context, msg)),
                Error::ConfigurationError(msg) => Error::ConfigurationError(format!("{}: {}", context, msg)),
                Error::Internal(msg) => Error::Internal(format!("{}: {}", context, msg)),
                Error::Http(e) => Error::Http(e),
                Error::Serialization(e) => Error::Serialization(e),
                Error::DecimalError(msg) => Error::DecimalError(format!("{}: {}", context, msg)),
            }
        })
    }
}

/// Convert string messages into an error
impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Internal(message)
    }
}

/// Convert static string references into an error
impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::Internal(message.to_string())
    }
}

/// From rust_decimal::Error
impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::DecimalError(err.to_string())
    }
}
