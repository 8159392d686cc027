//! Payment processing for the trustBank trade engine
//!
//! Each payment method is a strategy object implementing
//! [`PaymentProcessor`]; the [`PaymentProcessorFactory`] resolves the
//! processor for a trade's declared payment method by a pure string lookup.

pub mod processor;
pub mod wallet;
pub mod bank_transfer;
pub mod card;
pub mod factory;

pub use processor::PaymentProcessor;
pub use wallet::WalletProcessor;
pub use bank_transfer::BankTransferProcessor;
pub use card::CardProcessor;
pub use factory::PaymentProcessorFactory;
