//! Decimal type utilities for precise monetary calculations

use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;

/// Exchange rate type with high precision
pub type Rate = Decimal;

/// Currency amount type with high precision
pub type Amount = Decimal;
