//! Common types and utilities for the trustBank trade engine
//!
//! This library contains shared types, utilities, and abstractions used across
//! all service crates in the trade engine. It provides a unified approach to
//! error handling, decimal arithmetic, and domain models.

pub mod error;
pub mod model;
pub mod decimal;

/// Re-export important types
pub use error::{Error, Result, ErrorExt};
pub use decimal::*;
