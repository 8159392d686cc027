//! Test metapackage for the trustbank-engine workspace.
//!
//! The root package carries no code of its own; it exists so the
//! integration tests under `tests/` can drive the full quote, confirmation,
//! payment, and polling flow through the public APIs of the member crates.
