//! Shared test infrastructure.

/// The `TestContext` harness.
pub mod harness;

pub use harness::{TestContext, r};
