//! Simulation driver and program loading.
//!
//! Provides the `Simulator` facade that builds a CPU from a configuration and drives
//! it with bounded run loops, and a loader that assembles source files from disk.

/// Source file loading.
pub mod loader;

/// Simulator facade and run loops.
pub mod simulator;

pub use loader::{LoadError, load_program};
pub use simulator::{RunOutcome, Simulator};
