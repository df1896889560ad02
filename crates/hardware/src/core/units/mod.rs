//! Execution units.
//!
//! The primary unit has a single functional unit, the 16-bit ALU. Parallel work is
//! delegated to the compute unit in [`crate::compute`].

/// Arithmetic Logic Unit for 16-bit integer operations.
pub mod alu;
