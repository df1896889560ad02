//! Primary unit implementation.
//!
//! This module contains the register-machine CPU: its architectural state, the
//! instruction pipeline state machine, the ALU, and the orchestrator that drives
//! instructions either atomically or one micro-operation at a time.

/// Architectural state components (flags).
pub mod arch;

/// CPU core implementation and execution orchestration.
pub mod cpu;

/// Instruction pipeline description (stages, micro-operations, signals).
pub mod pipeline;

/// Execution units (ALU).
pub mod units;

pub use self::cpu::Cpu;
