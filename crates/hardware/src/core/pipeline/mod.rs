//! Instruction pipeline description.
//!
//! The primary unit does not overlap instructions; its pipeline is a state machine
//! that walks one instruction at a time through fetch, decode, execute and writeback.
//! This module contains the vocabulary of that state machine:
//! 1. **Signals:** ALU operation selection derived from the opcode.
//! 2. **Stages:** The stage tags and the descriptive micro-operation record.
//! 3. **Micro Plans:** The per-opcode list of execute and writeback micro-operations
//!    replayed by `Cpu::micro_step`.

/// Micro-operation plans for each opcode.
pub mod micro;

/// Control signals generated during instruction decode.
pub mod signals;

/// Pipeline stage tags and micro-operation records.
pub mod stage;

pub use stage::{MicroOp, Stage};
