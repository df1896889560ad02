//! Tandem simulator library.
//!
//! This crate implements a microstep-accurate simulator of a 16-bit register machine
//! coupled to a lock-step parallel compute unit, with the following:
//! 1. **Assembler:** Two-pass assembly of source text into a resolved program, with
//!    batch-collected diagnostics.
//! 2. **Core:** Registers, primary memory, flags, PC/SP and a fetch/decode/execute/
//!    writeback state machine that runs either whole instructions or micro-operations.
//! 3. **Compute Unit:** Parallel lanes processing vectors in batches, one phase per step.
//! 4. **ISA:** Opcodes, operands and textual decoding shared by the assembler and the CPU.
//! 5. **Simulation:** Configuration, statistics, a simulator facade and a source loader.
//!
//! # Examples
//!
//! ```
//! use tandem_core::{Config, Simulator};
//! use tandem_core::sim::RunOutcome;
//!
//! let mut sim = Simulator::new(&Config::default());
//! sim.load_source("MOV R0, 6\nMUL R0, 7\nHLT").unwrap();
//! assert_eq!(sim.run(), RunOutcome::Halted { steps: 3 });
//! assert_eq!(sim.cpu.registers()[0], 42);
//! ```

/// Two-pass assembler and the resolved program artifact.
pub mod asm;
/// Common types and constants (addresses, registers, events, errors).
pub mod common;
/// Lock-step parallel compute unit.
pub mod compute;
/// Simulator configuration (defaults, hierarchical config structures).
pub mod config;
/// Primary unit (flags, ALU, pipeline description, CPU).
pub mod core;
/// Instruction set (opcodes, operands, decode).
pub mod isa;
/// Simulator facade and source loader.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Resolved program; produce one with `asm::assemble`.
pub use crate::asm::Program;
/// Compute unit type; attached to the CPU through `Config::compute`.
pub use crate::compute::ComputeUnit;
/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Main CPU type; holds registers, memory, flags and the attached compute unit.
pub use crate::core::Cpu;
/// Simulator facade; owns a `Cpu` built from a `Config`.
pub use crate::sim::Simulator;
