//! Common utilities and types used throughout the simulator.
//!
//! This module provides fundamental building blocks that are shared across the assembler,
//! the primary unit and the compute unit. It includes:
//! 1. **Address Types:** Wrapping addresses for primary and compute memory.
//! 2. **Constants:** Word width, memory sizes, register count and lane defaults.
//! 3. **Transfers:** Direction of copies across the unit boundary.
//! 4. **Error Handling:** Diagnostics, runtime faults and configuration errors.
//! 5. **Events:** The per-instance listener registry used by both engines.
//! 6. **Register Management:** The 16-bit register file and register indices.

/// Address type definitions (primary and compute addresses).
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Cross-unit transfer definitions.
pub mod data;

/// Error types and diagnostics.
pub mod error;

/// Listener registry for engine events.
pub mod event;

/// Register file implementation.
pub mod reg;

pub use addr::{ComputeAddr, PrimaryAddr};
pub use data::TransferDirection;
pub use error::{AsmErrorKind, ComputeError, ConfigError, DecodeError, Diagnostic, ExecError};
pub use event::{EventBus, ListenerId};
pub use reg::{Reg, RegisterFile};
