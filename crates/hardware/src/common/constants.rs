//! Global Machine Constants.
//!
//! This module defines machine-wide constants used across the simulator. It includes:
//! 1. **Word Constants:** Data width, masks and the sign bit of the 16-bit datapath.
//! 2. **Primary Unit Constants:** Register count, memory size and stack origin.
//! 3. **Compute Unit Constants:** Compute memory size and default lane count.
//! 4. **Simulation Constants:** Default bounds for host-driven run loops.

/// Mask selecting the low 16 bits of a raw arithmetic result.
pub const WORD_MASK: i64 = 0xFFFF;

/// Largest value representable in a machine word.
pub const WORD_MAX: i64 = 0xFFFF;

/// Sign bit of a machine word under two's-complement interpretation.
pub const SIGN_BIT: u16 = 0x8000;

/// Mask applied to shift amounts (shifts never exceed the word width).
pub const SHIFT_MASK: u16 = 0xF;

/// Number of general-purpose registers (`R0`-`R7`).
pub const REGISTER_COUNT: usize = 8;

/// Number of addressable cells in primary memory.
pub const MEMORY_SIZE: usize = 256;

/// Initial stack pointer: the top cell of primary memory.
pub const STACK_TOP: usize = MEMORY_SIZE - 1;

/// Number of addressable cells in compute memory.
pub const COMPUTE_MEMORY_SIZE: usize = 128;

/// Default number of parallel compute lanes.
pub const DEFAULT_LANES: usize = 8;

/// Default upper bound on instructions executed by `Simulator::run`.
pub const DEFAULT_MAX_STEPS: u64 = 100_000;
