//! Register File.
//!
//! This module provides the `RegisterFile` struct holding the eight 16-bit
//! general-purpose registers of the primary unit, and the `Reg` index type that
//! can only name a register that exists. It provides:
//! 1. **Storage:** Fixed storage for `R0`-`R7`.
//! 2. **Invariant Enforcement:** Every write is masked to 16 bits.
//! 3. **Observability:** Debugging utilities for dumping register state.

use std::fmt;

use serde::Serialize;

use super::constants::REGISTER_COUNT;

/// A validated register index in `0..REGISTER_COUNT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Reg(u8);

impl Reg {
    /// Creates a register index, rejecting indices outside the register file.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register number (0-7).
    ///
    /// # Returns
    ///
    /// `Some(Reg)` for a valid index, `None` otherwise.
    pub const fn new(idx: usize) -> Option<Self> {
        if idx < REGISTER_COUNT {
            Some(Self(idx as u8))
        } else {
            None
        }
    }

    /// Returns the register number.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// General-purpose register file of the primary unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u16; REGISTER_COUNT],
}

impl RegisterFile {
    /// Creates a new register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register.
    #[inline(always)]
    pub const fn read(&self, reg: Reg) -> u16 {
        self.regs[reg.index()]
    }

    /// Writes a register.
    #[inline(always)]
    pub fn write(&mut self, reg: Reg, val: u16) {
        self.regs[reg.index()] = val;
    }

    /// Returns all register values in index order.
    pub const fn values(&self) -> [u16; REGISTER_COUNT] {
        self.regs
    }

    /// Returns the indices of registers whose value differs from `before`.
    ///
    /// # Arguments
    ///
    /// * `before` - Register values captured before an instruction committed.
    ///
    /// # Returns
    ///
    /// Ascending list of changed register indices.
    pub fn changed_since(&self, before: &[u16; REGISTER_COUNT]) -> Vec<usize> {
        self.regs
            .iter()
            .zip(before.iter())
            .enumerate()
            .filter(|(_, (now, then))| now != then)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Dumps the contents of all registers to stdout.
    pub fn dump(&self) {
        for i in (0..REGISTER_COUNT).step_by(4) {
            println!(
                "R{}={:#06x} R{}={:#06x} R{}={:#06x} R{}={:#06x}",
                i,
                self.regs[i],
                i + 1,
                self.regs[i + 1],
                i + 2,
                self.regs[i + 2],
                i + 3,
                self.regs[i + 3]
            );
        }
    }
}
