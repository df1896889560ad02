//! Primary and Compute Address types.
//!
//! This module defines strong types for the two address spaces of the machine so the
//! 256-cell primary memory and the 128-cell compute memory are never mixed up. It provides:
//! 1. **Type Safety:** Distinguishes primary and compute addresses at compile time.
//! 2. **Wrapping:** Every constructor and offset reduces modulo the size of its memory.
//! 3. **Bulk Transfer Support:** Element-wise offsets for vector and block copies.

use serde::Serialize;

use super::constants::{COMPUTE_MEMORY_SIZE, MEMORY_SIZE};

/// An address into the CPU's primary memory.
///
/// Always lies in `0..MEMORY_SIZE`; larger raw values wrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PrimaryAddr(usize);

/// An address into the Compute Unit's memory.
///
/// Always lies in `0..COMPUTE_MEMORY_SIZE`; larger raw values wrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ComputeAddr(usize);

impl PrimaryAddr {
    /// Creates a primary address from a raw word, wrapping modulo the memory size.
    ///
    /// # Arguments
    ///
    /// * `raw` - The unmasked address value.
    ///
    /// # Returns
    ///
    /// The wrapped `PrimaryAddr`.
    #[inline(always)]
    pub const fn new(raw: usize) -> Self {
        Self(raw % MEMORY_SIZE)
    }

    /// Returns the cell index.
    #[inline(always)]
    pub const fn val(self) -> usize {
        self.0
    }

    /// Returns the address `n` cells further on, wrapping at the top of memory.
    #[inline(always)]
    pub const fn offset(self, n: usize) -> Self {
        Self::new(self.0 + n % MEMORY_SIZE)
    }

    /// Returns the address one cell below, wrapping from 0 to the top of memory.
    #[inline(always)]
    pub const fn pred(self) -> Self {
        Self::new(self.0 + MEMORY_SIZE - 1)
    }
}

impl ComputeAddr {
    /// Creates a compute address from a raw word, wrapping modulo the compute memory size.
    ///
    /// # Arguments
    ///
    /// * `raw` - The unmasked address value.
    ///
    /// # Returns
    ///
    /// The wrapped `ComputeAddr`.
    #[inline(always)]
    pub const fn new(raw: usize) -> Self {
        Self(raw % COMPUTE_MEMORY_SIZE)
    }

    /// Returns the cell index.
    #[inline(always)]
    pub const fn val(self) -> usize {
        self.0
    }

    /// Returns the address `n` cells further on, wrapping at the end of compute memory.
    #[inline(always)]
    pub const fn offset(self, n: usize) -> Self {
        Self::new(self.0 + n % COMPUTE_MEMORY_SIZE)
    }
}
