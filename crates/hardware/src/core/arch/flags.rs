//! Condition Flags.
//!
//! This module implements the zero/negative/carry flags of the primary unit. It provides:
//! 1. **Flag Derivation:** Flags are always computed from the raw, unmasked result.
//! 2. **Predicate Table:** The single mapping from condition code to flag predicate.

use std::fmt;

use serde::Serialize;

use crate::common::constants::{SIGN_BIT, WORD_MASK, WORD_MAX};
use crate::isa::Condition;

/// Zero, negative and carry flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Flags {
    /// The raw result was exactly zero.
    pub zero: bool,
    /// The raw result was negative, or bit 15 of the masked result is set.
    pub negative: bool,
    /// The raw result fell outside the unsigned 16-bit range.
    pub carry: bool,
}

impl Flags {
    /// Derives flags from an unmasked arithmetic result.
    ///
    /// # Arguments
    ///
    /// * `raw` - The result before masking to 16 bits.
    ///
    /// # Returns
    ///
    /// The flags describing `raw`.
    pub const fn from_result(raw: i64) -> Self {
        let masked = (raw & WORD_MASK) as u16;
        Self {
            zero: raw == 0,
            negative: raw < 0 || masked & SIGN_BIT != 0,
            carry: raw < 0 || raw > WORD_MAX,
        }
    }

    /// Evaluates a condition code against these flags.
    pub const fn satisfies(self, condition: Condition) -> bool {
        match condition {
            Condition::Zero => self.zero,
            Condition::NotZero => !self.zero,
            Condition::Greater => !self.zero && !self.negative,
            Condition::GreaterEqual => !self.negative,
            Condition::Less => self.negative,
            Condition::LessEqual => self.zero || self.negative,
            Condition::Carry => self.carry,
            Condition::NoCarry => !self.carry,
        }
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Z={} N={} C={}",
            u8::from(self.zero),
            u8::from(self.negative),
            u8::from(self.carry)
        )
    }
}
