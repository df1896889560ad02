//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the 16-bit integer ALU used in the Execute stage. Every
//! operation is computed in unmasked signed 64-bit arithmetic; the unit then masks
//! the value to 16 bits and derives the flags from the unmasked result.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub, Mul, Div, Mod, Inc, Dec
//! - [`logic`]:      And, Or, Xor, Not
//! - [`shifts`]:     Shl, Shr

/// Integer arithmetic operations (add, subtract, multiply, divide).
pub mod arithmetic;

/// Bitwise logical operations (and, or, xor, not).
pub mod logic;

/// Shift operations (shl, shr).
pub mod shifts;

use serde::Serialize;

use crate::common::ExecError;
use crate::common::constants::WORD_MASK;
use crate::core::arch::Flags;
use crate::core::pipeline::signals::AluOp;

/// Result of one ALU operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AluOutput {
    /// The unmasked result.
    pub raw: i64,
    /// The result masked to 16 bits, as written to a destination register.
    pub value: u16,
    /// Flags derived from `raw`.
    pub flags: Flags,
}

impl AluOutput {
    /// Wraps a raw result with its masked value and flags.
    pub const fn from_raw(raw: i64) -> Self {
        Self {
            raw,
            value: (raw & WORD_MASK) as u16,
            flags: Flags::from_result(raw),
        }
    }
}

/// Arithmetic Logic Unit (ALU) for 16-bit integer operations.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation.
    ///
    /// Dispatches to the appropriate submodule based on the operation type.
    ///
    /// # Arguments
    ///
    /// * `op` - The ALU operation to perform.
    /// * `a`  - First operand (the destination register's current value).
    /// * `b`  - Second operand (ignored by unary operations).
    ///
    /// # Returns
    ///
    /// The raw result, its 16-bit value and flags, or `DivisionByZero` for
    /// `Div`/`Mod` with `b == 0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tandem_core::core::units::alu::Alu;
    /// use tandem_core::core::pipeline::signals::AluOp;
    ///
    /// let out = Alu::execute(AluOp::Add, 0xFFFF, 1).unwrap();
    /// assert_eq!(out.value, 0);
    /// assert!(out.flags.carry);
    /// assert!(!out.flags.zero); // raw result is 0x10000
    ///
    /// let out = Alu::execute(AluOp::Sub, 3, 5).unwrap();
    /// assert_eq!(out.value, 0xFFFE);
    /// assert!(out.flags.negative);
    /// ```
    pub fn execute(op: AluOp, a: u16, b: u16) -> Result<AluOutput, ExecError> {
        let a = i64::from(a);
        let b = i64::from(b);
        let raw = match op {
            AluOp::Add
            | AluOp::Sub
            | AluOp::Mul
            | AluOp::Div
            | AluOp::Mod
            | AluOp::Inc
            | AluOp::Dec => arithmetic::execute(op, a, b)?,

            AluOp::And | AluOp::Or | AluOp::Xor | AluOp::Not => logic::execute(op, a, b),

            AluOp::Shl | AluOp::Shr => shifts::execute(op, a, b),
        };
        Ok(AluOutput::from_raw(raw))
    }
}
