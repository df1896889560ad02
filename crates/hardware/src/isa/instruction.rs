//! Decoded Instruction representation.
//!
//! A decoded instruction pairs an opcode with its parsed operands. It is the common
//! currency of the assembler's validation pass, the CPU's decode stage and the
//! micro-operation describer.

use std::fmt;

use serde::Serialize;

use crate::isa::{Opcode, Operand};

/// An instruction after decode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Instruction {
    /// The operation.
    pub opcode: Opcode,
    /// Operands in source order. For `GEXEC` the first is an `Operand::VectorOp`.
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Creates an instruction from its parts.
    pub const fn new(opcode: Opcode, operands: Vec<Operand>) -> Self {
        Self { opcode, operands }
    }

    /// Returns the operand at `idx`, if present.
    pub fn operand(&self, idx: usize) -> Option<&Operand> {
        self.operands.get(idx)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for (i, operand) in self.operands.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{operand}")?;
        }
        Ok(())
    }
}
