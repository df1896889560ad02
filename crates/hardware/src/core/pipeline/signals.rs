//! Pipeline control signals and operation types.
//!
//! This module defines the signals that control instruction execution. It performs:
//! 1. **Operation Classification:** Maps ALU-class opcodes to an ALU operation.
//! 2. **Operand Shape:** Distinguishes unary from binary ALU operations.

use serde::Serialize;

use crate::isa::Opcode;

/// ALU operation types for the 16-bit integer datapath.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AluOp {
    /// Default value.
    #[default]
    Add,

    /// Integer subtraction (also used by `CMP`).
    Sub,

    /// Integer multiplication.
    Mul,

    /// Integer floor division.
    Div,

    /// Integer remainder.
    Mod,

    /// Bitwise AND.
    And,

    /// Bitwise OR.
    Or,

    /// Bitwise XOR.
    Xor,

    /// Shift left logical.
    Shl,

    /// Shift right logical.
    Shr,

    /// Bitwise complement within 16 bits.
    Not,

    /// Increment by one.
    Inc,

    /// Decrement by one.
    Dec,
}

impl AluOp {
    /// Selects the ALU operation for an opcode.
    ///
    /// # Arguments
    ///
    /// * `opcode` - A decoded opcode.
    ///
    /// # Returns
    ///
    /// `Some(op)` for arithmetic, logical and compare opcodes, `None` for everything else.
    pub const fn from_opcode(opcode: Opcode) -> Option<Self> {
        Some(match opcode {
            Opcode::Add => Self::Add,
            Opcode::Sub | Opcode::Cmp => Self::Sub,
            Opcode::Mul => Self::Mul,
            Opcode::Div => Self::Div,
            Opcode::Mod => Self::Mod,
            Opcode::And => Self::And,
            Opcode::Or => Self::Or,
            Opcode::Xor => Self::Xor,
            Opcode::Shl => Self::Shl,
            Opcode::Shr => Self::Shr,
            Opcode::Not => Self::Not,
            Opcode::Inc => Self::Inc,
            Opcode::Dec => Self::Dec,
            _ => return None,
        })
    }

    /// Returns `true` for operations that only read their destination register.
    #[inline(always)]
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::Not | Self::Inc | Self::Dec)
    }

    /// Operator symbol used in micro-operation descriptions.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add | Self::Inc => "+",
            Self::Sub | Self::Dec => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Not => "~",
        }
    }
}
