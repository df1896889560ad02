//! ALU arithmetic operations.
//!
//! Implements addition, subtraction, multiplication, floor division, remainder,
//! increment and decrement on zero-extended 16-bit operands. Results are returned
//! unmasked so the caller can derive the carry and negative flags.

use crate::common::ExecError;
use crate::core::pipeline::signals::AluOp;

/// Executes an integer arithmetic operation.
///
/// # Arguments
///
/// * `op` - The ALU operation to perform (must be an arithmetic variant).
/// * `a`  - First operand, zero-extended from 16 bits.
/// * `b`  - Second operand, zero-extended from 16 bits.
///
/// # Returns
///
/// The unmasked result, or `DivisionByZero`. Returns `0` for non-arithmetic opcodes.
pub fn execute(op: AluOp, a: i64, b: i64) -> Result<i64, ExecError> {
    Ok(match op {
        AluOp::Add => a + b,
        AluOp::Sub => a - b,
        AluOp::Mul => a * b,
        AluOp::Div => {
            if b == 0 {
                return Err(ExecError::DivisionByZero);
            }
            a / b
        }
        AluOp::Mod => {
            if b == 0 {
                return Err(ExecError::DivisionByZero);
            }
            a % b
        }
        AluOp::Inc => a + 1,
        AluOp::Dec => a - 1,
        _ => 0,
    })
}
