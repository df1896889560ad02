//! ALU logical operations.
//!
//! Implements bitwise AND, OR, XOR and NOT. On 16-bit operands these never leave
//! the unsigned 16-bit range, so they never set carry.

use crate::common::constants::WORD_MASK;
use crate::core::pipeline::signals::AluOp;

/// Executes a logical operation.
///
/// # Arguments
///
/// * `op` - The ALU operation to perform (must be a logic variant).
/// * `a`  - First operand.
/// * `b`  - Second operand (ignored by `Not`).
///
/// # Returns
///
/// The result. `Not` complements within 16 bits. Returns `0` for non-logic opcodes.
pub const fn execute(op: AluOp, a: i64, b: i64) -> i64 {
    match op {
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Xor => a ^ b,
        AluOp::Not => a ^ WORD_MASK,
        _ => 0,
    }
}
