//! ALU shift operations.
//!
//! Implements logical shift left (SHL) and logical shift right (SHR). The shift
//! amount is masked to 4 bits (0-15). SHL results are returned unmasked so bits
//! shifted past bit 15 show up as carry.

use crate::common::constants::SHIFT_MASK;
use crate::core::pipeline::signals::AluOp;

/// Executes a shift operation.
///
/// # Arguments
///
/// * `op` - The ALU operation to perform (must be a shift variant).
/// * `a`  - The value to be shifted.
/// * `b`  - The shift amount (only the low 4 bits are used).
///
/// # Returns
///
/// The unmasked result. Returns `0` for non-shift opcodes.
pub const fn execute(op: AluOp, a: i64, b: i64) -> i64 {
    let amount = b & SHIFT_MASK as i64;
    match op {
        AluOp::Shl => a << amount,
        AluOp::Shr => a >> amount,
        _ => 0,
    }
}
