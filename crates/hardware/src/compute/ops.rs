//! Per-element semantics of the compute operations.
//!
//! `a` is the source element, `b` the destination element. Every result is a 16-bit
//! word; reductions fold these per-lane outputs into the result register at
//! writeback.

use crate::common::constants::{SIGN_BIT, WORD_MASK};
use crate::isa::VectorOp;

/// Computes one lane's output.
///
/// # Arguments
///
/// * `op` - The operation being executed.
/// * `a` - Source element.
/// * `b` - Destination element (zero when the operation does not read it).
/// * `scalar` - Scalar operand; `SCALE` without one multiplies by 1.
///
/// # Returns
///
/// The lane output, masked to 16 bits.
pub fn execute(op: VectorOp, a: u16, b: u16, scalar: Option<u16>) -> u16 {
    let (wa, wb) = (i64::from(a), i64::from(b));
    let raw = match op {
        VectorOp::Add => wa + wb,
        VectorOp::Sub => wa - wb,
        VectorOp::Mul | VectorOp::Dot => wa * wb,
        VectorOp::Div => {
            if b == 0 {
                0
            } else {
                wa / wb
            }
        }
        VectorOp::Scale => wa * i64::from(scalar.unwrap_or(1)),
        VectorOp::Abs => {
            if a & SIGN_BIT == 0 {
                wa
            } else {
                0x1_0000 - wa
            }
        }
        VectorOp::Sqrt => i64::from(u32::from(a).isqrt()),
        VectorOp::Sum | VectorOp::Max | VectorOp::Min | VectorOp::Copy => wa,
    };
    (raw & WORD_MASK) as u16
}

/// Folds one lane output into the result register of a reduction.
///
/// # Arguments
///
/// * `op` - A reduction operation.
/// * `acc` - Current result register value.
/// * `value` - Lane output.
/// * `first` - `value` is the first element of the vector (seeds `MAX`/`MIN`).
pub fn fold(op: VectorOp, acc: u16, value: u16, first: bool) -> u16 {
    match op {
        VectorOp::Max | VectorOp::Min if first => value,
        VectorOp::Max => acc.max(value),
        VectorOp::Min => acc.min(value),
        _ => ((i64::from(acc) + i64::from(value)) & WORD_MASK) as u16,
    }
}
