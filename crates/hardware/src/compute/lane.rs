//! Compute Lanes and Operation Descriptors.
//!
//! A lane is one parallel slot of the compute unit. During a batch each active lane
//! holds one vector element: it turns busy at decode, receives its two inputs at
//! fetch, computes its output at execute and is cleared again at writeback.

use serde::Serialize;

use crate::common::ComputeAddr;
use crate::isa::VectorOp;

/// Observable state of one parallel lane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Lane {
    /// The lane holds an element of the current batch.
    pub busy: bool,
    /// Operation the lane was decoded for.
    pub opcode: Option<VectorOp>,
    /// Source element (`a`).
    pub input_a: u16,
    /// Destination element (`b`), or zero for operations that do not read it.
    pub input_b: u16,
    /// Result of the execute phase.
    pub output: u16,
}

impl Lane {
    /// Returns the lane to idle.
    #[inline(always)]
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// An operation accepted by the compute unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PendingOp {
    /// Operation to run.
    pub op: VectorOp,
    /// First source element (`a`).
    pub src: ComputeAddr,
    /// First destination element (`b`, and the write target).
    pub dst: ComputeAddr,
    /// Number of elements.
    pub len: usize,
    /// Scalar operand of `SCALE`.
    pub scalar: Option<u16>,
}

impl PendingOp {
    /// Creates an operation descriptor.
    pub const fn new(
        op: VectorOp,
        src: ComputeAddr,
        dst: ComputeAddr,
        len: usize,
        scalar: Option<u16>,
    ) -> Self {
        Self {
            op,
            src,
            dst,
            len,
            scalar,
        }
    }

    /// Number of batches needed with `lanes` parallel lanes.
    pub const fn batches(&self, lanes: usize) -> usize {
        self.len.div_ceil(lanes)
    }
}
