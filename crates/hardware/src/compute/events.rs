//! Compute Unit Events and Snapshots.
//!
//! Every event carries an owned snapshot of the unit, so listeners can keep or
//! serialize it without borrowing the unit.

use serde::Serialize;

use crate::common::TransferDirection;
use crate::compute::lane::{Lane, PendingOp};
use crate::core::pipeline::{MicroOp, Stage};
use crate::isa::VectorOp;

/// Owned copy of the compute unit's observable state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComputeSnapshot {
    /// Compute memory contents.
    pub memory: Vec<u16>,
    /// Lane states, in lane order.
    pub lanes: Vec<Lane>,
    /// An operation is queued or running.
    pub busy: bool,
    /// Result register.
    pub result: u16,
    /// Queued operation not yet picked up by `step`.
    pub pending: Option<PendingOp>,
    /// Operation currently being stepped.
    pub active: Option<PendingOp>,
    /// Last phase run for the current batch.
    pub phase: Option<Stage>,
    /// Current batch index and total batch count.
    pub batch: Option<(usize, usize)>,
}

/// Event emitted by the compute unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComputeEvent {
    /// The unit was reset.
    Reset {
        /// State after the reset.
        state: ComputeSnapshot,
    },
    /// Active lanes were decoded for the current batch.
    Decode {
        /// State after the phase.
        state: ComputeSnapshot,
        /// Indices of the lanes taking part in the batch.
        lanes: Vec<usize>,
        /// Description of the phase.
        micro: MicroOp,
    },
    /// Active lanes fetched their inputs.
    Fetch {
        /// State after the phase.
        state: ComputeSnapshot,
        /// Indices of the lanes taking part in the batch.
        lanes: Vec<usize>,
        /// Description of the phase.
        micro: MicroOp,
    },
    /// Active lanes computed their outputs.
    Execute {
        /// State after the phase.
        state: ComputeSnapshot,
        /// Indices of the lanes taking part in the batch.
        lanes: Vec<usize>,
        /// Description of the phase.
        micro: MicroOp,
    },
    /// Active lanes stored or folded their outputs and were cleared.
    Writeback {
        /// State after the phase.
        state: ComputeSnapshot,
        /// Indices of the lanes taking part in the batch.
        lanes: Vec<usize>,
        /// Description of the phase.
        micro: MicroOp,
    },
    /// A bulk copy between primary and compute memory finished.
    Transfer {
        /// State after the copy.
        state: ComputeSnapshot,
        /// Copy direction.
        direction: TransferDirection,
        /// Number of words copied.
        words: usize,
    },
    /// The last batch of an operation was written back.
    Complete {
        /// State after completion.
        state: ComputeSnapshot,
        /// The operation that finished.
        op: VectorOp,
    },
}

impl ComputeEvent {
    /// Builds the phase event for `stage`.
    pub(crate) fn phase(
        stage: Stage,
        state: ComputeSnapshot,
        lanes: Vec<usize>,
        micro: MicroOp,
    ) -> Self {
        match stage {
            Stage::Decode => Self::Decode {
                state,
                lanes,
                micro,
            },
            Stage::Fetch => Self::Fetch {
                state,
                lanes,
                micro,
            },
            Stage::Execute => Self::Execute {
                state,
                lanes,
                micro,
            },
            Stage::Writeback => Self::Writeback {
                state,
                lanes,
                micro,
            },
        }
    }

    /// Returns the snapshot carried by the event.
    pub const fn state(&self) -> &ComputeSnapshot {
        match self {
            Self::Reset { state }
            | Self::Decode { state, .. }
            | Self::Fetch { state, .. }
            | Self::Execute { state, .. }
            | Self::Writeback { state, .. }
            | Self::Transfer { state, .. }
            | Self::Complete { state, .. } => state,
        }
    }

    /// Returns the active lane indices of a phase event.
    pub fn lanes(&self) -> Option<&[usize]> {
        match self {
            Self::Decode { lanes, .. }
            | Self::Fetch { lanes, .. }
            | Self::Execute { lanes, .. }
            | Self::Writeback { lanes, .. } => Some(lanes),
            _ => None,
        }
    }

    /// Returns the micro-operation of a phase event.
    pub const fn micro(&self) -> Option<&MicroOp> {
        match self {
            Self::Decode { micro, .. }
            | Self::Fetch { micro, .. }
            | Self::Execute { micro, .. }
            | Self::Writeback { micro, .. } => Some(micro),
            _ => None,
        }
    }
}
