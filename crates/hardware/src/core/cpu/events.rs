//! CPU Events and Snapshots.
//!
//! Each event carries an owned [`CpuSnapshot`]. Listeners receive shared references
//! and cannot reach back into the CPU that emitted the event.

use serde::Serialize;

use crate::common::constants::REGISTER_COUNT;
use crate::core::arch::Flags;
use crate::core::pipeline::{MicroOp, Stage};

/// Owned copy of the CPU's architectural state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CpuSnapshot {
    /// `R0`-`R7`.
    pub registers: [u16; REGISTER_COUNT],
    /// Primary memory contents.
    pub memory: Vec<u16>,
    /// Condition flags.
    pub flags: Flags,
    /// Program counter (instruction index).
    pub pc: usize,
    /// Stack pointer.
    pub sp: usize,
    /// The CPU is halted.
    pub halted: bool,
    /// Last stage reached by an in-flight micro-stepped instruction.
    pub stage: Option<Stage>,
}

/// Event emitted by the CPU.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CpuEvent {
    /// The CPU was reset.
    Reset {
        /// State after the reset.
        state: CpuSnapshot,
    },
    /// One micro-operation of an instruction was replayed.
    Micro {
        /// State at the time of the micro-operation.
        state: CpuSnapshot,
        /// The micro-operation.
        micro: MicroOp,
    },
    /// An instruction committed.
    Step {
        /// State after the commit.
        state: CpuSnapshot,
        /// Indices of registers whose value changed.
        changed: Vec<usize>,
    },
    /// The CPU halted normally.
    Halt {
        /// State at the halt.
        state: CpuSnapshot,
    },
    /// A fatal runtime error halted the CPU.
    Error {
        /// State at the fault; the failing instruction left no effect.
        state: CpuSnapshot,
        /// Error message.
        message: String,
    },
}

impl CpuEvent {
    /// Returns the snapshot carried by the event.
    pub const fn state(&self) -> &CpuSnapshot {
        match self {
            Self::Reset { state }
            | Self::Micro { state, .. }
            | Self::Step { state, .. }
            | Self::Halt { state }
            | Self::Error { state, .. } => state,
        }
    }

    /// Short event name.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Reset { .. } => "reset",
            Self::Micro { .. } => "micro",
            Self::Step { .. } => "step",
            Self::Halt { .. } => "halt",
            Self::Error { .. } => "error",
        }
    }
}
