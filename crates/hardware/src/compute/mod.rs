//! Lock-Step Compute Unit.
//!
//! This module implements the secondary parallel unit driven by the CPU's bridge
//! instructions. It provides:
//! 1. **Memory:** A private 128-cell memory, reachable from the CPU only through bulk
//!    and point transfers.
//! 2. **Lanes:** A fixed number of parallel lanes that process a vector in batches.
//! 3. **Phase Stepper:** A single incremental state machine that advances one
//!    decode/fetch/execute/writeback phase per call, plus a `drain` loop over it.
//! 4. **Observability:** Per-phase events carrying a snapshot and the active lanes.

/// Compute unit events and snapshots.
pub mod events;

/// Lane state and operation descriptors.
pub mod lane;

/// Per-element operation semantics.
pub mod ops;

pub use events::{ComputeEvent, ComputeSnapshot};
pub use lane::{Lane, PendingOp};

use serde::Serialize;

use crate::common::constants::{COMPUTE_MEMORY_SIZE, DEFAULT_LANES};
use crate::common::{
    ComputeAddr, ComputeError, EventBus, ListenerId, PrimaryAddr, TransferDirection,
};
use crate::core::pipeline::{MicroOp, Stage};
use crate::isa::VectorOp;
use crate::stats::ComputeStats;

/// Result of one call to [`ComputeUnit::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "stage", rename_all = "snake_case")]
pub enum StepOutcome {
    /// No operation is queued or running; nothing happened.
    Idle,
    /// One phase ran and the operation is still in flight.
    Advanced(Stage),
    /// The operation finished during this call.
    Completed,
}

/// The operation currently being stepped.
#[derive(Clone, Copy, Debug)]
struct ActiveOp {
    op: PendingOp,
    batch: usize,
    batches: usize,
    /// Last phase run for the current batch.
    phase: Option<Stage>,
}

impl ActiveOp {
    const fn next_phase(&self) -> Stage {
        match self.phase {
            None | Some(Stage::Writeback) => Stage::Decode,
            Some(Stage::Decode) => Stage::Fetch,
            Some(Stage::Fetch) => Stage::Execute,
            Some(Stage::Execute) => Stage::Writeback,
        }
    }
}

/// The parallel compute unit.
#[derive(Debug)]
pub struct ComputeUnit {
    memory: Vec<u16>,
    lanes: Vec<Lane>,
    pending: Option<PendingOp>,
    active: Option<ActiveOp>,
    busy: bool,
    result: u16,
    events: EventBus<ComputeEvent>,
    /// Phase, batch and transfer counters.
    pub stats: ComputeStats,
}

impl Default for ComputeUnit {
    fn default() -> Self {
        Self::new(DEFAULT_LANES)
    }
}

impl ComputeUnit {
    /// Creates an idle compute unit.
    ///
    /// # Arguments
    ///
    /// * `lanes` - Number of parallel lanes; zero is treated as one.
    pub fn new(lanes: usize) -> Self {
        Self {
            memory: vec![0; COMPUTE_MEMORY_SIZE],
            lanes: vec![Lane::default(); lanes.max(1)],
            pending: None,
            active: None,
            busy: false,
            result: 0,
            events: EventBus::new(),
            stats: ComputeStats::default(),
        }
    }

    /// Compute memory contents.
    pub fn memory(&self) -> &[u16] {
        &self.memory
    }

    /// Lane states.
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Number of parallel lanes.
    #[inline(always)]
    pub const fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Returns `true` while an operation is queued or running.
    #[inline(always)]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Result register.
    #[inline(always)]
    pub const fn result(&self) -> u16 {
        self.result
    }

    /// Queued operation not yet picked up by [`ComputeUnit::step`].
    pub const fn pending(&self) -> Option<&PendingOp> {
        self.pending.as_ref()
    }

    /// Operation currently being stepped.
    pub fn active(&self) -> Option<&PendingOp> {
        self.active.as_ref().map(|a| &a.op)
    }

    /// Last phase run for the current batch, `None` when idle.
    pub fn phase(&self) -> Option<Stage> {
        self.active.and_then(|a| a.phase)
    }

    /// Current batch index and total batch count of the running operation.
    pub fn batch_progress(&self) -> Option<(usize, usize)> {
        self.active.map(|a| (a.batch, a.batches))
    }

    /// Returns `true` if a call to [`ComputeUnit::step`] would do work.
    pub const fn has_work(&self) -> bool {
        self.pending.is_some() || self.active.is_some()
    }

    /// Reads one compute memory cell.
    #[inline(always)]
    pub fn read(&self, addr: ComputeAddr) -> u16 {
        self.memory[addr.val()]
    }

    /// Writes one compute memory cell.
    #[inline(always)]
    pub fn write(&mut self, addr: ComputeAddr, value: u16) {
        self.memory[addr.val()] = value;
    }

    /// Captures an owned snapshot of the observable state.
    pub fn snapshot(&self) -> ComputeSnapshot {
        ComputeSnapshot {
            memory: self.memory.clone(),
            lanes: self.lanes.clone(),
            busy: self.busy,
            result: self.result,
            pending: self.pending,
            active: self.active.map(|a| a.op),
            phase: self.phase(),
            batch: self.batch_progress(),
        }
    }

    /// Registers an event listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ComputeEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    /// Removes an event listener; returns `true` if it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    fn publish(&mut self, make: impl FnOnce(&Self) -> ComputeEvent) {
        if self.events.has_listeners() {
            let event = make(self);
            self.events.emit(&event);
        }
    }

    /// Copies a block of primary memory into compute memory.
    ///
    /// Both sides wrap at the end of their memory. The copy completes before this
    /// returns, so it is atomic with respect to interleaved stepping.
    ///
    /// # Arguments
    ///
    /// * `primary` - The CPU's primary memory.
    /// * `src` - First primary cell to read.
    /// * `dst` - First compute cell to write.
    /// * `len` - Number of words.
    pub fn bulk_load(&mut self, primary: &[u16], src: PrimaryAddr, dst: ComputeAddr, len: usize) {
        for i in 0..len {
            let word = primary.get(src.offset(i).val()).copied().unwrap_or_default();
            self.memory[dst.offset(i).val()] = word;
        }
        self.finish_transfer(TransferDirection::ToCompute, len);
    }

    /// Copies a block of compute memory into primary memory.
    ///
    /// # Arguments
    ///
    /// * `primary` - The CPU's primary memory.
    /// * `src` - First compute cell to read.
    /// * `dst` - First primary cell to write.
    /// * `len` - Number of words.
    pub fn bulk_store(
        &mut self,
        primary: &mut [u16],
        src: ComputeAddr,
        dst: PrimaryAddr,
        len: usize,
    ) {
        for i in 0..len {
            if let Some(cell) = primary.get_mut(dst.offset(i).val()) {
                *cell = self.memory[src.offset(i).val()];
            }
        }
        self.finish_transfer(TransferDirection::ToPrimary, len);
    }

    fn finish_transfer(&mut self, direction: TransferDirection, words: usize) {
        self.stats.words_transferred += words as u64;
        tracing::debug!(direction = direction.label(), words, "compute transfer");
        self.publish(|unit| ComputeEvent::Transfer {
            state: unit.snapshot(),
            direction,
            words,
        });
    }

    /// Queues an operation and marks the unit busy.
    ///
    /// # Arguments
    ///
    /// * `op` - Operation to run.
    /// * `src` - First source element.
    /// * `dst` - First destination element.
    /// * `len` - Number of elements.
    /// * `scalar` - Scalar operand of `SCALE`.
    ///
    /// # Returns
    ///
    /// `ComputeError::Busy` if an operation is already queued or running; the unit
    /// is left untouched in that case.
    pub fn start_operation(
        &mut self,
        op: VectorOp,
        src: ComputeAddr,
        dst: ComputeAddr,
        len: usize,
        scalar: Option<u16>,
    ) -> Result<(), ComputeError> {
        if self.busy {
            let current = self
                .active
                .map(|a| a.op.op)
                .or_else(|| self.pending.map(|p| p.op))
                .unwrap_or(op);
            tracing::warn!(%op, %current, "compute unit busy, operation rejected");
            return Err(ComputeError::Busy(current));
        }
        self.pending = Some(PendingOp::new(op, src, dst, len, scalar));
        self.busy = true;
        tracing::debug!(%op, src = src.val(), dst = dst.val(), len, "compute operation queued");
        Ok(())
    }

    /// Advances the unit by one phase.
    ///
    /// The first call after [`ComputeUnit::start_operation`] consumes the pending
    /// descriptor and runs the first decode phase. Each batch runs decode, fetch,
    /// execute and writeback; the writeback of the last batch clears busy and emits
    /// `Complete`. A zero-length operation completes on its first call.
    ///
    /// # Returns
    ///
    /// `Idle` (and no event) when there is no work.
    pub fn step(&mut self) -> StepOutcome {
        if self.active.is_none() {
            let Some(op) = self.pending.take() else {
                return StepOutcome::Idle;
            };
            for lane in &mut self.lanes {
                lane.clear();
            }
            if op.op.is_reduction() {
                self.result = 0;
            }
            let batches = op.batches(self.lanes.len());
            if batches == 0 {
                return self.complete(op.op);
            }
            self.active = Some(ActiveOp {
                op,
                batch: 0,
                batches,
                phase: None,
            });
        }

        let Some(active) = self.active else {
            return StepOutcome::Idle;
        };
        let stage = active.next_phase();
        let width = self.lanes.len();
        let base = active.batch * width;
        let count = width.min(active.op.len - base);
        let PendingOp {
            op,
            src,
            dst,
            scalar,
            ..
        } = active.op;

        let micro = match stage {
            Stage::Decode => {
                for lane in &mut self.lanes[..count] {
                    lane.busy = true;
                    lane.opcode = Some(op);
                }
                MicroOp::new(
                    stage,
                    format!(
                        "Decode {op} for batch {}/{} ({count} lane(s))",
                        active.batch + 1,
                        active.batches
                    ),
                )
            }
            Stage::Fetch => {
                for (i, lane) in self.lanes[..count].iter_mut().enumerate() {
                    lane.input_a = self.memory[src.offset(base + i).val()];
                    lane.input_b = if op.reads_destination() {
                        self.memory[dst.offset(base + i).val()]
                    } else {
                        0
                    };
                }
                MicroOp::new(stage, format!("Fetch {count} element(s)"))
                    .with_source(format!("GPU[{}]", src.offset(base).val()))
            }
            Stage::Execute => {
                for lane in &mut self.lanes[..count] {
                    lane.output = ops::execute(op, lane.input_a, lane.input_b, scalar);
                }
                MicroOp::new(stage, format!("Execute {op} on {count} lane(s)"))
            }
            Stage::Writeback => {
                for (i, lane) in self.lanes[..count].iter_mut().enumerate() {
                    if op.is_reduction() {
                        self.result = ops::fold(op, self.result, lane.output, base + i == 0);
                    } else {
                        self.memory[dst.offset(base + i).val()] = lane.output;
                    }
                    lane.clear();
                }
                let target = if op.is_reduction() {
                    "RESULT".to_string()
                } else {
                    format!("GPU[{}]", dst.offset(base).val())
                };
                MicroOp::new(stage, format!("Write back {count} element(s)"))
                    .with_destination(target)
                    .with_value(op.is_reduction().then_some(i64::from(self.result)))
            }
        };

        self.stats.phases += 1;
        tracing::trace!(%stage, %op, batch = active.batch, lanes = count, "compute phase");

        let mut next = active;
        next.phase = Some(stage);
        self.active = Some(next);
        let lanes: Vec<usize> = (0..count).collect();
        self.publish(|unit| ComputeEvent::phase(stage, unit.snapshot(), lanes, micro));

        if stage == Stage::Writeback {
            self.stats.batches += 1;
            next.batch += 1;
            next.phase = None;
            if next.batch == next.batches {
                self.active = None;
                return self.complete(op);
            }
            self.active = Some(next);
        }
        StepOutcome::Advanced(stage)
    }

    fn complete(&mut self, op: VectorOp) -> StepOutcome {
        self.busy = false;
        self.stats.operations += 1;
        tracing::debug!(%op, result = self.result, "compute operation complete");
        self.publish(|unit| ComputeEvent::Complete {
            state: unit.snapshot(),
            op,
        });
        StepOutcome::Completed
    }

    /// Steps until no work remains.
    ///
    /// Every intermediate phase event is emitted. No new operation can be started
    /// while draining.
    ///
    /// # Returns
    ///
    /// The number of phases stepped.
    pub fn drain(&mut self) -> u64 {
        let mut phases = 0;
        while self.has_work() {
            let _ = self.step();
            phases += 1;
        }
        phases
    }

    /// Reinitializes memory, lanes, queued and running work and the result register.
    pub fn reset(&mut self) {
        self.memory.fill(0);
        for lane in &mut self.lanes {
            lane.clear();
        }
        self.pending = None;
        self.active = None;
        self.busy = false;
        self.result = 0;
        self.stats = ComputeStats::default();
        tracing::debug!("compute unit reset");
        self.publish(|unit| ComputeEvent::Reset {
            state: unit.snapshot(),
        });
    }
}
