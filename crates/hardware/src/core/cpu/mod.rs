//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which serves as the container for the
//! entire primary unit state. It coordinates the following:
//! 1. **State Management:** Maintains registers, primary memory, flags, PC and SP.
//! 2. **Pipeline Control:** Tracks the instruction in flight between micro-steps.
//! 3. **Compute Unit Attachment:** Owns the optional compute unit driven by bridge opcodes.
//! 4. **Observability:** Owns the CPU's listener registry and statistics.

/// Bridge instructions delegating to the compute unit.
pub mod bridge;

/// CPU events and state snapshots.
pub mod events;

/// Instruction execution orchestration (step, micro-step, commit).
pub mod execution;

/// Memory, stack and operand access.
pub mod memory;

pub use events::{CpuEvent, CpuSnapshot};

use std::collections::VecDeque;

use serde::Serialize;

use crate::asm::Program;
use crate::common::constants::{MEMORY_SIZE, REGISTER_COUNT, STACK_TOP};
use crate::common::{EventBus, ExecError, ListenerId, PrimaryAddr, Reg, RegisterFile};
use crate::compute::ComputeUnit;
use crate::config::Config;
use crate::core::arch::Flags;
use crate::core::pipeline::{MicroOp, Stage};
use crate::isa::Instruction;
use crate::stats::SimStats;

/// Result of one call to [`Cpu::step`] or [`Cpu::micro_step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "stage", rename_all = "snake_case")]
pub enum Progress {
    /// A micro-operation of the given stage was replayed; nothing committed yet.
    Advanced(Stage),
    /// An instruction committed and the CPU is still running.
    Committed,
    /// The CPU is halted (by this call or already before it).
    Halted,
}

/// An instruction between its fetch and its commit.
#[derive(Clone, Debug)]
struct InFlight {
    pc: usize,
    text: String,
    decoded: Option<Instruction>,
    plan: VecDeque<MicroOp>,
    stage: Stage,
}

/// The primary unit: a 16-bit register machine.
#[derive(Debug)]
pub struct Cpu {
    regs: RegisterFile,
    memory: Vec<u16>,
    flags: Flags,
    pc: usize,
    sp: PrimaryAddr,
    halted: bool,
    in_flight: Option<InFlight>,
    program: Program,
    compute: Option<ComputeUnit>,
    events: EventBus<CpuEvent>,
    last_error: Option<ExecError>,

    /// Log every committed instruction at `info` level.
    pub trace: bool,
    /// Execution statistics.
    pub stats: SimStats,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Cpu {
    /// Creates a new CPU with an empty program.
    ///
    /// # Arguments
    ///
    /// * `config` - Simulator configuration; decides whether a compute unit is attached
    ///   and how many lanes it has.
    ///
    /// # Returns
    ///
    /// A reset CPU.
    pub fn new(config: &Config) -> Self {
        let compute = config
            .compute
            .enabled
            .then(|| ComputeUnit::new(config.compute.lanes));
        Self {
            regs: RegisterFile::new(),
            memory: vec![0; MEMORY_SIZE],
            flags: Flags::default(),
            pc: 0,
            sp: PrimaryAddr::new(STACK_TOP),
            halted: false,
            in_flight: None,
            program: Program::default(),
            compute,
            events: EventBus::new(),
            last_error: None,
            trace: config.general.trace_instructions,
            stats: SimStats::default(),
        }
    }

    /// Replaces the loaded program and resets the CPU.
    pub fn load_program(&mut self, program: Program) {
        tracing::debug!(instructions = program.len(), "program loaded");
        self.program = program;
        self.reset();
    }

    /// The loaded program.
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Reinitializes every piece of CPU state and the attached compute unit.
    ///
    /// The loaded program and the registered listeners survive. Emits `Reset`.
    pub fn reset(&mut self) {
        self.regs = RegisterFile::new();
        self.memory.fill(0);
        self.flags = Flags::default();
        self.pc = 0;
        self.sp = PrimaryAddr::new(STACK_TOP);
        self.halted = false;
        self.in_flight = None;
        self.last_error = None;
        self.stats = SimStats::default();
        if let Some(gpu) = self.compute.as_mut() {
            gpu.reset();
        }
        tracing::debug!("cpu reset");
        self.publish(|cpu| CpuEvent::Reset {
            state: cpu.snapshot(),
        });
    }

    /// Register values `R0`-`R7`.
    pub const fn registers(&self) -> [u16; REGISTER_COUNT] {
        self.regs.values()
    }

    /// Reads one register.
    #[inline(always)]
    pub const fn register(&self, reg: Reg) -> u16 {
        self.regs.read(reg)
    }

    /// Primary memory contents.
    pub fn memory(&self) -> &[u16] {
        &self.memory
    }

    /// Condition flags.
    #[inline(always)]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Program counter.
    #[inline(always)]
    pub const fn pc(&self) -> usize {
        self.pc
    }

    /// Stack pointer.
    #[inline(always)]
    pub const fn sp(&self) -> usize {
        self.sp.val()
    }

    /// Returns `true` once `HLT` ran, the program ran out, or a fault occurred.
    #[inline(always)]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// Last stage reached by the micro-stepped instruction in flight, `None` when idle.
    pub fn stage(&self) -> Option<Stage> {
        self.in_flight.as_ref().map(|f| f.stage)
    }

    /// The fault that halted the CPU, if any.
    pub const fn last_error(&self) -> Option<&ExecError> {
        self.last_error.as_ref()
    }

    /// The attached compute unit.
    pub const fn compute(&self) -> Option<&ComputeUnit> {
        self.compute.as_ref()
    }

    /// The attached compute unit, for host-driven stepping.
    pub const fn compute_mut(&mut self) -> Option<&mut ComputeUnit> {
        self.compute.as_mut()
    }

    /// Attaches a compute unit, returning the one it replaces.
    pub const fn attach_compute(&mut self, unit: ComputeUnit) -> Option<ComputeUnit> {
        self.compute.replace(unit)
    }

    /// Detaches the compute unit.
    pub const fn detach_compute(&mut self) -> Option<ComputeUnit> {
        self.compute.take()
    }

    /// Sets a register (host and test helper; emits no event).
    pub fn set_register(&mut self, reg: Reg, value: u16) {
        self.regs.write(reg, value);
    }

    /// Writes a primary memory cell (host and test helper; emits no event).
    pub fn write_memory(&mut self, addr: PrimaryAddr, value: u16) {
        self.memory[addr.val()] = value;
    }

    /// Captures an owned snapshot of the architectural state.
    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            registers: self.regs.values(),
            memory: self.memory.clone(),
            flags: self.flags,
            pc: self.pc,
            sp: self.sp.val(),
            halted: self.halted,
            stage: self.stage(),
        }
    }

    /// Registers an event listener.
    ///
    /// # Arguments
    ///
    /// * `listener` - Callback receiving every later CPU event.
    ///
    /// # Returns
    ///
    /// A handle for [`Cpu::unsubscribe`].
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&CpuEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    /// Removes an event listener; returns `true` if it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Builds and emits an event, skipping the snapshot when nobody listens.
    fn publish(&mut self, make: impl FnOnce(&Self) -> CpuEvent) {
        if self.events.has_listeners() {
            let event = make(self);
            self.events.emit(&event);
        }
    }

    /// Dumps the current CPU state (PC, SP, flags and registers) to stdout.
    pub fn dump_state(&self) {
        println!(
            "PC={} SP={} {} halted={}",
            self.pc,
            self.sp.val(),
            self.flags,
            self.halted
        );
        self.regs.dump();
    }
}
