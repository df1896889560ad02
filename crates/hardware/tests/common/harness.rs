use std::cell::RefCell;
use std::rc::Rc;

use tandem_core::Simulator;
use tandem_core::common::Reg;
use tandem_core::compute::{ComputeEvent, ComputeUnit};
use tandem_core::config::Config;
use tandem_core::core::Cpu;
use tandem_core::core::cpu::{CpuEvent, Progress};
use tandem_core::sim::RunOutcome;
use tracing_subscriber::EnvFilter;

/// Shorthand for a register index known to be valid.
pub fn r(idx: usize) -> Reg {
    Reg::new(idx).unwrap()
}

pub struct TestContext {
    pub sim: Simulator,
    cpu_events: Rc<RefCell<Vec<CpuEvent>>>,
    gpu_events: Rc<RefCell<Vec<ComputeEvent>>>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();

        Self {
            sim: Simulator::new(config),
            cpu_events: Rc::new(RefCell::new(Vec::new())),
            gpu_events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Assembles `source` (panicking on diagnostics) and loads it.
    pub fn load(mut self, source: &str) -> Self {
        if let Err(diagnostics) = self.sim.load_source(source) {
            panic!("test program failed to assemble: {diagnostics:?}");
        }
        self
    }

    /// Subscribes recorders to the CPU and the compute unit.
    pub fn recording(self) -> Self {
        let sink = Rc::clone(&self.cpu_events);
        let mut ctx = self;
        let _ = ctx.sim.cpu.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        let sink = Rc::clone(&ctx.gpu_events);
        if let Some(gpu) = ctx.sim.cpu.compute_mut() {
            let _ = gpu.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        }
        ctx
    }

    /// Convenience accessor for the CPU.
    pub fn cpu(&self) -> &Cpu {
        &self.sim.cpu
    }

    /// Mutable convenience accessor for the CPU.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.sim.cpu
    }

    /// The attached compute unit.
    pub fn gpu(&self) -> &ComputeUnit {
        self.sim.cpu.compute().expect("no compute unit attached")
    }

    /// Read a register value.
    pub fn reg(&self, idx: usize) -> u16 {
        self.sim.cpu.registers()[idx]
    }

    /// Set a register value.
    pub fn set_reg(&mut self, idx: usize, val: u16) {
        self.sim.cpu.set_register(r(idx), val);
    }

    pub fn step(&mut self) -> Progress {
        self.sim.step().unwrap()
    }

    pub fn micro(&mut self) -> Progress {
        self.sim.micro_step().unwrap()
    }

    pub fn run(&mut self) -> RunOutcome {
        self.sim.run()
    }

    /// Runs to a normal halt and returns the number of committed instructions.
    pub fn run_to_halt(&mut self) -> u64 {
        match self.sim.run() {
            RunOutcome::Halted { steps } => steps,
            other => panic!("expected a normal halt, got {other:?}"),
        }
    }

    pub fn cpu_events(&self) -> Vec<CpuEvent> {
        self.cpu_events.borrow().clone()
    }

    pub fn gpu_events(&self) -> Vec<ComputeEvent> {
        self.gpu_events.borrow().clone()
    }

    pub fn cpu_event_kinds(&self) -> Vec<&'static str> {
        self.cpu_events.borrow().iter().map(CpuEvent::kind).collect()
    }

    pub fn clear_events(&self) {
        self.cpu_events.borrow_mut().clear();
        self.gpu_events.borrow_mut().clear();
    }
}
