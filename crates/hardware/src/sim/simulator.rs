//! Simulator: owns the CPU (and through it the compute unit) built from a `Config`.
//!
//! Run loops here are bounded by instruction count, never by wall-clock time.

use serde::Serialize;

use crate::asm::{self, Program};
use crate::common::{Diagnostic, ExecError};
use crate::config::Config;
use crate::core::Cpu;
use crate::core::cpu::Progress;

/// How a bounded run ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The CPU halted normally.
    Halted {
        /// Instructions committed during the run.
        steps: u64,
    },
    /// A fatal runtime error halted the CPU.
    Faulted {
        /// Instructions committed before the fault.
        steps: u64,
        /// The fault.
        error: ExecError,
    },
    /// `general.max_steps` instructions committed without a halt.
    StepLimit {
        /// Instructions committed during the run.
        steps: u64,
    },
}

impl RunOutcome {
    /// Instructions committed during the run.
    pub const fn steps(&self) -> u64 {
        match self {
            Self::Halted { steps } | Self::Faulted { steps, .. } | Self::StepLimit { steps } => {
                *steps
            }
        }
    }
}

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator {
    /// The primary unit, owning the attached compute unit.
    pub cpu: Cpu,
    config: Config,
}

impl Simulator {
    /// Creates a new simulator from a configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            cpu: Cpu::new(config),
            config: config.clone(),
        }
    }

    /// The configuration the simulator was built from.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Assembles source text and loads it.
    ///
    /// # Returns
    ///
    /// Every diagnostic on failure; the previously loaded program stays in place.
    pub fn load_source(&mut self, source: &str) -> Result<(), Vec<Diagnostic>> {
        let program = asm::assemble(source)?;
        self.cpu.load_program(program);
        Ok(())
    }

    /// Loads an already resolved program and resets the CPU.
    pub fn load_program(&mut self, program: Program) {
        self.cpu.load_program(program);
    }

    /// Executes one whole instruction.
    pub fn step(&mut self) -> Result<Progress, ExecError> {
        self.cpu.step()
    }

    /// Advances by one micro-operation.
    pub fn micro_step(&mut self) -> Result<Progress, ExecError> {
        self.cpu.micro_step()
    }

    /// Steps whole instructions until the CPU halts or `general.max_steps` commit.
    pub fn run(&mut self) -> RunOutcome {
        self.run_with(Cpu::step)
    }

    /// Like [`Simulator::run`], but advances one micro-operation per call.
    pub fn run_micro(&mut self) -> RunOutcome {
        self.run_with(Cpu::micro_step)
    }

    fn run_with(
        &mut self,
        mut advance: impl FnMut(&mut Cpu) -> Result<Progress, ExecError>,
    ) -> RunOutcome {
        let start = self.cpu.stats.instructions_retired;
        let limit = self.config.general.max_steps;
        loop {
            let steps = self.cpu.stats.instructions_retired - start;
            if steps >= limit {
                tracing::debug!(steps, "step limit reached");
                return RunOutcome::StepLimit { steps };
            }
            match advance(&mut self.cpu) {
                Ok(Progress::Halted) => {
                    return RunOutcome::Halted {
                        steps: self.cpu.stats.instructions_retired - start,
                    };
                }
                Ok(Progress::Committed | Progress::Advanced(_)) => {}
                Err(error) => {
                    return RunOutcome::Faulted {
                        steps: self.cpu.stats.instructions_retired - start,
                        error,
                    };
                }
            }
        }
    }

    /// Resets the CPU and the compute unit, keeping the loaded program.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }
}
