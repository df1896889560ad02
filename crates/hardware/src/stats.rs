//! Simulation statistics collection and reporting.
//!
//! This module tracks execution metrics for both units. It provides:
//! 1. **Throughput:** Retired instructions and micro-operations.
//! 2. **Instruction mix:** Counts by class (ALU, memory, control, stack, bridge, system).
//! 3. **Control flow:** Branches taken and faults raised.
//! 4. **Compute unit:** Phases stepped, batches and operations completed, words transferred.

use serde::Serialize;

use crate::isa::OpClass;

/// Primary unit statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Number of instructions committed (retired).
    pub instructions_retired: u64,
    /// Number of micro-operations emitted by `micro_step`.
    pub micro_ops: u64,

    /// Arithmetic, logical and compare instructions retired.
    pub inst_alu: u64,
    /// Moves, loads and stores retired.
    pub inst_memory: u64,
    /// Jumps, calls and returns retired.
    pub inst_control: u64,
    /// Pushes and pops retired.
    pub inst_stack: u64,
    /// Bridge instructions retired.
    pub inst_bridge: u64,
    /// `NOP` and `HLT` retired.
    pub inst_system: u64,

    /// Control transfers that redirected the PC.
    pub branches_taken: u64,
    /// Fatal runtime errors raised.
    pub faults: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"instruction_mix"`, `"control"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "control"];

impl SimStats {
    /// Counts one retired instruction of the given class.
    pub const fn record(&mut self, class: OpClass) {
        self.instructions_retired += 1;
        match class {
            OpClass::Alu => self.inst_alu += 1,
            OpClass::Memory => self.inst_memory += 1,
            OpClass::Control => self.inst_control += 1,
            OpClass::Stack => self.inst_stack += 1,
            OpClass::Bridge => self.inst_bridge += 1,
            OpClass::System => self.inst_system += 1,
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let instr = self.instructions_retired.max(1) as f64;

        if want("summary") {
            println!("\n==========================================================");
            println!("TANDEM SIMULATION STATISTICS");
            println!("==========================================================");
            println!("sim_insts                {}", self.instructions_retired);
            println!("sim_micro_ops            {}", self.micro_ops);
            println!("----------------------------------------------------------");
        }
        if want("instruction_mix") {
            let row = |name: &str, count: u64| {
                println!(
                    "  {name:<22} {count} ({:.2}%)",
                    (count as f64 / instr) * 100.0
                );
            };
            println!("INSTRUCTION MIX");
            row("op.alu", self.inst_alu);
            row("op.memory", self.inst_memory);
            row("op.control", self.inst_control);
            row("op.stack", self.inst_stack);
            row("op.bridge", self.inst_bridge);
            row("op.system", self.inst_system);
            println!("----------------------------------------------------------");
        }
        if want("control") {
            println!("CONTROL FLOW");
            println!("  branches.taken         {}", self.branches_taken);
            println!("  faults                 {}", self.faults);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

/// Compute unit statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ComputeStats {
    /// Decode, fetch, execute and writeback phases run.
    pub phases: u64,
    /// Batches written back.
    pub batches: u64,
    /// Operations completed.
    pub operations: u64,
    /// Words copied by bulk transfers.
    pub words_transferred: u64,
}

impl ComputeStats {
    /// Prints the compute unit counters to stdout.
    pub fn print(&self) {
        println!("COMPUTE UNIT");
        println!("  gpu.phases             {}", self.phases);
        println!("  gpu.batches            {}", self.batches);
        println!("  gpu.operations         {}", self.operations);
        println!("  gpu.words_transferred  {}", self.words_transferred);
        println!("==========================================================");
    }
}
