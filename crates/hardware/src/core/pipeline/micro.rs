//! Micro-Operation Plans.
//!
//! This module describes how one decoded instruction moves through the execute and
//! writeback stages. The plan is built from the CPU state at decode time and is purely
//! descriptive: it never fails, and an operand that cannot be resolved is shown
//! without a value. Faults are raised by the commit that follows the last step.
//!
//! Every plan holds at least one execute step and ends with exactly one writeback step.

use std::collections::VecDeque;

use crate::common::constants::{MEMORY_SIZE, WORD_MASK};
use crate::common::{ComputeAddr, PrimaryAddr, TransferDirection};
use crate::core::Cpu;
use crate::core::pipeline::signals::AluOp;
use crate::core::pipeline::stage::{MicroOp, Stage};
use crate::core::units::alu::Alu;
use crate::isa::{Instruction, Opcode, Operand};

/// Symbolic name of an operand, `?` when it is missing.
fn name(op: Option<&Operand>) -> String {
    op.map_or_else(|| "?".to_string(), ToString::to_string)
}

/// Value of an operand in the current state, if it resolves.
fn value(cpu: &Cpu, op: Option<&Operand>) -> Option<u16> {
    op.and_then(|op| cpu.operand_value(op).ok())
}

fn mem_name(addr: Option<u16>) -> String {
    addr.map_or_else(
        || "MEM[?]".to_string(),
        |a| format!("MEM[{}]", PrimaryAddr::new(a as usize).val()),
    )
}

fn gpu_name(addr: Option<u16>) -> String {
    addr.map_or_else(
        || "GPU[?]".to_string(),
        |a| format!("GPU[{}]", ComputeAddr::new(a as usize).val()),
    )
}

fn execute(description: impl Into<String>) -> MicroOp {
    MicroOp::new(Stage::Execute, description)
}

fn writeback(description: impl Into<String>) -> MicroOp {
    MicroOp::new(Stage::Writeback, description)
}

/// Builds the execute and writeback micro-operations of an instruction.
///
/// # Arguments
///
/// * `cpu` - The CPU, in the state the instruction will execute against.
/// * `inst` - The decoded instruction.
///
/// # Returns
///
/// The ordered execute steps followed by a single writeback step.
pub fn plan(cpu: &Cpu, inst: &Instruction) -> VecDeque<MicroOp> {
    let a0 = inst.operand(0);
    let a1 = inst.operand(1);
    let (n0, n1) = (name(a0), name(a1));
    let (v0, v1) = (value(cpu, a0), value(cpu, a1));
    let word = |v: Option<u16>| v.map(i64::from);

    let mut steps = VecDeque::with_capacity(3);
    match inst.opcode {
        Opcode::Nop => {
            steps.push_back(execute("No operation"));
            steps.push_back(writeback("Nothing to write back"));
        }
        Opcode::Hlt => {
            steps.push_back(execute("Halt requested"));
            steps.push_back(writeback("Processor halted").with_destination("HALTED"));
        }
        Opcode::Mov => {
            steps.push_back(
                execute(format!("Read {n1}"))
                    .with_source(n1.clone())
                    .with_value(word(v1)),
            );
            steps.push_back(
                writeback(format!("{n0} <- {n1}"))
                    .with_destination(n0)
                    .with_value(word(v1)),
            );
        }
        Opcode::Load => {
            let cell = v1.map(|a| cpu.memory()[a as usize % MEMORY_SIZE]);
            let mem = mem_name(v1);
            steps.push_back(
                execute("Compute address")
                    .with_source(n1)
                    .with_value(v1.map(|a| (a as usize % MEMORY_SIZE) as i64)),
            );
            steps.push_back(
                execute(format!("Read {mem}"))
                    .with_source(mem.clone())
                    .with_value(word(cell)),
            );
            steps.push_back(
                writeback(format!("{n0} <- {mem}"))
                    .with_destination(n0)
                    .with_value(word(cell)),
            );
        }
        Opcode::Store => {
            let mem = mem_name(v1);
            steps.push_back(
                execute("Compute address")
                    .with_source(n1)
                    .with_value(v1.map(|a| (a as usize % MEMORY_SIZE) as i64)),
            );
            steps.push_back(
                execute(format!("Read {n0}"))
                    .with_source(n0.clone())
                    .with_value(word(v0)),
            );
            steps.push_back(
                writeback(format!("{mem} <- {n0}"))
                    .with_destination(mem)
                    .with_value(word(v0)),
            );
        }
        Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::Mod
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
        | Opcode::Shl
        | Opcode::Shr
        | Opcode::Not
        | Opcode::Inc
        | Opcode::Dec
        | Opcode::Cmp => {
            let alu = AluOp::from_opcode(inst.opcode).unwrap_or_default();
            let (sources, rhs, b) = if alu.is_unary() {
                let rhs = if alu == AluOp::Not { String::new() } else { "1".to_string() };
                (n0.clone(), rhs, Some(0))
            } else {
                (format!("{n0}, {n1}"), n1.clone(), v1)
            };
            let out = v0
                .zip(b)
                .and_then(|(a, b)| Alu::execute(alu, a, b).ok());
            let expr = if alu == AluOp::Not {
                format!("~{n0}")
            } else {
                format!("{n0} {} {rhs}", alu.symbol())
            };

            steps.push_back(execute(format!("Read {sources}")).with_source(sources));
            steps.push_back(
                execute(format!("ALU: {expr}"))
                    .with_source("ALU")
                    .with_value(out.map(|o| o.raw)),
            );
            if inst.opcode == Opcode::Cmp {
                steps.push_back(
                    writeback("Update flags")
                        .with_destination("FLAGS")
                        .with_value(out.map(|o| o.raw)),
                );
            } else {
                steps.push_back(
                    writeback(format!("{n0} <- ALU, update flags"))
                        .with_destination(n0)
                        .with_value(out.map(|o| i64::from(o.value))),
                );
            }
        }
        Opcode::Jmp => {
            let target = a0.and_then(|t| cpu.jump_target(t).ok());
            steps.push_back(
                execute("Resolve jump target")
                    .with_source(n0)
                    .with_value(target.map(|t| t as i64)),
            );
            steps.push_back(
                writeback("PC <- target")
                    .with_destination("PC")
                    .with_value(target.map(|t| t as i64)),
            );
        }
        Opcode::Jz
        | Opcode::Jnz
        | Opcode::Jg
        | Opcode::Jge
        | Opcode::Jl
        | Opcode::Jle
        | Opcode::Jc
        | Opcode::Jnc => {
            let taken = inst
                .opcode
                .condition()
                .is_some_and(|c| cpu.flags().satisfies(c));
            let target = a0.and_then(|t| cpu.jump_target(t).ok());
            steps.push_back(
                execute(format!("Evaluate {} against {}", inst.opcode, cpu.flags()))
                    .with_source("FLAGS")
                    .with_value(i64::from(taken)),
            );
            if taken {
                steps.push_back(
                    writeback(format!("Branch taken: PC <- {n0}"))
                        .with_destination("PC")
                        .with_value(target.map(|t| t as i64)),
                );
            } else {
                steps.push_back(
                    writeback("Branch not taken: PC <- PC + 1")
                        .with_destination("PC")
                        .with_value((cpu.pc() + 1) as i64),
                );
            }
        }
        Opcode::Call => {
            let target = a0.and_then(|t| cpu.jump_target(t).ok());
            steps.push_back(
                execute("Push return address")
                    .with_source("PC")
                    .with_destination(format!("MEM[{}]", cpu.sp()))
                    .with_value((cpu.pc() + 1) as i64 & WORD_MASK),
            );
            steps.push_back(
                execute("Resolve call target")
                    .with_source(n0)
                    .with_value(target.map(|t| t as i64)),
            );
            steps.push_back(
                writeback("PC <- target, SP <- SP - 1")
                    .with_destination("PC")
                    .with_value(target.map(|t| t as i64)),
            );
        }
        Opcode::Ret => {
            let top = PrimaryAddr::new(cpu.sp() + 1);
            let ret = cpu.memory()[top.val()];
            steps.push_back(
                execute("Pop return address")
                    .with_source(format!("MEM[{}]", top.val()))
                    .with_value(i64::from(ret)),
            );
            steps.push_back(
                writeback("PC <- return address, SP <- SP + 1")
                    .with_destination("PC")
                    .with_value(i64::from(ret)),
            );
        }
        Opcode::Push => {
            let sp = cpu.sp();
            steps.push_back(
                execute(format!("Read {n0}"))
                    .with_source(n0)
                    .with_value(word(v0)),
            );
            steps.push_back(
                execute(format!("MEM[{sp}] <- value"))
                    .with_destination(format!("MEM[{sp}]"))
                    .with_value(word(v0)),
            );
            steps.push_back(
                writeback("SP <- SP - 1")
                    .with_destination("SP")
                    .with_value(PrimaryAddr::new(sp).pred().val() as i64),
            );
        }
        Opcode::Pop => {
            let top = PrimaryAddr::new(cpu.sp() + 1);
            let cell = cpu.memory()[top.val()];
            steps.push_back(
                execute("SP <- SP + 1")
                    .with_destination("SP")
                    .with_value(top.val() as i64),
            );
            steps.push_back(
                execute(format!("Read MEM[{}]", top.val()))
                    .with_source(format!("MEM[{}]", top.val()))
                    .with_value(i64::from(cell)),
            );
            steps.push_back(
                writeback(format!("{n0} <- MEM[{}]", top.val()))
                    .with_destination(n0)
                    .with_value(i64::from(cell)),
            );
        }
        Opcode::GLoad | Opcode::GStore => {
            let direction = if inst.opcode == Opcode::GLoad {
                TransferDirection::ToCompute
            } else {
                TransferDirection::ToPrimary
            };
            let len = value(cpu, inst.operand(2));
            steps.push_back(
                execute(format!(
                    "Transfer {} word(s) {}",
                    len.map_or_else(|| "?".to_string(), |l| l.to_string()),
                    direction.label()
                ))
                .with_source(n0)
                .with_destination(n1)
                .with_value(word(len)),
            );
            steps.push_back(writeback("Transfer complete"));
        }
        Opcode::GExec => {
            let len = value(cpu, inst.operand(3)).map(usize::from);
            let lanes = cpu.compute().map_or(0, |gpu| gpu.lane_count());
            let batches = len.map(|l| if lanes == 0 { 0 } else { l.div_ceil(lanes) });
            steps.push_back(
                execute(format!(
                    "Dispatch {n0} to compute unit ({} batch(es))",
                    batches.map_or_else(|| "?".to_string(), |b| b.to_string())
                ))
                .with_source(n0)
                .with_destination("GPU")
                .with_value(batches.map(|b| b as i64)),
            );
            steps.push_back(writeback("Compute unit busy").with_destination("GPU"));
        }
        Opcode::GWait => {
            steps.push_back(execute("Drain compute unit").with_source("GPU"));
            steps.push_back(writeback("Compute unit idle"));
        }
        Opcode::GRes => {
            let result = cpu.compute().map(|gpu| i64::from(gpu.result()));
            steps.push_back(
                execute("Read compute result register")
                    .with_source("GPU.RESULT")
                    .with_value(result),
            );
            steps.push_back(
                writeback(format!("{n0} <- GPU.RESULT"))
                    .with_destination(n0)
                    .with_value(result),
            );
        }
        Opcode::GRead => {
            let gpu = gpu_name(v1);
            let cell = v1
                .zip(cpu.compute())
                .map(|(a, unit)| i64::from(unit.read(ComputeAddr::new(a as usize))));
            steps.push_back(
                execute(format!("Read {gpu}"))
                    .with_source(gpu.clone())
                    .with_value(cell),
            );
            steps.push_back(
                writeback(format!("{n0} <- {gpu}"))
                    .with_destination(n0)
                    .with_value(cell),
            );
        }
        Opcode::GWrite => {
            let gpu = gpu_name(v0);
            steps.push_back(
                execute(format!("Read {n1}"))
                    .with_source(n1.clone())
                    .with_value(word(v1)),
            );
            steps.push_back(
                writeback(format!("{gpu} <- {n1}"))
                    .with_destination(gpu)
                    .with_value(word(v1)),
            );
        }
    }
    steps
}
