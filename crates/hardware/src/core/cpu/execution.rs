//! Main Execution Loop.
//!
//! This module implements the instruction lifecycle of the CPU. It performs the following:
//! 1. **Atomic Stepping:** `step` fetches, decodes and commits one instruction in a
//!    single call, emitting one `Step` event.
//! 2. **Micro-Stepping:** `micro_step` replays the same instruction as fetch, decode,
//!    execute and writeback micro-operations, one per call. The real mutation happens
//!    once, in the call that replays the last micro-operation.
//! 3. **Commit:** All operands are resolved and checked before any state changes,
//!    so a faulting instruction leaves registers, memory, flags and PC untouched.
//! 4. **Fault Handling:** A fatal error halts the CPU and emits a single `Error` event.

use std::collections::VecDeque;

use super::{Cpu, CpuEvent, InFlight, Progress};
use crate::common::{ExecError, PrimaryAddr};
use crate::core::pipeline::micro::plan;
use crate::core::pipeline::signals::AluOp;
use crate::core::pipeline::{MicroOp, Stage};
use crate::core::units::alu::Alu;
use crate::isa::{self, Instruction, OpClass, Opcode};

/// How the PC moves after a committed instruction.
enum Flow {
    /// Continue with the next instruction.
    Next,
    /// Redirect to an instruction index.
    Jump(usize),
    /// Stop; PC stays on the `HLT`.
    Halt,
}

impl Cpu {
    /// Executes one whole instruction.
    ///
    /// If a micro-stepped instruction is in flight, it is committed without replaying
    /// its remaining micro-operations. On a halted CPU this is a no-op.
    ///
    /// # Returns
    ///
    /// `Committed`, or `Halted` when the CPU is (or became) halted. A fatal error is
    /// returned after the CPU has halted and emitted `Error`.
    pub fn step(&mut self) -> Result<Progress, ExecError> {
        if self.halted {
            return Ok(Progress::Halted);
        }
        let (pc, inst) = match self.in_flight.take() {
            Some(InFlight {
                pc,
                decoded: Some(inst),
                ..
            }) => (pc, inst),
            Some(InFlight { pc, text, .. }) => match isa::decode(&text) {
                Ok(inst) => (pc, inst),
                Err(e) => return Err(self.fault(e.into())),
            },
            None => {
                let Some(text) = self.program.instruction(self.pc).map(str::to_string) else {
                    self.halt_end_of_program();
                    return Ok(Progress::Halted);
                };
                match isa::decode(&text) {
                    Ok(inst) => (self.pc, inst),
                    Err(e) => return Err(self.fault(e.into())),
                }
            }
        };
        self.commit(pc, &inst)
    }

    /// Advances the in-flight instruction by one micro-operation.
    ///
    /// The first call fetches, the second decodes and plans the execute and writeback
    /// micro-operations, and each later call replays one of them. The call that replays
    /// the writeback also commits the instruction and emits `Step`. On a halted CPU
    /// this is a no-op.
    ///
    /// # Returns
    ///
    /// `Advanced(stage)` while the instruction is in flight, then `Committed` or
    /// `Halted`. Decode errors and commit faults halt the CPU and are returned.
    pub fn micro_step(&mut self) -> Result<Progress, ExecError> {
        if self.halted {
            return Ok(Progress::Halted);
        }

        let Some(mut flight) = self.in_flight.take() else {
            let Some(text) = self.program.instruction(self.pc).map(str::to_string) else {
                self.halt_end_of_program();
                return Ok(Progress::Halted);
            };
            let description = format!("Fetch instruction {}: {text}", self.pc);
            let micro = MicroOp::new(Stage::Fetch, description)
                .with_source("PC")
                .with_destination("IR")
                .with_value(self.pc as i64);
            self.in_flight = Some(InFlight {
                pc: self.pc,
                text,
                decoded: None,
                plan: VecDeque::new(),
                stage: Stage::Fetch,
            });
            self.emit_micro(micro);
            return Ok(Progress::Advanced(Stage::Fetch));
        };

        let Some(inst) = flight.decoded.clone() else {
            let inst = match isa::decode(&flight.text) {
                Ok(inst) => inst,
                Err(e) => return Err(self.fault(e.into())),
            };
            let micro = MicroOp::new(Stage::Decode, format!("Decode {inst}"))
                .with_source("IR")
                .with_destination(inst.opcode.mnemonic());
            flight.plan = plan(self, &inst);
            flight.decoded = Some(inst);
            flight.stage = Stage::Decode;
            self.in_flight = Some(flight);
            self.emit_micro(micro);
            return Ok(Progress::Advanced(Stage::Decode));
        };

        let Some(micro) = flight.plan.pop_front() else {
            return self.commit(flight.pc, &inst);
        };
        let (pc, stage) = (flight.pc, micro.stage);
        let last = flight.plan.is_empty();
        flight.stage = stage;
        self.in_flight = Some(flight);
        self.emit_micro(micro);
        if last {
            return self.commit(pc, &inst);
        }
        Ok(Progress::Advanced(stage))
    }

    fn emit_micro(&mut self, micro: MicroOp) {
        self.stats.micro_ops += 1;
        tracing::trace!(stage = %micro.stage, pc = self.pc, "{}", micro.description);
        self.publish(|cpu| CpuEvent::Micro {
            state: cpu.snapshot(),
            micro,
        });
    }

    fn halt_end_of_program(&mut self) {
        self.halted = true;
        self.in_flight = None;
        tracing::debug!(pc = self.pc, "end of program");
        self.publish(|cpu| CpuEvent::Halt {
            state: cpu.snapshot(),
        });
    }

    /// Halts the CPU on a fatal error and emits `Error`.
    fn fault(&mut self, error: ExecError) -> ExecError {
        self.halted = true;
        self.in_flight = None;
        self.stats.faults += 1;
        self.last_error = Some(error.clone());
        tracing::warn!(pc = self.pc, %error, "fatal runtime error");
        let message = error.to_string();
        self.publish(|cpu| CpuEvent::Error {
            state: cpu.snapshot(),
            message,
        });
        error
    }

    /// Performs the real mutation of an instruction, then emits `Step` (and `Halt`).
    fn commit(&mut self, pc: usize, inst: &Instruction) -> Result<Progress, ExecError> {
        self.in_flight = None;
        let before = self.regs.values();
        let flow = match self.execute(pc, inst) {
            Ok(flow) => flow,
            Err(e) => return Err(self.fault(e)),
        };

        self.stats.record(inst.opcode.class());
        match flow {
            Flow::Next => self.pc = pc + 1,
            Flow::Jump(target) => {
                self.stats.branches_taken += 1;
                self.pc = target;
            }
            Flow::Halt => self.halted = true,
        }

        if self.trace {
            tracing::info!(pc, next = self.pc, flags = %self.flags, "{inst}");
        } else {
            tracing::debug!(pc, next = self.pc, "{inst}");
        }

        let changed = self.regs.changed_since(&before);
        self.publish(|cpu| CpuEvent::Step {
            state: cpu.snapshot(),
            changed,
        });

        if self.halted {
            tracing::debug!(pc = self.pc, "halted");
            self.publish(|cpu| CpuEvent::Halt {
                state: cpu.snapshot(),
            });
            return Ok(Progress::Halted);
        }
        Ok(Progress::Committed)
    }

    /// Applies one instruction's effect on registers, memory, flags and SP.
    ///
    /// Every operand is resolved and every fault condition is checked before the
    /// first write.
    fn execute(&mut self, pc: usize, inst: &Instruction) -> Result<Flow, ExecError> {
        match inst.opcode.class() {
            OpClass::Alu => {
                let alu = AluOp::from_opcode(inst.opcode)
                    .ok_or_else(|| ExecError::InvalidOperand(inst.opcode.to_string()))?;
                let rd = Self::destination(Self::arg(inst, 0)?)?;
                let b = if alu.is_unary() {
                    0
                } else {
                    self.operand_value(Self::arg(inst, 1)?)?
                };
                let out = Alu::execute(alu, self.regs.read(rd), b)?;
                if inst.opcode != Opcode::Cmp {
                    self.regs.write(rd, out.value);
                }
                self.flags = out.flags;
                Ok(Flow::Next)
            }
            OpClass::Bridge => {
                self.execute_bridge(inst)?;
                Ok(Flow::Next)
            }
            OpClass::System => Ok(if inst.opcode == Opcode::Hlt {
                Flow::Halt
            } else {
                Flow::Next
            }),
            OpClass::Memory | OpClass::Control | OpClass::Stack => self.execute_data(pc, inst),
        }
    }

    /// Data movement and control transfer; none of these touch the flags.
    fn execute_data(&mut self, pc: usize, inst: &Instruction) -> Result<Flow, ExecError> {
        match inst.opcode {
            Opcode::Mov => {
                let rd = Self::destination(Self::arg(inst, 0)?)?;
                let value = self.operand_value(Self::arg(inst, 1)?)?;
                self.regs.write(rd, value);
            }
            Opcode::Load => {
                let rd = Self::destination(Self::arg(inst, 0)?)?;
                let addr = PrimaryAddr::new(self.operand_value(Self::arg(inst, 1)?)?.into());
                self.regs.write(rd, self.read_mem(addr));
            }
            Opcode::Store => {
                let rs = Self::destination(Self::arg(inst, 0)?)?;
                let addr = PrimaryAddr::new(self.operand_value(Self::arg(inst, 1)?)?.into());
                self.write_memory(addr, self.regs.read(rs));
            }
            Opcode::Jmp => return Ok(Flow::Jump(self.jump_target(Self::arg(inst, 0)?)?)),
            Opcode::Call => {
                let target = self.jump_target(Self::arg(inst, 0)?)?;
                self.push(((pc + 1) & 0xFFFF) as u16);
                return Ok(Flow::Jump(target));
            }
            Opcode::Ret => return Ok(Flow::Jump(usize::from(self.pop()))),
            Opcode::Push => {
                let value = self.operand_value(Self::arg(inst, 0)?)?;
                self.push(value);
            }
            Opcode::Pop => {
                let rd = Self::destination(Self::arg(inst, 0)?)?;
                let value = self.pop();
                self.regs.write(rd, value);
            }
            op => {
                let Some(condition) = op.condition() else {
                    return Err(ExecError::InvalidOperand(op.to_string()));
                };
                let target = self.jump_target(Self::arg(inst, 0)?)?;
                if self.flags.satisfies(condition) {
                    return Ok(Flow::Jump(target));
                }
            }
        }
        Ok(Flow::Next)
    }
}
