//! Bridge Instructions.
//!
//! Bridge opcodes delegate work to the attached compute unit synchronously. Bulk
//! transfers copy immediately, `GEXEC` only queues the operation, and `GWAIT` drains
//! the unit phase by phase before returning. All operands are resolved before the
//! compute unit is touched, so a faulting bridge instruction has no effect.

use super::Cpu;
use crate::common::{ComputeAddr, ExecError, PrimaryAddr};
use crate::isa::{Instruction, Opcode, Operand};

impl Cpu {
    /// Executes a bridge instruction.
    ///
    /// # Arguments
    ///
    /// * `inst` - A decoded instruction of class `Bridge`.
    ///
    /// # Returns
    ///
    /// `NoComputeUnit` when nothing is attached, `Busy` when `GEXEC` is refused, or an
    /// operand resolution error.
    pub(crate) fn execute_bridge(&mut self, inst: &Instruction) -> Result<(), ExecError> {
        if self.compute.is_none() {
            return Err(ExecError::NoComputeUnit(inst.opcode));
        }
        let value = |cpu: &Self, idx: usize| -> Result<u16, ExecError> {
            cpu.operand_value(Self::arg(inst, idx)?)
        };

        match inst.opcode {
            Opcode::GLoad => {
                let src = PrimaryAddr::new(value(self, 0)?.into());
                let dst = ComputeAddr::new(value(self, 1)?.into());
                let len = usize::from(value(self, 2)?);
                if let Some(gpu) = self.compute.as_mut() {
                    gpu.bulk_load(&self.memory, src, dst, len);
                }
            }
            Opcode::GStore => {
                let src = ComputeAddr::new(value(self, 0)?.into());
                let dst = PrimaryAddr::new(value(self, 1)?.into());
                let len = usize::from(value(self, 2)?);
                if let Some(gpu) = self.compute.as_mut() {
                    gpu.bulk_store(&mut self.memory, src, dst, len);
                }
            }
            Opcode::GExec => {
                let op = match Self::arg(inst, 0)? {
                    Operand::VectorOp(op) => *op,
                    other => return Err(ExecError::InvalidOperand(other.to_string())),
                };
                let src = ComputeAddr::new(value(self, 1)?.into());
                let dst = ComputeAddr::new(value(self, 2)?.into());
                let len = usize::from(value(self, 3)?);
                let scalar = inst
                    .operand(4)
                    .map(|s| self.operand_value(s))
                    .transpose()?;
                if let Some(gpu) = self.compute.as_mut() {
                    gpu.start_operation(op, src, dst, len, scalar)?;
                }
            }
            Opcode::GWait => {
                if let Some(gpu) = self.compute.as_mut() {
                    let phases = gpu.drain();
                    tracing::debug!(phases, "compute unit drained");
                }
            }
            Opcode::GRes => {
                let rd = Self::destination(Self::arg(inst, 0)?)?;
                if let Some(gpu) = self.compute.as_ref() {
                    self.regs.write(rd, gpu.result());
                }
            }
            Opcode::GRead => {
                let rd = Self::destination(Self::arg(inst, 0)?)?;
                let addr = ComputeAddr::new(value(self, 1)?.into());
                if let Some(gpu) = self.compute.as_ref() {
                    self.regs.write(rd, gpu.read(addr));
                }
            }
            Opcode::GWrite => {
                let addr = ComputeAddr::new(value(self, 0)?.into());
                let word = value(self, 1)?;
                if let Some(gpu) = self.compute.as_mut() {
                    gpu.write(addr, word);
                }
            }
            other => return Err(ExecError::InvalidOperand(other.to_string())),
        }
        Ok(())
    }
}
