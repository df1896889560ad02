//! Memory, Stack and Operand Access.
//!
//! This module implements how the CPU turns operands into values and how it touches
//! primary memory. It provides:
//! 1. **Operand Resolution:** Registers, immediates reduced modulo 2^16, and labels
//!    resolved to their instruction index.
//! 2. **Memory Access:** Reads and writes through wrapping primary addresses.
//! 3. **Stack Discipline:** Push writes `mem[SP]` then decrements SP; pop increments SP
//!    then reads `mem[SP]`. SP wraps modulo the memory size.

use super::Cpu;
use crate::common::constants::WORD_MASK;
use crate::common::{ExecError, PrimaryAddr, Reg};
use crate::isa::{Instruction, Operand};

impl Cpu {
    /// Resolves an operand to a 16-bit value in the current state.
    ///
    /// # Arguments
    ///
    /// * `operand` - The operand to resolve.
    ///
    /// # Returns
    ///
    /// The register's value, the immediate masked to 16 bits, or the label's
    /// instruction index. Unknown labels and operation identifiers are errors.
    pub fn operand_value(&self, operand: &Operand) -> Result<u16, ExecError> {
        match operand {
            Operand::Register(reg) => Ok(self.regs.read(*reg)),
            Operand::Immediate(value) => Ok((value & WORD_MASK) as u16),
            Operand::Label(name) => self
                .program
                .label(name)
                .map(|idx| (idx as i64 & WORD_MASK) as u16)
                .ok_or_else(|| ExecError::UnknownLabel(name.clone())),
            Operand::VectorOp(op) => Err(ExecError::InvalidOperand(op.to_string())),
        }
    }

    /// Resolves a control-transfer target to an instruction index.
    ///
    /// A register or immediate target is itself an instruction index; a label
    /// resolves through the program's label table.
    pub fn jump_target(&self, operand: &Operand) -> Result<usize, ExecError> {
        match operand {
            Operand::Label(name) => self
                .program
                .label(name)
                .ok_or_else(|| ExecError::UnknownLabel(name.clone())),
            other => self.operand_value(other).map(usize::from),
        }
    }

    /// Returns the register named by a destination operand.
    pub(crate) fn destination(operand: &Operand) -> Result<Reg, ExecError> {
        match operand {
            Operand::Register(reg) => Ok(*reg),
            other => Err(ExecError::InvalidRegister(other.to_string())),
        }
    }

    /// Returns operand `idx`, failing for instructions built without it.
    pub(crate) fn arg(inst: &Instruction, idx: usize) -> Result<&Operand, ExecError> {
        inst.operand(idx).ok_or_else(|| {
            ExecError::InvalidOperand(format!("{inst}: missing operand {}", idx + 1))
        })
    }

    /// Reads a primary memory cell.
    #[inline(always)]
    pub(crate) fn read_mem(&self, addr: PrimaryAddr) -> u16 {
        self.memory[addr.val()]
    }

    /// Pushes a word onto the stack.
    pub(crate) fn push(&mut self, value: u16) {
        self.memory[self.sp.val()] = value;
        self.sp = self.sp.pred();
    }

    /// Pops a word off the stack.
    pub(crate) fn pop(&mut self) -> u16 {
        self.sp = self.sp.offset(1);
        self.memory[self.sp.val()]
    }
}
