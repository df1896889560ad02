//! Opcode Vocabulary.
//!
//! The instruction set is a closed set of mnemonics, so it is modelled as an enum and
//! every dispatch over it is an exhaustive `match`. This module provides:
//! 1. **Opcodes:** The primary register-machine opcodes and the seven bridge opcodes.
//! 2. **Arity Table:** The accepted operand count of every opcode.
//! 3. **Classification:** Instruction classes for statistics and control-transfer checks.
//! 4. **Conditions:** The eight condition codes of the conditional jumps.

use std::fmt;

use serde::Serialize;

/// Every opcode understood by the assembler and the primary unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Opcode {
    /// No operation.
    Nop,
    /// Halt the primary unit.
    Hlt,
    /// `MOV Rd, src`: copy a value into a register.
    Mov,
    /// `LOAD Rd, addr`: read primary memory.
    Load,
    /// `STORE Rs, addr`: write primary memory.
    Store,
    /// `ADD Rd, src`.
    Add,
    /// `SUB Rd, src`.
    Sub,
    /// `MUL Rd, src`.
    Mul,
    /// `DIV Rd, src`: unsigned floor division.
    Div,
    /// `MOD Rd, src`: unsigned remainder.
    Mod,
    /// `AND Rd, src`.
    And,
    /// `OR Rd, src`.
    Or,
    /// `XOR Rd, src`.
    Xor,
    /// `SHL Rd, src`: logical shift left.
    Shl,
    /// `SHR Rd, src`: logical shift right.
    Shr,
    /// `NOT Rd`: bitwise complement.
    Not,
    /// `INC Rd`.
    Inc,
    /// `DEC Rd`.
    Dec,
    /// `CMP Ra, src`: set flags from `Ra - src`.
    Cmp,
    /// `JMP target`.
    Jmp,
    /// Jump if zero.
    Jz,
    /// Jump if not zero.
    Jnz,
    /// Jump if greater (neither zero nor negative).
    Jg,
    /// Jump if greater or equal (not negative).
    Jge,
    /// Jump if less (negative).
    Jl,
    /// Jump if less or equal (zero or negative).
    Jle,
    /// Jump if carry.
    Jc,
    /// Jump if no carry.
    Jnc,
    /// `CALL target`: push the return index and jump.
    Call,
    /// `RET`: pop the return index and jump to it.
    Ret,
    /// `PUSH src`.
    Push,
    /// `POP Rd`.
    Pop,
    /// `GLOAD cpu_src, gpu_dst, len`: bulk copy into compute memory.
    #[serde(rename = "GLOAD")]
    GLoad,
    /// `GSTORE gpu_src, cpu_dst, len`: bulk copy out of compute memory.
    #[serde(rename = "GSTORE")]
    GStore,
    /// `GEXEC op, src, dst, len[, scalar]`: start a parallel operation.
    #[serde(rename = "GEXEC")]
    GExec,
    /// `GWAIT`: drain the compute unit.
    #[serde(rename = "GWAIT")]
    GWait,
    /// `GRES Rd`: read the compute unit's scalar result register.
    #[serde(rename = "GRES")]
    GRes,
    /// `GREAD Rd, gpu_addr`: read one compute memory cell.
    #[serde(rename = "GREAD")]
    GRead,
    /// `GWRITE gpu_addr, src`: write one compute memory cell.
    #[serde(rename = "GWRITE")]
    GWrite,
}

/// Broad instruction classes used for statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpClass {
    /// Arithmetic, logical and compare instructions.
    Alu,
    /// Register moves and primary memory access.
    Memory,
    /// Jumps, calls and returns.
    Control,
    /// Push and pop.
    Stack,
    /// Instructions delegating to the compute unit.
    Bridge,
    /// `NOP` and `HLT`.
    System,
}

/// Accepted operand count of an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Arity {
    /// Exactly this many operands.
    Exact(usize),
    /// Any count in `min..=max`.
    Between(usize, usize),
}

impl Arity {
    /// Returns `true` if `count` operands are accepted.
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::Between(min, max) => count >= min && count <= max,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Between(min, max) => write!(f, "{min} or {max}"),
        }
    }
}

/// Condition codes of the conditional jumps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Zero flag set.
    Zero,
    /// Zero flag clear.
    NotZero,
    /// Neither zero nor negative.
    Greater,
    /// Negative flag clear.
    GreaterEqual,
    /// Negative flag set.
    Less,
    /// Zero or negative.
    LessEqual,
    /// Carry flag set.
    Carry,
    /// Carry flag clear.
    NoCarry,
}

impl Opcode {
    /// Every opcode, in mnemonic table order.
    pub const ALL: [Self; 39] = [
        Self::Nop,
        Self::Hlt,
        Self::Mov,
        Self::Load,
        Self::Store,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Shl,
        Self::Shr,
        Self::Not,
        Self::Inc,
        Self::Dec,
        Self::Cmp,
        Self::Jmp,
        Self::Jz,
        Self::Jnz,
        Self::Jg,
        Self::Jge,
        Self::Jl,
        Self::Jle,
        Self::Jc,
        Self::Jnc,
        Self::Call,
        Self::Ret,
        Self::Push,
        Self::Pop,
        Self::GLoad,
        Self::GStore,
        Self::GExec,
        Self::GWait,
        Self::GRes,
        Self::GRead,
        Self::GWrite,
    ];

    /// Returns the canonical (upper-case) mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::Hlt => "HLT",
            Self::Mov => "MOV",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Mod => "MOD",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
            Self::Shl => "SHL",
            Self::Shr => "SHR",
            Self::Not => "NOT",
            Self::Inc => "INC",
            Self::Dec => "DEC",
            Self::Cmp => "CMP",
            Self::Jmp => "JMP",
            Self::Jz => "JZ",
            Self::Jnz => "JNZ",
            Self::Jg => "JG",
            Self::Jge => "JGE",
            Self::Jl => "JL",
            Self::Jle => "JLE",
            Self::Jc => "JC",
            Self::Jnc => "JNC",
            Self::Call => "CALL",
            Self::Ret => "RET",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::GLoad => "GLOAD",
            Self::GStore => "GSTORE",
            Self::GExec => "GEXEC",
            Self::GWait => "GWAIT",
            Self::GRes => "GRES",
            Self::GRead => "GREAD",
            Self::GWrite => "GWRITE",
        }
    }

    /// Looks up an opcode by mnemonic, ignoring case.
    ///
    /// # Arguments
    ///
    /// * `token` - The opcode token as written in the source.
    ///
    /// # Returns
    ///
    /// The matching opcode, or `None` for an unknown mnemonic.
    pub fn from_mnemonic(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(token))
    }

    /// Returns the accepted operand count.
    ///
    /// `GEXEC` is the only variadic opcode: its operation identifier is followed by
    /// three or four numeric parameters.
    pub const fn arity(self) -> Arity {
        match self {
            Self::Nop | Self::Hlt | Self::Ret | Self::GWait => Arity::Exact(0),
            Self::Not
            | Self::Inc
            | Self::Dec
            | Self::Jmp
            | Self::Jz
            | Self::Jnz
            | Self::Jg
            | Self::Jge
            | Self::Jl
            | Self::Jle
            | Self::Jc
            | Self::Jnc
            | Self::Call
            | Self::Push
            | Self::Pop
            | Self::GRes => Arity::Exact(1),
            Self::Mov
            | Self::Load
            | Self::Store
            | Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::Mod
            | Self::And
            | Self::Or
            | Self::Xor
            | Self::Shl
            | Self::Shr
            | Self::Cmp
            | Self::GRead
            | Self::GWrite => Arity::Exact(2),
            Self::GLoad | Self::GStore => Arity::Exact(3),
            Self::GExec => Arity::Between(4, 5),
        }
    }

    /// Returns the instruction class.
    pub const fn class(self) -> OpClass {
        match self {
            Self::Nop | Self::Hlt => OpClass::System,
            Self::Mov | Self::Load | Self::Store => OpClass::Memory,
            Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::Mod
            | Self::And
            | Self::Or
            | Self::Xor
            | Self::Shl
            | Self::Shr
            | Self::Not
            | Self::Inc
            | Self::Dec
            | Self::Cmp => OpClass::Alu,
            Self::Jmp
            | Self::Jz
            | Self::Jnz
            | Self::Jg
            | Self::Jge
            | Self::Jl
            | Self::Jle
            | Self::Jc
            | Self::Jnc
            | Self::Call
            | Self::Ret => OpClass::Control,
            Self::Push | Self::Pop => OpClass::Stack,
            Self::GLoad
            | Self::GStore
            | Self::GExec
            | Self::GWait
            | Self::GRes
            | Self::GRead
            | Self::GWrite => OpClass::Bridge,
        }
    }

    /// Returns `true` for opcodes whose single operand is a jump target.
    pub const fn is_control_transfer(self) -> bool {
        matches!(self, Self::Jmp | Self::Call) || self.condition().is_some()
    }

    /// Returns the condition code of a conditional jump.
    pub const fn condition(self) -> Option<Condition> {
        match self {
            Self::Jz => Some(Condition::Zero),
            Self::Jnz => Some(Condition::NotZero),
            Self::Jg => Some(Condition::Greater),
            Self::Jge => Some(Condition::GreaterEqual),
            Self::Jl => Some(Condition::Less),
            Self::Jle => Some(Condition::LessEqual),
            Self::Jc => Some(Condition::Carry),
            Self::Jnc => Some(Condition::NoCarry),
            _ => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
