//! Assembly Diagnostics and Runtime Fault definitions.
//!
//! This module defines the two disjoint error taxonomies of the simulator. It provides:
//! 1. **Decode Errors:** Problems found while splitting instruction text into an opcode
//!    and operands, shared by the assembler and the CPU's decode stage.
//! 2. **Assembly Diagnostics:** Line-tagged, batch-collected problems that make a source
//!    text fail to assemble.
//! 3. **Runtime Faults:** Single-shot errors that halt the primary unit.
//! 4. **Compute Unit Rejections:** Commands the compute unit refuses to accept.
//! 5. **Configuration Errors:** JSON parsing and validation failures.

use serde::Serialize;
use thiserror::Error;

use crate::isa::{Arity, Opcode, VectorOp};

/// Failure to decode one instruction's text.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
pub enum DecodeError {
    /// The instruction text was empty.
    #[error("empty instruction")]
    Empty,

    /// The opcode token is not part of the instruction set.
    #[error("unknown instruction '{0}'")]
    UnknownOpcode(String),

    /// The operand count does not match the opcode's arity.
    #[error("{opcode} expects {expected} operand(s), got {found}")]
    OperandCount {
        /// Opcode whose arity was violated.
        opcode: Opcode,
        /// Accepted operand count(s).
        expected: Arity,
        /// Number of operands supplied.
        found: usize,
    },

    /// A register token names a register outside `R0`-`R7`.
    #[error("invalid register '{0}'")]
    InvalidRegister(String),

    /// The parallel-operation identifier of `GEXEC` is unknown.
    #[error("unknown parallel operation '{0}'")]
    UnknownVectorOp(String),

    /// An operand is neither a register, an integer literal, nor an identifier.
    #[error("invalid operand '{0}'")]
    InvalidOperand(String),
}

/// Kind of a single assembly diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
pub enum AsmErrorKind {
    /// A label name was defined more than once; the later definition is dropped.
    #[error("duplicate label '{0}' (already defined)")]
    DuplicateLabel(String),

    /// The opcode token is not part of the instruction set.
    #[error("unknown instruction '{0}'")]
    UnknownInstruction(String),

    /// The operand count does not match the opcode's arity.
    #[error("{opcode} expects {expected} operand(s), got {found}")]
    OperandCount {
        /// Opcode whose arity was violated.
        opcode: Opcode,
        /// Accepted operand count(s).
        expected: Arity,
        /// Number of operands supplied.
        found: usize,
    },

    /// A register token names a register outside `R0`-`R7`.
    #[error("invalid register '{0}'")]
    InvalidRegister(String),

    /// A control-transfer target names a label that is never defined.
    #[error("undefined label '{0}'")]
    UndefinedLabel(String),

    /// The parallel-operation identifier of `GEXEC` is unknown.
    #[error("unknown parallel operation '{0}'")]
    UnknownVectorOp(String),
}

/// A line-tagged assembly diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[error("line {line}: {kind}")]
pub struct Diagnostic {
    /// 1-based source line the diagnostic refers to.
    pub line: usize,
    /// What went wrong.
    pub kind: AsmErrorKind,
}

impl Diagnostic {
    /// Creates a diagnostic for `line`.
    pub const fn new(line: usize, kind: AsmErrorKind) -> Self {
        Self { line, kind }
    }
}

/// Commands rejected by the compute unit.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
pub enum ComputeError {
    /// An operation was started while another one is still in flight.
    #[error("compute unit is busy with {0}")]
    Busy(VectorOp),
}

/// Fatal runtime error of the primary unit.
///
/// Raising one halts the CPU; the failing instruction leaves no partial effect.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
pub enum ExecError {
    /// The instruction text could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// An operand that must name a register does not.
    #[error("invalid register reference '{0}'")]
    InvalidRegister(String),

    /// An operand could not be turned into a value.
    #[error("invalid operand '{0}'")]
    InvalidOperand(String),

    /// An identifier operand names no label of the loaded program.
    #[error("invalid operand '{0}': no such label")]
    UnknownLabel(String),

    /// `DIV` or `MOD` by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A bridge instruction ran with no compute unit attached.
    #[error("{0} requires an attached compute unit")]
    NoComputeUnit(Opcode),

    /// The compute unit rejected a command.
    #[error(transparent)]
    Compute(#[from] ComputeError),
}

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text is not valid JSON for the config schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// A field holds a value outside its accepted range.
    #[error("invalid configuration value for '{field}': {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
