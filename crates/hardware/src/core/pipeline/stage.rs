//! Pipeline Stages and Micro-Operations.
//!
//! A micro-operation is a descriptive record of one pipeline sub-step. Micro-operations
//! are emitted for observation only; the register and memory state they describe is
//! changed by the commit that follows the last one, never by the records themselves.

use std::fmt;

use serde::Serialize;

/// One stage of the fetch/decode/execute/writeback cycle.
///
/// Both the primary unit and the compute unit cycle through these stages; the
/// compute unit runs them in the order decode, fetch, execute, writeback per batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Instruction (or operand) fetch.
    Fetch,
    /// Decode.
    Decode,
    /// Execute sub-phase.
    Execute,
    /// Writeback.
    Writeback,
}

impl Stage {
    /// Upper-case stage label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fetch => "FETCH",
            Self::Decode => "DECODE",
            Self::Execute => "EXECUTE",
            Self::Writeback => "WRITEBACK",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A descriptive record of one pipeline sub-step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MicroOp {
    /// Stage the sub-step belongs to.
    pub stage: Stage,
    /// Human-readable description.
    pub description: String,
    /// Symbolic source (register name, `PC`, memory cell, ...).
    pub source: Option<String>,
    /// Symbolic destination.
    pub destination: Option<String>,
    /// Value moved or computed, when known.
    pub value: Option<i64>,
}

impl MicroOp {
    /// Creates a micro-operation with a description and no operands.
    pub fn new(stage: Stage, description: impl Into<String>) -> Self {
        Self {
            stage,
            description: description.into(),
            source: None,
            destination: None,
            value: None,
        }
    }

    /// Sets the symbolic source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the symbolic destination.
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Sets the value, if one is known.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Option<i64>>) -> Self {
        self.value = value.into();
        self
    }
}

impl fmt::Display for MicroOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.description)?;
        if let Some(value) = self.value {
            write!(f, " = {value}")?;
        }
        Ok(())
    }
}
