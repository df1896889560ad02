//! Parallel-Operation Identifiers.
//!
//! The twelve operations the compute unit can run over a vector, named by the first
//! operand of `GEXEC`. Each one is either elementwise (results written to the
//! destination region) or a reduction (results folded into the scalar result register).

use std::fmt;

use serde::Serialize;

/// A compute unit operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VectorOp {
    /// `dst[i] = src[i] + dst[i]`.
    Add,
    /// `dst[i] = src[i] - dst[i]`.
    Sub,
    /// `dst[i] = src[i] * dst[i]`.
    Mul,
    /// `dst[i] = src[i] / dst[i]`, or 0 when `dst[i]` is 0.
    Div,
    /// `dst[i] = src[i] * scalar`.
    Scale,
    /// `result = sum(src[i] * dst[i])`.
    Dot,
    /// `result = sum(src[i])`.
    Sum,
    /// `result = max(src[i])`.
    Max,
    /// `result = min(src[i])`.
    Min,
    /// `dst[i] = |src[i]|` under two's complement.
    Abs,
    /// `dst[i] = floor(sqrt(src[i]))`.
    Sqrt,
    /// `dst[i] = src[i]`.
    Copy,
}

impl VectorOp {
    /// Every operation, in identifier table order.
    pub const ALL: [Self; 12] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Scale,
        Self::Dot,
        Self::Sum,
        Self::Max,
        Self::Min,
        Self::Abs,
        Self::Sqrt,
        Self::Copy,
    ];

    /// Returns the canonical identifier.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Scale => "SCALE",
            Self::Dot => "DOT",
            Self::Sum => "SUM",
            Self::Max => "MAX",
            Self::Min => "MIN",
            Self::Abs => "ABS",
            Self::Sqrt => "SQRT",
            Self::Copy => "COPY",
        }
    }

    /// Looks up an operation by identifier, ignoring case.
    pub fn from_name(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(token))
    }

    /// Returns `true` if the operation folds into the result register instead of
    /// writing the destination region.
    pub const fn is_reduction(self) -> bool {
        matches!(self, Self::Dot | Self::Sum | Self::Max | Self::Min)
    }

    /// Returns `true` if the second lane input is read from the destination region.
    pub const fn reads_destination(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Dot
        )
    }

    /// Returns `true` if the second lane input is the instruction's scalar.
    pub const fn uses_scalar(self) -> bool {
        matches!(self, Self::Scale)
    }
}

impl fmt::Display for VectorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
