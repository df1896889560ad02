//! Instruction Operands.
//!
//! Operand tokens take one of four forms: a register (`R0`-`R7`), a decimal or
//! `0x`-prefixed hexadecimal integer, a bare identifier naming a label, or (only as
//! the first operand of `GEXEC`) a parallel-operation identifier.

use std::fmt;

use serde::Serialize;

use crate::common::{DecodeError, Reg};
use crate::isa::VectorOp;

/// A parsed operand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Operand {
    /// A general-purpose register.
    Register(Reg),
    /// An integer literal, kept unmasked until it is used.
    Immediate(i64),
    /// A label reference, resolved against the program's label table.
    Label(String),
    /// A compute unit operation identifier.
    VectorOp(VectorOp),
}

/// Returns `true` if `token` has the shape of a register name (`R` + digits).
pub fn is_register_token(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some('R' | 'r'))
        && token.len() > 1
        && chars.all(|c| c.is_ascii_digit())
}

/// Returns `true` if `token` is a valid identifier (label name).
pub fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parses an integer literal: optional `-`, then decimal digits or `0x` + hex digits.
pub fn parse_integer(token: &str) -> Option<i64> {
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let magnitude = if let Some(hex) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        i64::from_str_radix(hex, 16).ok()?
    } else {
        if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        body.parse::<i64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

impl Operand {
    /// Parses a general operand token.
    ///
    /// # Arguments
    ///
    /// * `token` - A single operand, already separated from its neighbours.
    ///
    /// # Returns
    ///
    /// The operand, or `InvalidRegister` for `R8` and above, or `InvalidOperand`
    /// for a token matching none of the operand forms.
    pub fn parse(token: &str) -> Result<Self, DecodeError> {
        if is_register_token(token) {
            return token[1..]
                .parse::<usize>()
                .ok()
                .and_then(Reg::new)
                .map(Self::Register)
                .ok_or_else(|| DecodeError::InvalidRegister(token.to_string()));
        }
        if let Some(value) = parse_integer(token) {
            return Ok(Self::Immediate(value));
        }
        if is_identifier(token) {
            return Ok(Self::Label(token.to_string()));
        }
        Err(DecodeError::InvalidOperand(token.to_string()))
    }

    /// Parses the operation identifier operand of `GEXEC`.
    pub fn parse_vector_op(token: &str) -> Result<Self, DecodeError> {
        VectorOp::from_name(token)
            .map(Self::VectorOp)
            .ok_or_else(|| DecodeError::UnknownVectorOp(token.to_string()))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(reg) => write!(f, "{reg}"),
            Self::Immediate(value) => write!(f, "{value}"),
            Self::Label(name) => f.write_str(name),
            Self::VectorOp(op) => write!(f, "{op}"),
        }
    }
}
