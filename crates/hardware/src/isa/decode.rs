//! Textual Instruction Decoder.
//!
//! This module splits one instruction's text into an opcode token and operand tokens
//! and turns them into an [`Instruction`]. Operands are separated by commas and/or
//! whitespace; opcode and register tokens are case-insensitive.
//!
//! The same decoder runs in the assembler's second pass and in the CPU's decode
//! stage, so a program assembled without diagnostics always decodes at runtime.

use crate::common::DecodeError;
use crate::isa::instruction::Instruction;
use crate::isa::{Opcode, Operand};

/// Splits instruction text into its opcode token and operand tokens.
///
/// # Arguments
///
/// * `text` - One instruction, with labels and comments already removed.
///
/// # Returns
///
/// `None` for blank text, otherwise the opcode token and the operand tokens.
pub fn tokenize(text: &str) -> Option<(&str, Vec<&str>)> {
    let mut tokens = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty());
    let mnemonic = tokens.next()?;
    Some((mnemonic, tokens.collect()))
}

/// Decodes a single instruction.
///
/// # Arguments
///
/// * `text` - One instruction, with labels and comments already removed.
///
/// # Returns
///
/// The decoded instruction, or the first decode error encountered: unknown opcode,
/// wrong operand count, then the first bad operand in source order.
pub fn decode(text: &str) -> Result<Instruction, DecodeError> {
    let (mnemonic, tokens) = tokenize(text).ok_or(DecodeError::Empty)?;
    let opcode = Opcode::from_mnemonic(mnemonic)
        .ok_or_else(|| DecodeError::UnknownOpcode(mnemonic.to_string()))?;

    let arity = opcode.arity();
    if !arity.accepts(tokens.len()) {
        return Err(DecodeError::OperandCount {
            opcode,
            expected: arity,
            found: tokens.len(),
        });
    }

    let operands = tokens
        .iter()
        .enumerate()
        .map(|(idx, token)| {
            if opcode == Opcode::GExec && idx == 0 {
                Operand::parse_vector_op(token)
            } else {
                Operand::parse(token)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Instruction::new(opcode, operands))
}
