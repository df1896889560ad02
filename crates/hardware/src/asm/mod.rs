//! Two-Pass Assembler.
//!
//! Turns source text into a resolved [`Program`] or a complete list of diagnostics.
//! It performs:
//! 1. **Pass 1:** Strips comments and blank lines, binds `name:` labels to the index
//!    of the next instruction, and reports duplicate labels.
//! 2. **Pass 2:** Validates each instruction: opcode, operand count, register names,
//!    control-transfer targets and parallel-operation identifiers.
//!
//! Diagnostics are collected over the whole source; assembly succeeds only when
//! none were produced.

/// Resolved program artifact.
pub mod program;

use std::collections::BTreeMap;

use tracing::debug;

use crate::common::{AsmErrorKind, DecodeError, Diagnostic};
use crate::isa::decode::tokenize;
use crate::isa::operand::is_identifier;
use crate::isa::{Opcode, Operand, VectorOp};

pub use program::Program;

/// Comment introducers; everything from either character to end of line is ignored.
const COMMENT_CHARS: [char; 2] = [';', '#'];

/// An instruction line surviving pass 1.
#[derive(Debug)]
struct CleanLine<'a> {
    line: usize,
    text: &'a str,
}

/// Assembles source text.
///
/// # Arguments
///
/// * `source` - Program text, one instruction per line.
///
/// # Returns
///
/// The resolved program, or every diagnostic found, ordered by line.
///
/// # Examples
///
/// ```
/// use tandem_core::asm::assemble;
///
/// let program = assemble("loop: INC R0\nJMP loop").unwrap();
/// assert_eq!(program.len(), 2);
/// assert_eq!(program.label("loop"), Some(0));
/// ```
pub fn assemble(source: &str) -> Result<Program, Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();
    let (labels, lines) = first_pass(source, &mut diagnostics);

    for line in &lines {
        check_line(line, &labels, &mut diagnostics);
    }

    if diagnostics.is_empty() {
        debug!(
            instructions = lines.len(),
            labels = labels.len(),
            "assembly succeeded"
        );
        let instructions = lines.iter().map(|l| l.text.to_string()).collect();
        let source_lines = lines.iter().map(|l| l.line).collect();
        Ok(Program::from_parts(instructions, labels, source_lines))
    } else {
        diagnostics.sort_by_key(|d| d.line);
        debug!(count = diagnostics.len(), "assembly failed");
        Err(diagnostics)
    }
}

/// Removes a trailing comment.
fn strip_comment(line: &str) -> &str {
    line.find(|c: char| COMMENT_CHARS.contains(&c))
        .map_or(line, |pos| &line[..pos])
}

/// Splits a leading `name:` label off a cleaned line.
fn split_label(text: &str) -> (Option<&str>, &str) {
    if let Some((head, rest)) = text.split_once(':') {
        let name = head.trim();
        if is_identifier(name) {
            return (Some(name), rest.trim());
        }
    }
    (None, text)
}

/// Pass 1: label table and cleaned instruction list.
fn first_pass<'a>(
    source: &'a str,
    diagnostics: &mut Vec<Diagnostic>,
) -> (BTreeMap<String, usize>, Vec<CleanLine<'a>>) {
    let mut labels = BTreeMap::new();
    let mut lines = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let text = strip_comment(raw).trim();
        if text.is_empty() {
            continue;
        }

        let (label, rest) = split_label(text);
        if let Some(name) = label {
            if labels.contains_key(name) {
                diagnostics.push(Diagnostic::new(
                    line,
                    AsmErrorKind::DuplicateLabel(name.to_string()),
                ));
            } else {
                let _ = labels.insert(name.to_string(), lines.len());
            }
        }

        if !rest.is_empty() {
            lines.push(CleanLine { line, text: rest });
        }
    }

    (labels, lines)
}

/// Pass 2: validates one instruction line.
///
/// Every operand is checked, so one line can yield several diagnostics. Malformed
/// literals outside jump targets are not an assembly-time diagnostic; they surface
/// as a runtime fault if the instruction executes.
fn check_line(
    line: &CleanLine<'_>,
    labels: &BTreeMap<String, usize>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some((mnemonic, tokens)) = tokenize(line.text) else {
        return;
    };
    let Some(opcode) = Opcode::from_mnemonic(mnemonic) else {
        diagnostics.push(Diagnostic::new(
            line.line,
            AsmErrorKind::UnknownInstruction(mnemonic.to_string()),
        ));
        return;
    };

    let arity = opcode.arity();
    if !arity.accepts(tokens.len()) {
        diagnostics.push(Diagnostic::new(
            line.line,
            AsmErrorKind::OperandCount {
                opcode,
                expected: arity,
                found: tokens.len(),
            },
        ));
    }

    for (idx, token) in tokens.iter().enumerate() {
        if opcode == Opcode::GExec && idx == 0 {
            if VectorOp::from_name(token).is_none() {
                diagnostics.push(Diagnostic::new(
                    line.line,
                    AsmErrorKind::UnknownVectorOp((*token).to_string()),
                ));
            }
            continue;
        }

        match Operand::parse(token) {
            Err(DecodeError::InvalidRegister(name)) => {
                diagnostics.push(Diagnostic::new(
                    line.line,
                    AsmErrorKind::InvalidRegister(name),
                ));
            }
            Ok(Operand::Label(name)) if opcode.is_control_transfer() && idx == 0 => {
                if !labels.contains_key(&name) {
                    diagnostics.push(Diagnostic::new(
                        line.line,
                        AsmErrorKind::UndefinedLabel(name),
                    ));
                }
            }
            Err(_) if opcode.is_control_transfer() && idx == 0 => {
                diagnostics.push(Diagnostic::new(
                    line.line,
                    AsmErrorKind::UndefinedLabel((*token).to_string()),
                ));
            }
            _ => {}
        }
    }
}
