//! Resolved Program artifact.
//!
//! The output of a successful assembly and the input of the primary unit: validated
//! instruction texts, the label table, and the instruction-to-source-line map used by
//! hosts for diagnostics and highlighting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A resolved program.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    instructions: Vec<String>,
    labels: BTreeMap<String, usize>,
    source_lines: Vec<usize>,
}

impl Program {
    /// Builds a program from its parts without validating the instruction texts.
    ///
    /// Programs built this way may contain text the CPU fails to decode; such faults
    /// surface at runtime as fatal errors.
    ///
    /// # Arguments
    ///
    /// * `instructions` - Instruction texts in execution order.
    /// * `labels` - Label name to instruction index.
    /// * `source_lines` - 1-based source line of each instruction. A shorter list is
    ///   padded with the instruction's own position.
    pub fn from_parts(
        instructions: Vec<String>,
        labels: BTreeMap<String, usize>,
        mut source_lines: Vec<usize>,
    ) -> Self {
        source_lines.truncate(instructions.len());
        let known = source_lines.len();
        source_lines.extend((known..instructions.len()).map(|idx| idx + 1));
        Self {
            instructions,
            labels,
            source_lines,
        }
    }

    /// Builds an unlabelled program from instruction texts, one per line.
    pub fn from_instructions<I, S>(instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let instructions: Vec<String> = instructions.into_iter().map(Into::into).collect();
        Self::from_parts(instructions, BTreeMap::new(), Vec::new())
    }

    /// Instruction texts in execution order.
    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    /// Returns the instruction text at `idx`.
    pub fn instruction(&self, idx: usize) -> Option<&str> {
        self.instructions.get(idx).map(String::as_str)
    }

    /// The label table.
    pub const fn labels(&self) -> &BTreeMap<String, usize> {
        &self.labels
    }

    /// Resolves a label to its instruction index.
    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// Source line of every instruction.
    pub fn source_lines(&self) -> &[usize] {
        &self.source_lines
    }

    /// Returns the source line of the instruction at `idx`.
    pub fn source_line(&self, idx: usize) -> Option<usize> {
        self.source_lines.get(idx).copied()
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
