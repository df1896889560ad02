//! Source Loader.
//!
//! This module reads assembly source from disk and turns it into a loadable program. It performs:
//! 1. **File reading:** Reads the whole source file as UTF-8 text.
//! 2. **Assembly:** Runs both assembler passes and keeps every diagnostic on failure.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::asm::{self, Program};
use crate::common::Diagnostic;

/// Failure to load a program from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("could not read source: {0}")]
    Io(#[from] std::io::Error),

    /// The source did not assemble.
    #[error("assembly failed with {} diagnostic(s)", .0.len())]
    Assembly(Vec<Diagnostic>),
}

impl LoadError {
    /// Diagnostics of a failed assembly; empty for I/O errors.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Assembly(diagnostics) => diagnostics,
            Self::Io(_) => &[],
        }
    }
}

/// Reads and assembles a source file.
///
/// # Arguments
///
/// * `path` - Path to the assembly source.
///
/// # Returns
///
/// The resolved program, or the I/O error or the full list of diagnostics.
pub fn load_program(path: impl AsRef<Path>) -> Result<Program, LoadError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    let program = asm::assemble(&source).map_err(LoadError::Assembly)?;
    tracing::debug!(path = %path.display(), instructions = program.len(), "source loaded");
    Ok(program)
}
