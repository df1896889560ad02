//! Architectural state components.
//!
//! This module contains the condition flags of the primary unit. The register file
//! lives in [`crate::common::reg`]; primary memory, PC and SP are plain fields of
//! [`crate::core::Cpu`].

/// Condition flags and the jump predicate table.
pub mod flags;

pub use flags::Flags;
