//! Instruction Set Definitions.
//!
//! Contains the opcode and operand vocabulary of the primary unit and the decoding
//! logic shared by the assembler and the CPU.
//!
//! # Vocabulary
//!
//! * `opcode`: Register-machine opcodes, bridge opcodes, arity table and condition codes.
//! * `vector_op`: The twelve compute unit operation identifiers.
//! * `operand`: Register, integer, label and operation operands.
//! * `instruction`: The decoded instruction type.
//! * `decode`: Text to instruction decoding.

/// Textual instruction decoding.
pub mod decode;

/// Decoded instruction structure.
pub mod instruction;

/// Opcodes, arity table, instruction classes and condition codes.
pub mod opcode;

/// Operand forms and literal parsing.
pub mod operand;

/// Compute unit operation identifiers.
pub mod vector_op;

pub use decode::decode;
pub use instruction::Instruction;
pub use opcode::{Arity, Condition, OpClass, Opcode};
pub use operand::Operand;
pub use vector_op::VectorOp;
