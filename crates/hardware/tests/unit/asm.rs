//! # Assembler Tests
//!
//! Label binding, source cleaning, and the batch-collected diagnostics of both passes.

use pretty_assertions::assert_eq;
use tandem_core::asm::assemble;
use tandem_core::common::{AsmErrorKind, Diagnostic};
use tandem_core::isa::{Arity, Opcode};

fn diagnostics(source: &str) -> Vec<Diagnostic> {
    match assemble(source) {
        Ok(program) => panic!("expected diagnostics, assembled {program:?}"),
        Err(diagnostics) => diagnostics,
    }
}

#[test]
fn test_loop_label_binds_to_next_instruction() {
    let program = assemble("MOV R0, 3\nloop:\n  DEC R0\n  JNZ loop\nHLT").unwrap();
    assert_eq!(program.len(), 4);
    assert_eq!(program.label("loop"), Some(1));
    assert_eq!(program.instruction(1), Some("DEC R0"));
    assert_eq!(program.source_lines(), &[1, 3, 4, 5]);
}

#[test]
fn test_label_on_same_line_as_instruction() {
    let program = assemble("start: MOV R1, 1\nJMP start").unwrap();
    assert_eq!(program.label("start"), Some(0));
    assert_eq!(program.instruction(0), Some("MOV R1, 1"));
}

#[test]
fn test_trailing_label_points_past_end() {
    let program = assemble("JMP end\nend:").unwrap();
    assert_eq!(program.len(), 1);
    assert_eq!(program.label("end"), Some(1));
}

#[test]
fn test_comments_and_blank_lines_are_dropped() {
    let source = "; header comment\n\n  # another\nMOV R0, 1 ; trailing\nHLT # done\n";
    let program = assemble(source).unwrap();
    assert_eq!(program.instructions(), &["MOV R0, 1", "HLT"]);
    assert_eq!(program.source_lines(), &[4, 5]);
}

#[test]
fn test_empty_source_assembles_to_empty_program() {
    let program = assemble("").unwrap();
    assert!(program.is_empty());
    assert!(program.labels().is_empty());

    let program = assemble("; nothing here\n\n").unwrap();
    assert!(program.is_empty());
}

#[test]
fn test_duplicate_label_reported_on_second_definition() {
    let diags = diagnostics("x: NOP\nx: HLT");
    assert_eq!(
        diags,
        vec![Diagnostic::new(2, AsmErrorKind::DuplicateLabel("x".into()))]
    );
}

#[test]
fn test_unknown_instruction() {
    let diags = diagnostics("NOP\nFROB R0");
    assert_eq!(
        diags,
        vec![Diagnostic::new(
            2,
            AsmErrorKind::UnknownInstruction("FROB".into())
        )]
    );
}

#[test]
fn test_operand_count() {
    let diags = diagnostics("ADD R0");
    assert_eq!(
        diags,
        vec![Diagnostic::new(
            1,
            AsmErrorKind::OperandCount {
                opcode: Opcode::Add,
                expected: Arity::Exact(2),
                found: 1,
            }
        )]
    );
}

#[test]
fn test_gexec_accepts_four_or_five_operands() {
    assert!(assemble("GEXEC ADD, 0, 8, 8").is_ok());
    assert!(assemble("GEXEC SCALE, 0, 8, 8, 3").is_ok());

    let diags = diagnostics("GEXEC ADD, 0, 8");
    assert_eq!(diags.len(), 1);
    assert!(matches!(
        diags[0].kind,
        AsmErrorKind::OperandCount {
            expected: Arity::Between(4, 5),
            found: 3,
            ..
        }
    ));
}

#[test]
fn test_invalid_register() {
    let diags = diagnostics("MOV R8, 1");
    assert_eq!(
        diags,
        vec![Diagnostic::new(1, AsmErrorKind::InvalidRegister("R8".into()))]
    );
}

#[test]
fn test_undefined_label() {
    let diags = diagnostics("JMP nowhere");
    assert_eq!(
        diags,
        vec![Diagnostic::new(
            1,
            AsmErrorKind::UndefinedLabel("nowhere".into())
        )]
    );
}

#[test]
fn test_numeric_jump_target_needs_no_label() {
    let program = assemble("JMP 0").unwrap();
    assert_eq!(program.len(), 1);
}

#[test]
fn test_unknown_vector_operation() {
    let diags = diagnostics("GEXEC FOO, 0, 0, 1");
    assert_eq!(
        diags,
        vec![Diagnostic::new(1, AsmErrorKind::UnknownVectorOp("FOO".into()))]
    );
}

#[test]
fn test_all_diagnostics_collected_in_line_order() {
    let source = "JMP missing\nFROB\nMOV R9, 1\nx: NOP\nx: NOP";
    let lines: Vec<usize> = diagnostics(source).iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![1, 2, 3, 5]);
}

#[test]
fn test_mnemonics_are_case_insensitive() {
    let program = assemble("mov r0, 0x10\nhlt").unwrap();
    assert_eq!(program.len(), 2);
}

#[test]
fn test_diagnostic_display_names_line() {
    let diag = Diagnostic::new(7, AsmErrorKind::UndefinedLabel("foo".into()));
    assert_eq!(diag.to_string(), "line 7: undefined label 'foo'");
}
