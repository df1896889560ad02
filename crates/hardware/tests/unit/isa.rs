//! # Instruction Set Tests
//!
//! Opcode vocabulary, operand parsing and textual decoding.

use rstest::rstest;
use tandem_core::common::DecodeError;
use tandem_core::isa::operand::parse_integer;
use tandem_core::isa::{Arity, Condition, OpClass, Opcode, Operand, VectorOp, decode};

use crate::common::r;

#[rstest]
#[case::decimal("42", Some(42))]
#[case::negative("-3", Some(-3))]
#[case::hex_lower("0x1f", Some(31))]
#[case::hex_upper("0XFF", Some(255))]
#[case::negative_hex("-0x10", Some(-16))]
#[case::empty_hex("0x", None)]
#[case::junk("12a", None)]
#[case::bare_minus("-", None)]
fn test_parse_integer(#[case] token: &str, #[case] expected: Option<i64>) {
    assert_eq!(parse_integer(token), expected);
}

#[test]
fn test_operand_forms() {
    assert_eq!(Operand::parse("r2"), Ok(Operand::Register(r(2))));
    assert_eq!(Operand::parse("70000"), Ok(Operand::Immediate(70000)));
    assert_eq!(Operand::parse("loop_1"), Ok(Operand::Label("loop_1".into())));
    assert_eq!(
        Operand::parse("R12"),
        Err(DecodeError::InvalidRegister("R12".into()))
    );
    assert_eq!(
        Operand::parse("$x"),
        Err(DecodeError::InvalidOperand("$x".into()))
    );
}

#[test]
fn test_mnemonic_lookup_round_trips() {
    for op in Opcode::ALL {
        assert_eq!(Opcode::from_mnemonic(op.mnemonic()), Some(op));
        assert_eq!(
            Opcode::from_mnemonic(&op.mnemonic().to_lowercase()),
            Some(op)
        );
    }
    assert_eq!(Opcode::from_mnemonic("FROB"), None);
}

#[test]
fn test_vector_op_table() {
    assert_eq!(VectorOp::ALL.len(), 12);
    assert_eq!(VectorOp::from_name("dot"), Some(VectorOp::Dot));
    assert_eq!(VectorOp::from_name("FOO"), None);

    let reductions: Vec<VectorOp> = VectorOp::ALL
        .into_iter()
        .filter(|op| op.is_reduction())
        .collect();
    assert_eq!(
        reductions,
        vec![VectorOp::Dot, VectorOp::Sum, VectorOp::Max, VectorOp::Min]
    );
}

#[test]
fn test_classes_and_conditions() {
    assert_eq!(Opcode::Cmp.class(), OpClass::Alu);
    assert_eq!(Opcode::Load.class(), OpClass::Memory);
    assert_eq!(Opcode::Call.class(), OpClass::Control);
    assert_eq!(Opcode::Pop.class(), OpClass::Stack);
    assert_eq!(Opcode::GWait.class(), OpClass::Bridge);
    assert_eq!(Opcode::Hlt.class(), OpClass::System);

    assert_eq!(Opcode::Jle.condition(), Some(Condition::LessEqual));
    assert_eq!(Opcode::Jmp.condition(), None);
    assert!(Opcode::Call.is_control_transfer());
    assert!(!Opcode::Ret.is_control_transfer());
}

#[test]
fn test_arity_table() {
    assert_eq!(Opcode::Nop.arity(), Arity::Exact(0));
    assert_eq!(Opcode::Push.arity(), Arity::Exact(1));
    assert_eq!(Opcode::Store.arity(), Arity::Exact(2));
    assert_eq!(Opcode::GLoad.arity(), Arity::Exact(3));
    assert!(Opcode::GExec.arity().accepts(4));
    assert!(Opcode::GExec.arity().accepts(5));
    assert!(!Opcode::GExec.arity().accepts(6));
}

#[test]
fn test_decode_display() {
    let inst = decode("add   r1 ,0x10").unwrap();
    assert_eq!(inst.opcode, Opcode::Add);
    assert_eq!(inst.to_string(), "ADD R1, 16");

    let inst = decode("gexec copy 0 64 8").unwrap();
    assert_eq!(inst.to_string(), "GEXEC COPY, 0, 64, 8");
}

#[test]
fn test_decode_errors() {
    assert_eq!(decode("   "), Err(DecodeError::Empty));
    assert_eq!(
        decode("FROB R0"),
        Err(DecodeError::UnknownOpcode("FROB".into()))
    );
    assert_eq!(
        decode("GEXEC NOPE, 0, 0, 1"),
        Err(DecodeError::UnknownVectorOp("NOPE".into()))
    );
}
