//! # ALU Tests
//!
//! Every operation is computed unmasked; the value is masked to 16 bits and the
//! flags are derived from the unmasked result.

use proptest::prelude::*;
use rstest::rstest;
use tandem_core::common::ExecError;
use tandem_core::core::arch::Flags;
use tandem_core::core::pipeline::signals::AluOp;
use tandem_core::core::units::alu::Alu;

const fn flags(zero: bool, negative: bool, carry: bool) -> Flags {
    Flags {
        zero,
        negative,
        carry,
    }
}

#[rstest]
#[case::add(AluOp::Add, 2, 3, 5, flags(false, false, false))]
#[case::add_wraps(AluOp::Add, 0xFFFF, 1, 0, flags(false, false, true))]
#[case::add_sign(AluOp::Add, 0x7FFF, 1, 0x8000, flags(false, true, false))]
#[case::sub_zero(AluOp::Sub, 5, 5, 0, flags(true, false, false))]
#[case::sub_borrow(AluOp::Sub, 3, 5, 0xFFFE, flags(false, true, true))]
#[case::mul_overflow(AluOp::Mul, 300, 300, 24464, flags(false, false, true))]
#[case::div_floors(AluOp::Div, 7, 2, 3, flags(false, false, false))]
#[case::modulo(AluOp::Mod, 7, 2, 1, flags(false, false, false))]
#[case::and(AluOp::And, 0b1100, 0b1010, 0b1000, flags(false, false, false))]
#[case::or(AluOp::Or, 0b1100, 0b1010, 0b1110, flags(false, false, false))]
#[case::xor_self(AluOp::Xor, 0x1234, 0x1234, 0, flags(true, false, false))]
#[case::shl_carry(AluOp::Shl, 0x8000, 1, 0, flags(false, false, true))]
#[case::shl_amount_masked(AluOp::Shl, 1, 17, 2, flags(false, false, false))]
#[case::shr_to_zero(AluOp::Shr, 1, 1, 0, flags(true, false, false))]
#[case::not_zero(AluOp::Not, 0, 0, 0xFFFF, flags(false, true, false))]
#[case::inc(AluOp::Inc, 41, 0, 42, flags(false, false, false))]
#[case::inc_wraps(AluOp::Inc, 0xFFFF, 0, 0, flags(false, false, true))]
#[case::dec_below_zero(AluOp::Dec, 0, 0, 0xFFFF, flags(false, true, true))]
fn test_alu_operation(
    #[case] op: AluOp,
    #[case] a: u16,
    #[case] b: u16,
    #[case] value: u16,
    #[case] expected: Flags,
) {
    let out = Alu::execute(op, a, b).unwrap();
    assert_eq!(out.value, value, "{op:?} {a:#x}, {b:#x}");
    assert_eq!(out.flags, expected, "{op:?} {a:#x}, {b:#x}");
}

#[test]
fn test_division_by_zero() {
    assert_eq!(Alu::execute(AluOp::Div, 9, 0), Err(ExecError::DivisionByZero));
    assert_eq!(Alu::execute(AluOp::Mod, 9, 0), Err(ExecError::DivisionByZero));
}

#[test]
fn test_flags_from_raw_result() {
    assert_eq!(Flags::from_result(0), flags(true, false, false));
    assert_eq!(Flags::from_result(-1), flags(false, true, true));
    assert_eq!(Flags::from_result(0x1_0000), flags(false, false, true));
    assert_eq!(Flags::from_result(0x8001), flags(false, true, false));
    assert_eq!(Flags::default().to_string(), "Z=0 N=0 C=0");
}

proptest! {
    #[test]
    fn prop_add_wraps_and_carries(a in any::<u16>(), b in any::<u16>()) {
        let out = Alu::execute(AluOp::Add, a, b).unwrap();
        prop_assert_eq!(out.value, a.wrapping_add(b));
        prop_assert_eq!(out.flags.carry, u32::from(a) + u32::from(b) > 0xFFFF);
        prop_assert_eq!(out.raw, i64::from(a) + i64::from(b));
    }

    #[test]
    fn prop_sub_sets_carry_on_borrow(a in any::<u16>(), b in any::<u16>()) {
        let out = Alu::execute(AluOp::Sub, a, b).unwrap();
        prop_assert_eq!(out.value, a.wrapping_sub(b));
        prop_assert_eq!(out.flags.carry, a < b);
        prop_assert_eq!(out.flags.zero, a == b);
    }

    #[test]
    fn prop_value_is_masked_raw(a in any::<u16>(), b in 1u16..=u16::MAX) {
        for op in [AluOp::Mul, AluOp::Div, AluOp::Mod, AluOp::Shl, AluOp::Xor] {
            let out = Alu::execute(op, a, b).unwrap();
            prop_assert_eq!(i64::from(out.value), out.raw & 0xFFFF);
            prop_assert_eq!(out.flags, Flags::from_result(out.raw));
        }
    }
}
