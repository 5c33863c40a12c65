use core::cmp::Ordering;

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use proptest::prelude::*;

use super::RadixMath;
use crate::ctx::{Context, Rounding, Status};
use crate::helper::RadixHelper;
use crate::num::{ArithmeticSupport, NumFlags};
use crate::plain::{Plain, PlainHelper};

fn dec() -> RadixMath<PlainHelper> {
    RadixMath::new(PlainHelper::decimal())
}

fn bin() -> RadixMath<PlainHelper> {
    RadixMath::new(PlainHelper::binary())
}

fn val(math: &RadixMath<PlainHelper>, mantissa: i64, exponent: i64) -> Plain {
    let flags = if mantissa < 0 {
        NumFlags::NEGATIVE
    } else {
        NumFlags::empty()
    };
    math.helper().create_with_flags(
        BigUint::from(mantissa.unsigned_abs()),
        BigInt::from(exponent),
        flags,
    )
}

fn quiet_nan(math: &RadixMath<PlainHelper>, payload: u64) -> Plain {
    math.helper()
        .create_with_flags(BigUint::from(payload), BigInt::zero(), NumFlags::QUIET_NAN)
}

fn signaling_nan(math: &RadixMath<PlainHelper>, payload: u64) -> Plain {
    math.helper().create_with_flags(
        BigUint::from(payload),
        BigInt::zero(),
        NumFlags::SIGNALING_NAN,
    )
}

fn infinity(math: &RadixMath<PlainHelper>, negative: bool) -> Plain {
    let mut flags = NumFlags::INFINITY;
    if negative {
        flags |= NumFlags::NEGATIVE;
    }
    math.helper()
        .create_with_flags(BigUint::zero(), BigInt::zero(), flags)
}

#[test]
fn test_add_basic() {
    let m = dec();
    let mut ctx = Context::new(9);
    let sum = m.add(&val(&m, 1, 0), &val(&m, 3, 0), &mut ctx).unwrap();
    assert_eq!(sum.to_string(), "4E0");
    assert!(ctx.flags.is_empty());
}

#[test]
fn test_add_rounds_far_operand() {
    let m = dec();
    let mut ctx = Context::new(3);
    // 100 + 0.001 cannot be represented in 3 digits.
    let sum = m.add(&val(&m, 100, 0), &val(&m, 1, -3), &mut ctx).unwrap();
    assert_eq!(sum.to_string(), "100E0");
    assert!(ctx.flags.contains(Status::INEXACT | Status::ROUNDED));
}

#[test]
fn test_subtract_equal_operands_zero_sign() {
    let m = dec();
    let one = val(&m, 1, 0);
    let mut ctx = Context::new(9);
    let diff = m.subtract(&one, &one, &mut ctx).unwrap();
    assert!(diff.is_zero());
    assert!(!diff.is_negative());

    // Floor rounding makes an exact zero difference negative.
    let mut ctx = Context::new(9).with_rounding(Rounding::Floor);
    let diff = m.subtract(&one, &one, &mut ctx).unwrap();
    assert!(diff.is_zero());
    assert!(diff.is_negative());
}

#[test]
fn test_rounding_modes_at_halfway() {
    let m = dec();
    let cases = [
        (Rounding::HalfEven, 25, "2E1"),
        (Rounding::HalfEven, 35, "4E1"),
        (Rounding::HalfUp, 25, "3E1"),
        (Rounding::HalfDown, 25, "2E1"),
        (Rounding::Up, 21, "3E1"),
        (Rounding::Down, 29, "2E1"),
        (Rounding::Ceiling, 21, "3E1"),
        (Rounding::Floor, 29, "2E1"),
        (Rounding::ZeroFiveUp, 25, "2E1"),
        (Rounding::ZeroFiveUp, 51, "6E1"),
    ];
    for (rounding, mantissa, expect) in cases {
        let mut ctx = Context::new(1).with_rounding(rounding);
        let r = m.round_to_precision(&val(&m, mantissa, 0), &mut ctx).unwrap();
        assert_eq!(r.to_string(), expect, "{rounding:?} {mantissa}");
        assert!(ctx.flags.contains(Status::INEXACT | Status::ROUNDED));
    }
}

#[test]
fn test_rounding_negative_directed() {
    let m = dec();
    let mut ctx = Context::new(1).with_rounding(Rounding::Ceiling);
    let r = m.round_to_precision(&val(&m, -29, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "-2E1");
    let mut ctx = Context::new(1).with_rounding(Rounding::Floor);
    let r = m.round_to_precision(&val(&m, -21, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "-3E1");
}

#[test]
fn test_rounding_unnecessary_signals_invalid() {
    let m = dec();
    let mut ctx = Context::new(2).with_rounding(Rounding::Unnecessary);
    let r = m.round_to_precision(&val(&m, 123, 0), &mut ctx).unwrap();
    assert!(r.flags().is_nan());
    assert!(ctx.flags.contains(Status::INVALID));
}

#[test]
fn test_overflow_to_infinity() {
    let m = dec();
    let mut ctx = Context::new(3)
        .with_exponent_range(BigInt::from(-2), BigInt::from(2));
    let r = m.round_to_precision(&val(&m, 1000, 0), &mut ctx).unwrap();
    assert!(r.flags().is_infinity());
    assert!(!r.is_negative());
    assert!(ctx
        .flags
        .contains(Status::OVERFLOW | Status::INEXACT | Status::ROUNDED));
}

#[test]
fn test_overflow_saturates_when_rounding_down() {
    let m = dec();
    let mut ctx = Context::new(3)
        .with_rounding(Rounding::Down)
        .with_exponent_range(BigInt::from(-2), BigInt::from(2));
    let r = m.round_to_precision(&val(&m, 1000, 0), &mut ctx).unwrap();
    // The largest finite value: 999 * 10^(emax + 1 - precision).
    assert_eq!(r.to_string(), "999E0");
    assert!(ctx.flags.contains(Status::OVERFLOW));
}

#[test]
fn test_underflow_to_zero() {
    let m = dec();
    let mut ctx = Context::new(3)
        .with_exponent_range(BigInt::from(-2), BigInt::from(2));
    // ETiny is -4; 1E-5 is below every subnormal.
    let r = m.round_to_precision(&val(&m, 1, -5), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "0E-4");
    assert!(ctx.flags.contains(
        Status::UNDERFLOW | Status::SUBNORMAL | Status::INEXACT | Status::ROUNDED
    ));
}

#[test]
fn test_subnormal_result_keeps_digits() {
    let m = dec();
    let mut ctx = Context::new(3)
        .with_exponent_range(BigInt::from(-2), BigInt::from(2));
    // 1.2E-3 is subnormal (adjusted exponent -3 < emin) but exact.
    let r = m.round_to_precision(&val(&m, 12, -4), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "12E-4");
    assert!(ctx.flags.contains(Status::SUBNORMAL));
    assert!(!ctx.flags.contains(Status::UNDERFLOW));
}

#[test]
fn test_clamping_pads_mantissa() {
    let m = dec();
    let mut ctx = Context::new(5)
        .with_exponent_range(BigInt::from(-95), BigInt::from(96))
        .with_clamping(true);
    // Exponent 94 is above emax + 1 - precision = 92.
    let r = m.round_to_precision(&val(&m, 1, 94), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "100E92");
    assert!(ctx.flags.contains(Status::CLAMPED));
}

#[test]
fn test_signaling_nan_becomes_quiet() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m
        .add(&signaling_nan(&m, 5), &val(&m, 1, 0), &mut ctx)
        .unwrap();
    assert!(r.flags().contains(NumFlags::QUIET_NAN));
    assert!(!r.flags().contains(NumFlags::SIGNALING_NAN));
    assert_eq!(m.helper().mantissa(&r), BigUint::from(5u32));
    assert!(ctx.flags.contains(Status::INVALID));
}

#[test]
fn test_quiet_nan_left_operand_wins() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m
        .add(&quiet_nan(&m, 7), &quiet_nan(&m, 9), &mut ctx)
        .unwrap();
    assert_eq!(m.helper().mantissa(&r), BigUint::from(7u32));
    assert!(ctx.flags.is_empty());
}

#[test]
fn test_nan_payload_truncated_to_precision() {
    let m = dec();
    let mut ctx = Context::new(2);
    let r = m.add(&quiet_nan(&m, 12345), &val(&m, 1, 0), &mut ctx).unwrap();
    // Payload is reduced modulo radix^precision.
    assert_eq!(m.helper().mantissa(&r), BigUint::from(45u32));
}

#[test]
fn test_multiply() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m.multiply(&val(&m, 12, -1), &val(&m, 25, -1), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "300E-2");
    let r = m
        .multiply(&val(&m, -3, 0), &val(&m, 7, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "-21E0");
}

#[test]
fn test_multiply_and_add() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m
        .multiply_and_add(&val(&m, 3, 0), &val(&m, 4, 0), &val(&m, 5, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "17E0");
}

#[test]
fn test_multiply_infinity_by_zero_beats_nan_third_operand() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m
        .multiply_and_add(
            &infinity(&m, false),
            &val(&m, 0, 0),
            &quiet_nan(&m, 1),
            &mut ctx,
        )
        .unwrap();
    assert!(r.flags().is_nan());
    assert!(ctx.flags.contains(Status::INVALID));
}

#[test]
fn test_divide_exact_prefers_ideal_exponent() {
    let m = dec();
    let mut ctx = Context::new(4);
    let r = m.divide(&val(&m, 7, 0), &val(&m, 2, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "35E-1");
    assert!(ctx.flags.is_empty());
}

#[test]
fn test_divide_inexact() {
    let m = dec();
    let mut ctx = Context::new(3);
    let r = m.divide(&val(&m, 1, 0), &val(&m, 3, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "333E-3");
    assert!(ctx.flags.contains(Status::INEXACT | Status::ROUNDED));
}

#[test]
fn test_divide_by_zero() {
    let m = dec();
    let mut ctx = Context::new(5);
    let r = m.divide(&val(&m, -1, 0), &val(&m, 0, 0), &mut ctx).unwrap();
    assert!(r.flags().is_infinity());
    assert!(r.is_negative());
    assert!(ctx.flags.contains(Status::DIVIDE_BY_ZERO));

    let mut ctx = Context::new(5);
    let r = m.divide(&val(&m, 0, 0), &val(&m, 0, 0), &mut ctx).unwrap();
    assert!(r.flags().is_nan());
    assert!(ctx.flags.contains(Status::INVALID));
}

#[test]
fn test_divide_nonterminating_without_precision() {
    let m = dec();
    let mut ctx = Context::unlimited();
    let r = m.divide(&val(&m, 1, 0), &val(&m, 3, 0), &mut ctx).unwrap();
    assert!(r.flags().is_nan());
    assert!(ctx.flags.contains(Status::INVALID));

    // A terminating expansion is fine with unlimited precision.
    let mut ctx = Context::unlimited();
    let r = m.divide(&val(&m, 1, 0), &val(&m, 8, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "125E-3");
}

#[test]
fn test_divide_to_exponent() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m
        .divide_to_exponent(&val(&m, 1, 0), &val(&m, 8, 0), &BigInt::from(-3), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "125E-3");

    let mut ctx = Context::new(9);
    let r = m
        .divide_to_exponent(&val(&m, 2, 0), &val(&m, 3, 0), &BigInt::from(-2), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "67E-2");
    assert!(ctx.flags.contains(Status::INEXACT | Status::ROUNDED));
}

#[test]
fn test_integer_division() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m
        .divide_to_integer_natural_scale(&val(&m, 10, 0), &val(&m, 3, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "3E0");
    let r = m
        .divide_to_integer_zero_scale(&val(&m, -10, 0), &val(&m, 3, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "-3E0");
}

#[test]
fn test_remainder() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m.remainder(&val(&m, 10, 0), &val(&m, 3, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "1E0");
    // The remainder keeps the dividend's sign.
    let r = m
        .remainder(&val(&m, -10, 0), &val(&m, 3, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "-1E0");
}

#[test]
fn test_remainder_near() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m
        .remainder_near(&val(&m, 10, 0), &val(&m, 6, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "-2E0");
    // Ties pick the even quotient: 3/2 rounds to 2, so 3 rem 2 = -1.
    let r = m
        .remainder_near(&val(&m, 3, 0), &val(&m, 2, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "-1E0");
}

#[test]
fn test_quantize() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m
        .quantize(&val(&m, 217, -2), &val(&m, 1, -3), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "2170E-3");
    assert!(ctx.flags.is_empty());

    let mut ctx = Context::new(9);
    let r = m
        .quantize(&val(&m, 217, -2), &val(&m, 1, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "2E0");
    assert!(ctx.flags.contains(Status::INEXACT | Status::ROUNDED));

    // Quantizing a finite value against an infinity is invalid.
    let mut ctx = Context::new(9);
    let r = m
        .quantize(&val(&m, 217, -2), &infinity(&m, false), &mut ctx)
        .unwrap();
    assert!(r.flags().is_nan());
    assert!(ctx.flags.contains(Status::INVALID));
}

#[test]
fn test_round_to_exponent() {
    let m = dec();
    let mut ctx = Context::new(9).with_rounding(Rounding::HalfUp);
    let r = m
        .round_to_exponent_simple(&val(&m, 25, -1), &BigInt::zero(), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "3E0");

    let mut ctx = Context::new(9);
    let r = m
        .round_to_exponent_exact(&val(&m, 21, -1), &BigInt::zero(), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "2E0");
    assert!(ctx.flags.contains(Status::INEXACT | Status::ROUNDED));

    let mut ctx = Context::new(9);
    let r = m
        .round_to_exponent_no_rounded_flag(&val(&m, 21, -1), &BigInt::zero(), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "2E0");
    assert!(ctx.flags.is_empty());
}

#[test]
fn test_reduce() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m.reduce(&val(&m, 2500, -2), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "25E0");
    let r = m.reduce(&val(&m, 0, -5), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "0E0");
}

#[test]
fn test_compare() {
    let m = dec();
    assert_eq!(m.compare(&val(&m, 10, -1), &val(&m, 1, 0)), Ordering::Equal);
    assert_eq!(m.compare(&val(&m, 0, 0), &val(&m, 0, 5)), Ordering::Equal);
    assert_eq!(m.compare(&val(&m, -1, 0), &val(&m, 1, 0)), Ordering::Less);
    assert_eq!(m.compare(&val(&m, 2, 3), &val(&m, 1999, 0)), Ordering::Greater);
    // NaNs order above everything, including infinity.
    assert_eq!(
        m.compare(&quiet_nan(&m, 0), &infinity(&m, false)),
        Ordering::Greater
    );
    assert_eq!(
        m.compare(&infinity(&m, true), &val(&m, -1, 20)),
        Ordering::Less
    );
}

#[test]
fn test_compare_with_widely_separated_exponents() {
    let m = dec();
    // Far too different to subtract digit by digit.
    let big = val(&m, 1, 1_000_000);
    let small = val(&m, 9, -1_000_000);
    assert_eq!(m.compare(&big, &small), Ordering::Greater);
    assert_eq!(m.compare(&small, &big), Ordering::Less);
}

#[test]
fn test_compare_with_context_signals_on_nan() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m
        .compare_with_context(&val(&m, 1, 0), &val(&m, 2, 0), false, &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "-1E0");

    // Signaling comparison treats even quiet NaNs as invalid.
    let mut ctx = Context::new(9);
    let r = m
        .compare_with_context(&quiet_nan(&m, 0), &val(&m, 2, 0), true, &mut ctx)
        .unwrap();
    assert!(r.flags().is_nan());
    assert!(ctx.flags.contains(Status::INVALID));
}

#[test]
fn test_min_max_tie_break_on_exponent() {
    let m = dec();
    let mut ctx = Context::new(9);
    let a = val(&m, 1, 0);
    let b = val(&m, 10, -1);
    let r = m.max(&a, &b, &mut ctx).unwrap();
    assert_eq!(m.helper().exponent(&r), BigInt::zero());
    let r = m.min(&a, &b, &mut ctx).unwrap();
    assert_eq!(m.helper().exponent(&r), BigInt::from(-1));
}

#[test]
fn test_min_max_quiet_nan_yields_other_operand() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m.max(&quiet_nan(&m, 0), &val(&m, 3, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "3E0");
}

#[test]
fn test_min_max_magnitude() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m
        .max_magnitude(&val(&m, -5, 0), &val(&m, 3, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "-5E0");
    let r = m
        .min_magnitude(&val(&m, -5, 0), &val(&m, 3, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "3E0");
}

#[test]
fn test_next_plus_minus() {
    let m = dec();
    let range = || {
        Context::new(3).with_exponent_range(BigInt::from(-3), BigInt::from(3))
    };
    let mut ctx = range();
    let r = m.next_plus(&val(&m, 1, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "101E-2");
    let mut ctx = range();
    let r = m.next_minus(&val(&m, 1, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "999E-3");
}

#[test]
fn test_next_plus_of_max_finite_overflows() {
    let m = dec();
    let mut ctx = Context::new(3).with_exponent_range(BigInt::from(-3), BigInt::from(3));
    let r = m.next_plus(&val(&m, 999, 1), &mut ctx).unwrap();
    assert!(r.flags().is_infinity());
}

#[test]
fn test_next_minus_of_infinity_is_max_finite() {
    let m = dec();
    let mut ctx = Context::new(3).with_exponent_range(BigInt::from(-3), BigInt::from(3));
    let r = m.next_minus(&infinity(&m, false), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "999E1");
}

#[test]
fn test_next_toward() {
    let m = dec();
    let mut ctx = Context::new(3).with_exponent_range(BigInt::from(-3), BigInt::from(3));
    let r = m
        .next_toward(&val(&m, 1, 0), &val(&m, 2, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "101E-2");
    let mut ctx = Context::new(3).with_exponent_range(BigInt::from(-3), BigInt::from(3));
    let r = m
        .next_toward(&val(&m, 1, 0), &val(&m, -2, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "999E-3");
    // A step that stays in the normal range reports nothing, not even
    // the inexactness of the internal add.
    assert!(ctx.flags.is_empty());
}

#[test]
fn test_next_toward_suppresses_underflow_at_full_precision() {
    let m = dec();
    // Stepping up from the largest subnormal rounds to 100E-5, the
    // smallest normal. The internal rounding flags underflow, but a
    // full-precision mantissa did not really underflow.
    let mut ctx = Context::new(3).with_exponent_range(BigInt::from(-3), BigInt::from(3));
    let r = m
        .next_toward(&val(&m, 99, -5), &val(&m, 1, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "100E-5");
    assert!(ctx.flags.is_empty());
}

#[test]
fn test_next_toward_reports_underflow_below_full_precision() {
    let m = dec();
    // Stepping down from the smallest normal lands on a two-digit
    // subnormal, so the underflow is real and survives.
    let mut ctx = Context::new(3).with_exponent_range(BigInt::from(-3), BigInt::from(3));
    let r = m
        .next_toward(&val(&m, 100, -5), &val(&m, 0, 0), &mut ctx)
        .unwrap();
    assert_eq!(r.to_string(), "99E-5");
    assert!(ctx.flags.contains(Status::UNDERFLOW | Status::SUBNORMAL));
    assert!(ctx.flags.contains(Status::INEXACT | Status::ROUNDED));
}

#[test]
fn test_square_root() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m.square_root(&val(&m, 16, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "4E0");
    assert!(ctx.flags.is_empty());

    // Exact root reduced to the ideal exponent.
    let mut ctx = Context::new(9);
    let r = m.square_root(&val(&m, 100, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "10E0");

    let mut ctx = Context::new(5);
    let r = m.square_root(&val(&m, 2, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "14142E-4");
    assert!(ctx.flags.contains(Status::INEXACT | Status::ROUNDED));

    let mut ctx = Context::new(5);
    let r = m.square_root(&val(&m, -4, 0), &mut ctx).unwrap();
    assert!(r.flags().is_nan());
    assert!(ctx.flags.contains(Status::INVALID));
}

#[test]
fn test_square_root_odd_exponent() {
    let m = dec();
    // sqrt(0.1) = 0.31622776...; the ideal exponent of 1E-1 is -1.
    let mut ctx = Context::new(5);
    let r = m.square_root(&val(&m, 1, -1), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "31623E-5");
}

#[test]
fn test_pi() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m.pi(&mut ctx).unwrap();
    assert_eq!(r.to_string(), "314159265E-8");
    assert!(ctx.flags.contains(Status::INEXACT | Status::ROUNDED));

    let mut ctx = Context::new(25);
    let r = m.pi(&mut ctx).unwrap();
    assert_eq!(r.to_string(), "3141592653589793238462643E-24");
}

#[test]
fn test_exp() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m.exp(&val(&m, 1, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "271828183E-8");
    assert!(ctx.flags.contains(Status::INEXACT | Status::ROUNDED));

    let mut ctx = Context::new(9);
    let r = m.exp(&val(&m, 0, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "1E0");

    // exp(-Infinity) is zero, exp(+Infinity) is itself.
    let mut ctx = Context::new(9);
    let r = m.exp(&infinity(&m, true), &mut ctx).unwrap();
    assert!(r.is_zero());
    let r = m.exp(&infinity(&m, false), &mut ctx).unwrap();
    assert!(r.flags().is_infinity());
}

#[test]
fn test_exp_negative_is_reciprocal() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m.exp(&val(&m, -1, 0), &mut ctx).unwrap();
    // 1/e = 0.367879441...
    assert_eq!(r.to_string(), "367879441E-9");
}

#[test]
fn test_ln() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m.ln(&val(&m, 1, 0), &mut ctx).unwrap();
    assert!(r.is_zero());

    let mut ctx = Context::new(9);
    let r = m.ln(&val(&m, 2, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "693147181E-9");
    assert!(ctx.flags.contains(Status::INEXACT | Status::ROUNDED));

    let mut ctx = Context::new(9);
    let r = m.ln(&val(&m, 0, 0), &mut ctx).unwrap();
    assert!(r.flags().is_infinity());
    assert!(r.is_negative());

    let mut ctx = Context::new(9);
    let r = m.ln(&val(&m, -1, 0), &mut ctx).unwrap();
    assert!(r.flags().is_nan());
    assert!(ctx.flags.contains(Status::INVALID));
}

#[test]
fn test_log10() {
    let m = dec();
    // Powers of ten short-circuit to their exponent.
    let mut ctx = Context::new(9);
    let r = m.log10(&val(&m, 1000, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "3E0");
    let mut ctx = Context::new(9);
    let r = m.log10(&val(&m, 1, -2), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "-2E0");

    let mut ctx = Context::new(9);
    let r = m.log10(&val(&m, 2, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "301029996E-9");
}

#[test]
fn test_power_integer() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m.power(&val(&m, 2, 0), &val(&m, 10, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "1024E0");

    let mut ctx = Context::new(9);
    let r = m.power(&val(&m, -2, 0), &val(&m, 3, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "-8E0");

    // Negative powers use the reciprocal.
    let mut ctx = Context::new(9);
    let r = m.power(&val(&m, 2, 0), &val(&m, -2, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "25E-2");
}

#[test]
fn test_power_fractional() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m.power(&val(&m, 4, 0), &val(&m, 5, -1), &mut ctx).unwrap();
    assert_eq!(m.compare(&r, &val(&m, 2, 0)), Ordering::Equal);
    assert!(ctx.flags.contains(Status::INEXACT));

    // A negative base with a fractional power is invalid.
    let mut ctx = Context::new(9);
    let r = m.power(&val(&m, -4, 0), &val(&m, 5, -1), &mut ctx).unwrap();
    assert!(r.flags().is_nan());
    assert!(ctx.flags.contains(Status::INVALID));
}

#[test]
fn test_power_special_cases() {
    let m = dec();
    // 0^0 is invalid.
    let mut ctx = Context::new(9);
    let r = m.power(&val(&m, 0, 0), &val(&m, 0, 0), &mut ctx).unwrap();
    assert!(r.flags().is_nan());
    assert!(ctx.flags.contains(Status::INVALID));

    // 0^negative is infinite.
    let mut ctx = Context::new(9);
    let r = m.power(&val(&m, 0, 0), &val(&m, -2, 0), &mut ctx).unwrap();
    assert!(r.flags().is_infinity());

    // x^0 is 1 for nonzero x.
    let mut ctx = Context::new(9);
    let r = m.power(&val(&m, 26, -1), &val(&m, 0, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "1E0");
}

#[test]
fn test_abs_negate() {
    let m = dec();
    let mut ctx = Context::new(9);
    let r = m.abs(&val(&m, -5, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "5E0");
    let r = m.negate(&val(&m, 5, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "-5E0");
    // Negating a negative zero gives positive zero outside Floor.
    let neg_zero = m.helper().create_with_flags(
        BigUint::zero(),
        BigInt::zero(),
        NumFlags::NEGATIVE,
    );
    let r = m.negate(&neg_zero, &mut ctx).unwrap();
    assert!(r.is_zero());
    assert!(!r.is_negative());
}

#[test]
fn test_plus_normalizes_negative_zero() {
    let m = dec();
    let neg_zero =
        m.helper()
            .create_with_flags(BigUint::zero(), BigInt::zero(), NumFlags::NEGATIVE);
    let mut ctx = Context::new(9);
    let r = m.plus(&neg_zero, &mut ctx).unwrap();
    assert!(!r.is_negative());
    // Floor rounding keeps the sign.
    let mut ctx = Context::new(9).with_rounding(Rounding::Floor);
    let r = m.plus(&neg_zero, &mut ctx).unwrap();
    assert!(r.is_negative());
}

#[test]
fn test_binary_radix_divide() {
    let m = bin();
    let mut ctx = Context::new(8);
    let one = m.helper().value_of(1);
    let two = m.helper().value_of(2);
    let r = m.divide(&one, &two, &mut ctx).unwrap();
    assert_eq!(m.helper().mantissa(&r), BigUint::from(1u32));
    assert_eq!(m.helper().exponent(&r), BigInt::from(-1));

    // 1/10 does not terminate in binary.
    let mut ctx = Context::new(8);
    let ten = m.helper().value_of(10);
    let r = m.divide(&one, &ten, &mut ctx).unwrap();
    assert!(ctx.flags.contains(Status::INEXACT));
    assert!(!r.flags().is_special());
}

#[test]
fn test_round_to_binary_precision() {
    let m = dec();
    // 255 fits in 8 bits; 256 does not.
    let mut ctx = Context::new(8);
    let r = m.round_to_binary_precision(&val(&m, 255, 0), &mut ctx).unwrap();
    assert_eq!(r.to_string(), "255E0");
    assert!(ctx.flags.is_empty());

    let mut ctx = Context::new(8);
    let r = m.round_to_binary_precision(&val(&m, 257, 0), &mut ctx).unwrap();
    assert!(ctx.flags.contains(Status::ROUNDED));
}

#[test]
fn test_finite_only_support() {
    let m = RadixMath::new(PlainHelper::with_support(
        10,
        ArithmeticSupport::FiniteOnly,
    ));
    let mut ctx = Context::new(5);
    let one = m.helper().value_of(1);
    let zero = m.helper().value_of(0);
    assert!(m.divide(&one, &zero, &mut ctx).is_err());
    let minus_four = m.helper().value_of(-4);
    assert!(m.square_root(&minus_four, &mut ctx).is_err());
}

proptest! {
    #[test]
    fn prop_rounding_is_idempotent(mantissa in any::<i64>(), exp in -20i64..20) {
        let m = dec();
        let v = val(&m, mantissa, exp);
        let mut ctx = Context::new(5);
        let once = m.round_to_precision(&v, &mut ctx).unwrap();
        let mut ctx2 = Context::new(5);
        let twice = m.round_to_precision(&once, &mut ctx2).unwrap();
        prop_assert_eq!(once, twice);
        prop_assert!(ctx2.flags.is_empty());
    }

    #[test]
    fn prop_add_commutes(a in any::<i64>(), b in any::<i64>()) {
        let m = dec();
        let x = val(&m, a, 0);
        let y = val(&m, b, 0);
        let mut ctx = Context::new(30);
        let xy = m.add(&x, &y, &mut ctx).unwrap();
        let yx = m.add(&y, &x, &mut ctx).unwrap();
        prop_assert_eq!(m.compare(&xy, &yx), Ordering::Equal);
    }

    #[test]
    fn prop_quantize_preserves_exponent(mantissa in 1i64..1_000_000, exp in -6i64..6) {
        let m = dec();
        let v = val(&m, mantissa, exp);
        let target = val(&m, 1, -2);
        let mut ctx = Context::new(30);
        let q = m.quantize(&v, &target, &mut ctx).unwrap();
        prop_assert_eq!(m.helper().exponent(&q), BigInt::from(-2));
    }
}
