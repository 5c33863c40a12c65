//! End-to-end checks through the public API.

use anyhow::Result;
use num_bigint::BigInt;

use arbfp::{
    ArithmeticSupport, Context, Engine, Error, PlainHelper, RadixHelper, RadixMath, Rounding,
    Status, Trappable,
};

#[test]
fn compound_interest_at_decimal128_precision() -> Result<()> {
    // 100000 * 1.05^30, the classic "telco"-style decimal example.
    let math = RadixMath::new(PlainHelper::decimal());
    let mut ctx = Context::new(34);
    let principal = math.helper().value_of(100_000);
    let rate = math
        .helper()
        .create_with_flags(105u32.into(), BigInt::from(-2), Default::default());
    let years = math.helper().value_of(30);
    let growth = math.power(&rate, &years, &mut ctx)?;
    let total = math.multiply(&principal, &growth, &mut ctx)?;
    let mut round_ctx = Context::new(34);
    let cents = math.round_to_exponent_simple(&total, &BigInt::from(-2), &mut round_ctx)?;
    assert_eq!(cents.to_string(), "43219424E-2");
    Ok(())
}

#[test]
fn flags_survive_the_trap_decorator() -> Result<()> {
    let math = Trappable::new(RadixMath::new(PlainHelper::decimal()));
    let mut ctx = Context::new(6);
    let a = math.inner().helper().value_of(1);
    let b = math.inner().helper().value_of(7);
    let q = math.divide(&a, &b, &mut ctx)?;
    assert_eq!(q.to_string(), "142857E-6");
    assert!(ctx.flags().contains(Status::INEXACT | Status::ROUNDED));
    Ok(())
}

#[test]
fn trapped_overflow_reports_the_would_be_result() {
    let math = Trappable::new(RadixMath::new(PlainHelper::decimal()));
    let mut ctx = Context::new(3)
        .with_exponent_range(BigInt::from(-10), BigInt::from(10))
        .with_traps(Status::OVERFLOW);
    let big = math
        .inner()
        .helper()
        .create_with_flags(999u32.into(), BigInt::from(8), Default::default());
    let ten = math.inner().helper().value_of(10);
    let err = math.multiply(&big, &ten, &mut ctx).unwrap_err();
    match err {
        Error::Trap(trap) => {
            assert_eq!(trap.flag, Status::OVERFLOW);
            assert!(trap.result.flags().is_infinity());
        }
        other => panic!("expected a trap: {other}"),
    }
}

#[test]
fn finite_only_support_surfaces_errors() {
    let math = RadixMath::new(PlainHelper::with_support(10, ArithmeticSupport::FiniteOnly));
    let mut ctx = Context::new(10);
    let one = math.helper().value_of(1);
    let zero = math.helper().value_of(0);
    let err = math.divide(&one, &zero, &mut ctx).unwrap_err();
    assert!(matches!(err, Error::NotFinite(_)));
}

#[test]
fn directed_rounding_brackets_the_true_quotient() -> Result<()> {
    let math = RadixMath::new(PlainHelper::decimal());
    let a = math.helper().value_of(1);
    let b = math.helper().value_of(3);
    let mut floor_ctx = Context::new(5).with_rounding(Rounding::Floor);
    let lo = math.divide(&a, &b, &mut floor_ctx)?;
    let mut ceil_ctx = Context::new(5).with_rounding(Rounding::Ceiling);
    let hi = math.divide(&a, &b, &mut ceil_ctx)?;
    assert_eq!(lo.to_string(), "33333E-5");
    assert_eq!(hi.to_string(), "33334E-5");
    assert_eq!(math.compare(&lo, &hi), std::cmp::Ordering::Less);
    Ok(())
}
