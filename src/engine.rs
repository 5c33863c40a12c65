use core::cmp::Ordering;
use core::fmt;

use num_bigint::BigInt;

use crate::ctx::Context;
use crate::err::Error;

/// The operation surface of the arithmetic engine.
///
/// Every operation takes its operands by reference and a mutable
/// [`Context`] that supplies precision, rounding, and exponent range
/// and collects status flags. Implementations never panic on numeric
/// input; anything unrepresentable comes back through [`Error`].
#[allow(missing_docs)] // Method-level docs live on the implementations.
pub trait Engine<T: Clone + fmt::Debug> {
    /// `lhs + rhs`.
    fn add(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// `lhs - rhs`, computed as `lhs + (-rhs)`.
    fn subtract(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// `lhs * rhs`.
    fn multiply(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// `a * b + c`, with the product computed exactly.
    fn multiply_and_add(
        &self,
        a: &T,
        b: &T,
        c: &T,
        ctx: &mut Context,
    ) -> Result<T, Error<T>>;

    /// `lhs / rhs`, rounded to the context's precision.
    fn divide(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// `lhs / rhs` scaled so the result has the given exponent.
    fn divide_to_exponent(
        &self,
        lhs: &T,
        rhs: &T,
        desired_exponent: &BigInt,
        ctx: &mut Context,
    ) -> Result<T, Error<T>>;

    /// The integer part of `lhs / rhs`, at the operands' preferred
    /// exponent.
    fn divide_to_integer_natural_scale(
        &self,
        lhs: &T,
        rhs: &T,
        ctx: &mut Context,
    ) -> Result<T, Error<T>>;

    /// The integer part of `lhs / rhs`, at exponent zero.
    fn divide_to_integer_zero_scale(
        &self,
        lhs: &T,
        rhs: &T,
        ctx: &mut Context,
    ) -> Result<T, Error<T>>;

    /// `lhs - (lhs div rhs) * rhs`, where the division truncates.
    fn remainder(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The IEEE 854 remainder: the quotient is rounded to the
    /// nearest integer, ties to even.
    fn remainder_near(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The absolute value.
    fn abs(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// `-value`.
    fn negate(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// `value`, rounded to the context and with negative zero
    /// normalized to positive zero.
    fn plus(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// `value`, rounded to the context's precision in digits.
    fn round_to_precision(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// `value`, rounded so the mantissa fits in `precision` bits.
    fn round_to_binary_precision(
        &self,
        value: &T,
        ctx: &mut Context,
    ) -> Result<T, Error<T>>;

    /// `value`, rescaled to the exponent of `other`.
    fn quantize(&self, value: &T, other: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// `value`, rescaled to `exponent`; inexact results signal
    /// [`Status::INVALID`][crate::Status::INVALID].
    fn round_to_exponent_exact(
        &self,
        value: &T,
        exponent: &BigInt,
        ctx: &mut Context,
    ) -> Result<T, Error<T>>;

    /// `value`, rescaled to `exponent` with rounding as needed.
    fn round_to_exponent_simple(
        &self,
        value: &T,
        exponent: &BigInt,
        ctx: &mut Context,
    ) -> Result<T, Error<T>>;

    /// Like [`round_to_exponent_simple`][Self::round_to_exponent_simple],
    /// but does not raise `ROUNDED` or `INEXACT`.
    fn round_to_exponent_no_rounded_flag(
        &self,
        value: &T,
        exponent: &BigInt,
        ctx: &mut Context,
    ) -> Result<T, Error<T>>;

    /// `value` with trailing zeros removed from its mantissa.
    fn reduce(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The square root, at the ideal exponent `floor(exponent / 2)`.
    fn square_root(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// `base` raised to `pow`.
    fn power(&self, base: &T, pow: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The natural exponential of `value`.
    fn exp(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The natural logarithm of `value`.
    fn ln(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The base-10 logarithm of `value`.
    fn log10(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The constant pi, to the context's precision.
    fn pi(&self, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The smaller of two values; equal values tie-break on
    /// exponent.
    fn min(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The larger of two values; equal values tie-break on exponent.
    fn max(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The value with the smaller absolute value.
    fn min_magnitude(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The value with the larger absolute value.
    fn max_magnitude(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The closest representable value above `value`.
    fn next_plus(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The closest representable value below `value`.
    fn next_minus(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// The closest representable value to `value` in the direction
    /// of `other`.
    fn next_toward(&self, value: &T, other: &T, ctx: &mut Context) -> Result<T, Error<T>>;

    /// Compares two values numerically, returning -1, 0, or 1 as a
    /// value of `T`, or NaN when an operand is a NaN.
    fn compare_with_context(
        &self,
        lhs: &T,
        rhs: &T,
        treat_quiet_nans_as_signaling: bool,
        ctx: &mut Context,
    ) -> Result<T, Error<T>>;

    /// Compares two values numerically. NaNs compare equal to each
    /// other and above everything else; signed zeros compare equal.
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering;
}
