use core::fmt;

use num_bigint::{BigInt, BigUint};

use crate::num::{ArithmeticSupport, NumFlags};

/// Describes a number representation to the arithmetic engine.
///
/// A helper fixes the radix, says how much of the IEEE 854 value
/// space the representation covers, and converts between values and
/// their (sign, mantissa, exponent) parts. Mantissas are unsigned;
/// the sign lives in [`NumFlags`].
pub trait RadixHelper {
    /// The number type this helper describes.
    type Value: Clone + fmt::Debug;
    /// The accumulator used to shorten mantissas digit by digit.
    type Accum: ShiftAccumulator;

    /// The radix the exponent scales by. At least 2.
    fn radix(&self) -> u32;

    /// How much of the IEEE 854 value space the representation
    /// covers.
    fn support(&self) -> ArithmeticSupport;

    /// The sign of `value`: -1, 0, or 1. Zero only for a finite zero.
    fn sign(&self, value: &Self::Value) -> i8;

    /// The value's classification flags.
    fn flags(&self, value: &Self::Value) -> NumFlags;

    /// The value's unsigned mantissa. For a NaN this is the payload.
    fn mantissa(&self, value: &Self::Value) -> BigUint;

    /// The value's exponent.
    fn exponent(&self, value: &Self::Value) -> BigInt;

    /// Builds a value from parts.
    fn create_with_flags(
        &self,
        mantissa: BigUint,
        exponent: BigInt,
        flags: NumFlags,
    ) -> Self::Value;

    /// Builds a finite value equal to the given integer.
    fn value_of(&self, value: i64) -> Self::Value;

    /// `magnitude * radix^power`.
    fn multiply_by_radix_power(&self, magnitude: &BigUint, power: u64) -> BigUint;

    /// Creates an accumulator over `magnitude` with no discarded
    /// digits yet.
    fn shift_accumulator(&self, magnitude: BigUint) -> Self::Accum;

    /// Creates an accumulator over `magnitude` seeded with carried
    /// discarded-digit state.
    fn shift_accumulator_with_digits(
        &self,
        magnitude: BigUint,
        last_discarded: u32,
        older_discarded: bool,
    ) -> Self::Accum;

    /// Reports whether `numerator / denominator` has a terminating
    /// expansion in this radix.
    fn has_terminating_radix_expansion(
        &self,
        numerator: &BigUint,
        denominator: &BigUint,
    ) -> bool;
}

/// Shortens a magnitude digit by digit, remembering what was thrown
/// away.
///
/// After any sequence of shifts the accumulator knows the last digit
/// discarded, whether any digit discarded before that was non-zero,
/// and how many digits went. That pair of facts is exactly what the
/// rounding modes need.
pub trait ShiftAccumulator {
    /// The current (shifted) magnitude.
    fn shifted(&self) -> &BigUint;

    /// The most recently discarded digit, in `[0, radix)`.
    fn last_discarded_digit(&self) -> u32;

    /// Whether any digit discarded before the last one was non-zero.
    fn older_discarded_digits(&self) -> bool;

    /// How many digits have been discarded in total.
    fn discarded_digit_count(&self) -> &BigInt;

    /// The digit length of the current magnitude. Zero has length 1.
    fn digit_length(&self) -> u64;

    /// Discards the low `count` digits.
    fn shift_right(&mut self, count: u64);

    /// Discards the low `count` digits, tolerating counts far larger
    /// than the magnitude. Non-positive counts do nothing.
    fn shift_right_big(&mut self, count: &BigInt);

    /// Shifts until at most `digits` digits remain.
    fn shift_to_digits(&mut self, digits: u64);
}
