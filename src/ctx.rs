// Bitflags
#![allow(clippy::indexing_slicing)]

use bitflags::bitflags;
use num_bigint::BigInt;
use num_traits::Zero;

/// Controls the behavior of arithmetic operations: working precision,
/// rounding, exponent range, flag recording, and traps.
///
/// A precision of zero means the precision is unlimited. Contexts are
/// immutable except for the [`Status`] flags an operation may raise;
/// the `with_*` methods derive new contexts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Context {
    pub(crate) precision: u64,
    pub(crate) rounding: Rounding,
    pub(crate) emin: BigInt,
    pub(crate) emax: BigInt,
    pub(crate) has_exponent_range: bool,
    pub(crate) clamp: bool,
    pub(crate) has_flags: bool,
    pub(crate) flags: Status,
    pub(crate) traps: Status,
}

impl Context {
    /// Creates a context with the given maximum number of significant
    /// digits, [`Rounding::HalfEven`], an unlimited exponent range,
    /// and flag recording enabled.
    pub fn new(precision: u64) -> Self {
        Self {
            precision,
            rounding: Rounding::HalfEven,
            emin: BigInt::zero(),
            emax: BigInt::zero(),
            has_exponent_range: false,
            clamp: false,
            has_flags: true,
            flags: Status::empty(),
            traps: Status::empty(),
        }
    }

    /// Creates a context with unlimited precision and an unlimited
    /// exponent range.
    pub fn unlimited() -> Self {
        Self::new(0)
    }

    /// A context that leaves operands untouched: unlimited precision,
    /// no exponent range, no flag recording. Stands in for "no
    /// context supplied".
    pub(crate) fn none() -> Self {
        let mut ctx = Self::new(0);
        ctx.has_flags = false;
        ctx
    }

    /// Derives a context with a different precision.
    #[must_use]
    pub fn with_precision(mut self, precision: u64) -> Self {
        self.precision = precision;
        self
    }

    /// Derives a context with a different rounding mode.
    #[must_use]
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Derives a context restricted to adjusted exponents in
    /// `[emin, emax]`.
    #[must_use]
    pub fn with_exponent_range(
        mut self,
        emin: impl Into<BigInt>,
        emax: impl Into<BigInt>,
    ) -> Self {
        self.emin = emin.into();
        self.emax = emax.into();
        self.has_exponent_range = true;
        self
    }

    /// Derives a context with no restriction on exponents.
    #[must_use]
    pub fn with_unlimited_exponents(mut self) -> Self {
        self.emin = BigInt::zero();
        self.emax = BigInt::zero();
        self.has_exponent_range = false;
        self
    }

    /// Derives a context that clamps normal exponents to at most
    /// `emax + 1 - precision`, padding mantissas with trailing zeros.
    #[must_use]
    pub fn with_clamping(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Derives a context with flag recording enabled and all flags
    /// cleared.
    #[must_use]
    pub fn with_blank_flags(mut self) -> Self {
        self.has_flags = true;
        self.flags = Status::empty();
        self
    }

    /// Derives a context that does not record flags.
    #[must_use]
    pub fn with_no_flags(mut self) -> Self {
        self.has_flags = false;
        self.flags = Status::empty();
        self
    }

    /// Derives a context whose trap mask is `traps`. A trapped flag
    /// turns the operation that raises it into an error.
    #[must_use]
    pub fn with_traps(mut self, traps: Status) -> Self {
        self.traps = traps;
        self
    }

    /// The maximum number of significant digits, or zero for
    /// unlimited precision.
    pub fn precision(&self) -> u64 {
        self.precision
    }

    /// The rounding mode.
    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Whether adjusted exponents are restricted to `[emin, emax]`.
    pub fn has_exponent_range(&self) -> bool {
        self.has_exponent_range
    }

    /// The lowest allowed adjusted exponent. Meaningless unless
    /// [`has_exponent_range`][Self::has_exponent_range] is true.
    pub fn emin(&self) -> &BigInt {
        &self.emin
    }

    /// The highest allowed adjusted exponent. Meaningless unless
    /// [`has_exponent_range`][Self::has_exponent_range] is true.
    pub fn emax(&self) -> &BigInt {
        &self.emax
    }

    /// Whether normal exponents are clamped to at most
    /// `emax + 1 - precision`.
    pub fn clamp_normal_exponents(&self) -> bool {
        self.clamp
    }

    /// Whether operations record status flags in this context.
    pub fn has_flags(&self) -> bool {
        self.has_flags
    }

    /// The flags raised so far.
    pub fn flags(&self) -> Status {
        self.flags
    }

    /// Clears all raised flags.
    pub fn clear_flags(&mut self) {
        self.flags = Status::empty();
    }

    /// The trap mask.
    pub fn traps(&self) -> Status {
        self.traps
    }

    /// Raises `status`, if this context records flags.
    pub(crate) fn report(&mut self, status: Status) {
        if self.has_flags {
            self.flags |= status;
        }
    }

    /// Reports whether a result exponent is representable: at most
    /// `emax` and at least `etiny` (`emin - precision + 1`).
    pub fn exponent_within_range(&self, exponent: &BigInt) -> bool {
        if !self.has_exponent_range {
            return true;
        }
        if exponent > &self.emax {
            return false;
        }
        let mut etiny = self.emin.clone();
        if self.precision > 1 {
            etiny -= BigInt::from(self.precision - 1);
        }
        exponent >= &etiny
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Determines which digit sequence replaces a result that has more
/// digits than the working precision allows.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub enum Rounding {
    /// IEEE 754-2008 roundTiesToEven.
    ///
    /// - Under 0.5 rounds down.
    /// - Over 0.5 rounds up.
    /// - Exactly 0.5 rounds so the retained mantissa is even.
    #[default]
    HalfEven,
    /// IEEE 754-2008 roundTiesToAway.
    ///
    /// Like [`HalfEven`][Self::HalfEven], except that 0.5 rounds away
    /// from zero.
    HalfUp,
    /// No IEEE 754-2008 equivalent.
    ///
    /// Like [`HalfUp`][Self::HalfUp], except that 0.5 rounds toward
    /// zero.
    HalfDown,
    /// No IEEE 754-2008 equivalent.
    ///
    /// Rounds away from zero if any discarded digit is non-zero.
    Up,
    /// IEEE 754-2008 roundTowardZero.
    ///
    /// AKA truncation.
    Down,
    /// IEEE 754-2008 roundTowardPositive.
    ///
    /// AKA ceiling.
    Ceiling,
    /// IEEE 754-2008 roundTowardNegative.
    ///
    /// AKA floor.
    Floor,
    /// No IEEE 754-2008 equivalent.
    ///
    /// Truncates, then rounds away from zero when the last retained
    /// digit is 0 or half the radix and a discarded digit is
    /// non-zero. Keeps a rounding error detectable after a later
    /// shorten-and-round.
    ZeroFiveUp,
    /// No rounding is permitted: discarding a non-zero digit raises
    /// [`Status::INVALID`].
    Unnecessary,
}

/// An exceptional condition raised during or after an operation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Status(u32);

bitflags! {
    impl Status: u32 {
        /// Occurs when the result had to be rounded to a different
        /// numerical value in order to fit the precision.
        const INEXACT = 0x1;
        /// Occurs when digits were discarded while shortening the
        /// result to fit the precision, whether or not the value
        /// changed. ([`INEXACT`][Self::INEXACT] implies this.)
        const ROUNDED = 0x2;
        /// Occurs when the result's adjusted exponent, before any
        /// rounding, is below the smallest allowed.
        const SUBNORMAL = 0x4;
        /// Occurs when the result is both subnormal and inexact.
        /// ([`INEXACT`][Self::INEXACT], [`ROUNDED`][Self::ROUNDED],
        /// and [`SUBNORMAL`][Self::SUBNORMAL] are raised with it.)
        const UNDERFLOW = 0x8;
        /// Occurs when the result's adjusted exponent, after
        /// rounding, is above the largest allowed.
        /// ([`INEXACT`][Self::INEXACT] and [`ROUNDED`][Self::ROUNDED]
        /// are raised with it.)
        const OVERFLOW = 0x10;
        /// Occurs when the result's exponent was changed, without
        /// changing its value, to fit exponent constraints.
        const CLAMPED = 0x20;
        /// Occurs when the operation is undefined: an operand is a
        /// signaling NaN, infinities are subtracted, zero is
        /// multiplied by infinity, infinity is divided by infinity,
        /// zero is divided by zero, the divisor of a remainder is
        /// zero, a quantize target cannot be met, a square root of a
        /// negative number is taken, and similar cases.
        const INVALID = 0x40;
        /// Occurs when a finite non-zero number is divided by zero.
        const DIVIDE_BY_ZERO = 0x80;
    }
}

impl Status {
    /// Describes a single flag. Only meaningful for one-bit values.
    pub(crate) fn describe(self) -> &'static str {
        match self {
            Self::INEXACT => "inexact",
            Self::ROUNDED => "rounded",
            Self::SUBNORMAL => "subnormal",
            Self::UNDERFLOW => "underflow",
            Self::OVERFLOW => "overflow",
            Self::CLAMPED => "clamped",
            Self::INVALID => "invalid operation",
            Self::DIVIDE_BY_ZERO => "division by zero",
            _ => "multiple conditions",
        }
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut sep = false;
        let mut buf = String::new();
        for flag in self.iter() {
            if sep {
                buf.push_str(", ");
            }
            buf.push_str(flag.describe());
            sep = true;
        }
        if !sep {
            buf.push_str("(none)");
        }
        f.write_str(&buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivations() {
        let ctx = Context::new(5)
            .with_rounding(Rounding::Ceiling)
            .with_exponent_range(-100, 100)
            .with_clamping(true);
        assert_eq!(ctx.precision(), 5);
        assert_eq!(ctx.rounding(), Rounding::Ceiling);
        assert!(ctx.has_exponent_range());
        assert!(ctx.clamp_normal_exponents());
        assert_eq!(*ctx.emin(), BigInt::from(-100));
        assert_eq!(*ctx.emax(), BigInt::from(100));

        let ctx = ctx.with_unlimited_exponents();
        assert!(!ctx.has_exponent_range());
    }

    #[test]
    fn test_exponent_within_range() {
        let ctx = Context::new(3).with_exponent_range(-3, 3);
        // etiny is -5.
        assert!(ctx.exponent_within_range(&BigInt::from(-5)));
        assert!(!ctx.exponent_within_range(&BigInt::from(-6)));
        assert!(ctx.exponent_within_range(&BigInt::from(3)));
        assert!(!ctx.exponent_within_range(&BigInt::from(4)));

        let ctx = Context::unlimited();
        assert!(ctx.exponent_within_range(&BigInt::from(1_000_000)));
    }

    #[test]
    fn test_flags() {
        let mut ctx = Context::new(5);
        assert!(ctx.has_flags());
        ctx.report(Status::INEXACT | Status::ROUNDED);
        assert_eq!(ctx.flags(), Status::INEXACT | Status::ROUNDED);
        ctx.clear_flags();
        assert_eq!(ctx.flags(), Status::empty());

        let mut ctx = ctx.with_no_flags();
        ctx.report(Status::INEXACT);
        assert_eq!(ctx.flags(), Status::empty());
    }
}
