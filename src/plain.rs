use core::fmt;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::helper::RadixHelper;
use crate::num::{ArithmeticSupport, NumFlags};
use crate::shift::{radix_power, DigitShiftAccumulator};

/// A plain mantissa/exponent/flags number: the reference
/// representation the engine is generic over.
///
/// The value is `(-1)^sign * mantissa * radix^exponent`; the radix
/// lives in the [`PlainHelper`] that created the value, not in the
/// value itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Plain {
    pub(crate) flags: NumFlags,
    pub(crate) mantissa: BigUint,
    pub(crate) exponent: BigInt,
}

impl Plain {
    /// The value's classification flags.
    pub fn flags(&self) -> NumFlags {
        self.flags
    }

    /// The unsigned mantissa, or the payload for a NaN.
    pub fn mantissa(&self) -> &BigUint {
        &self.mantissa
    }

    /// The exponent.
    pub fn exponent(&self) -> &BigInt {
        &self.exponent
    }

    /// Reports whether this is a finite or infinite zero-mantissa
    /// negative value, a NaN with the sign bit, etc.
    pub fn is_negative(&self) -> bool {
        self.flags.is_negative()
    }

    /// Reports whether this is a finite zero of either sign.
    pub fn is_zero(&self) -> bool {
        !self.flags.is_special() && self.mantissa.is_zero()
    }
}

impl fmt::Display for Plain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.flags.is_negative() {
            f.write_str("-")?;
        }
        if self.flags.contains(NumFlags::SIGNALING_NAN) {
            f.write_str("sNaN")?;
        } else if self.flags.contains(NumFlags::QUIET_NAN) {
            f.write_str("NaN")?;
        } else if self.flags.is_infinity() {
            return f.write_str("Infinity");
        } else {
            write!(f, "{}E{}", self.mantissa, self.exponent)?;
        }
        if self.flags.is_nan() && !self.mantissa.is_zero() {
            write!(f, "{}", self.mantissa)?;
        }
        Ok(())
    }
}

/// Describes [`Plain`] values of a chosen radix to the engine.
#[derive(Copy, Clone, Debug)]
pub struct PlainHelper {
    radix: u32,
    support: ArithmeticSupport,
}

impl PlainHelper {
    /// Creates a helper for the given radix with full special-value
    /// support.
    pub fn new(radix: u32) -> Self {
        Self::with_support(radix, ArithmeticSupport::ExtendedFloat)
    }

    /// Creates a helper for the given radix and support level.
    pub fn with_support(radix: u32, support: ArithmeticSupport) -> Self {
        assert!(radix >= 2, "radix must be at least 2");
        Self { radix, support }
    }

    /// Radix-10 values with full special-value support.
    pub fn decimal() -> Self {
        Self::new(10)
    }

    /// Radix-2 values with full special-value support.
    pub fn binary() -> Self {
        Self::new(2)
    }
}

impl RadixHelper for PlainHelper {
    type Value = Plain;
    type Accum = DigitShiftAccumulator;

    fn radix(&self) -> u32 {
        self.radix
    }

    fn support(&self) -> ArithmeticSupport {
        self.support
    }

    fn sign(&self, value: &Plain) -> i8 {
        if !value.flags.is_special() && value.mantissa.is_zero() {
            0
        } else if value.flags.is_negative() {
            -1
        } else {
            1
        }
    }

    fn flags(&self, value: &Plain) -> NumFlags {
        value.flags
    }

    fn mantissa(&self, value: &Plain) -> BigUint {
        value.mantissa.clone()
    }

    fn exponent(&self, value: &Plain) -> BigInt {
        value.exponent.clone()
    }

    fn create_with_flags(
        &self,
        mantissa: BigUint,
        exponent: BigInt,
        flags: NumFlags,
    ) -> Plain {
        Plain {
            flags,
            mantissa,
            exponent,
        }
    }

    fn value_of(&self, value: i64) -> Plain {
        let flags = if value < 0 {
            NumFlags::NEGATIVE
        } else {
            NumFlags::empty()
        };
        Plain {
            flags,
            mantissa: BigUint::from(value.unsigned_abs()),
            exponent: BigInt::zero(),
        }
    }

    fn multiply_by_radix_power(&self, magnitude: &BigUint, power: u64) -> BigUint {
        if magnitude.is_zero() || power == 0 {
            return magnitude.clone();
        }
        magnitude * radix_power(self.radix, power)
    }

    fn shift_accumulator(&self, magnitude: BigUint) -> DigitShiftAccumulator {
        DigitShiftAccumulator::new(self.radix, magnitude, 0, false)
    }

    fn shift_accumulator_with_digits(
        &self,
        magnitude: BigUint,
        last_discarded: u32,
        older_discarded: bool,
    ) -> DigitShiftAccumulator {
        DigitShiftAccumulator::new(self.radix, magnitude, last_discarded, older_discarded)
    }

    fn has_terminating_radix_expansion(
        &self,
        numerator: &BigUint,
        denominator: &BigUint,
    ) -> bool {
        if denominator.is_zero() {
            return false;
        }
        if numerator.is_zero() {
            return true;
        }
        // Strip the common factor, then every factor the denominator
        // shares with the radix. The expansion terminates exactly
        // when nothing else remains.
        let mut den = denominator / numerator.gcd(denominator);
        let radix = BigUint::from(self.radix);
        loop {
            let g = den.gcd(&radix);
            if g.is_one() {
                break;
            }
            while (&den % &g).is_zero() {
                den /= &g;
            }
        }
        den.is_one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::ShiftAccumulator;

    #[test]
    fn test_value_of() {
        let h = PlainHelper::decimal();
        let v = h.value_of(-25);
        assert_eq!(h.sign(&v), -1);
        assert_eq!(h.mantissa(&v), BigUint::from(25u32));
        assert_eq!(h.exponent(&v), BigInt::zero());

        let z = h.value_of(0);
        assert_eq!(h.sign(&z), 0);
        assert!(z.is_zero());
    }

    #[test]
    fn test_terminating_expansion() {
        let h = PlainHelper::decimal();
        let term = |n: u32, d: u32| {
            h.has_terminating_radix_expansion(&BigUint::from(n), &BigUint::from(d))
        };
        assert!(term(1, 4)); // 0.25
        assert!(term(1, 5)); // 0.2
        assert!(term(3, 8)); // 0.375
        assert!(!term(1, 3));
        assert!(!term(10, 7));
        assert!(term(3, 3));

        let b = PlainHelper::binary();
        let bterm = |n: u32, d: u32| {
            b.has_terminating_radix_expansion(&BigUint::from(n), &BigUint::from(d))
        };
        assert!(bterm(1, 4));
        assert!(!bterm(1, 5));
        assert!(!bterm(1, 10));
    }

    #[test]
    fn test_accumulator_factory() {
        let h = PlainHelper::decimal();
        let mut a = h.shift_accumulator_with_digits(BigUint::from(500u32), 7, false);
        a.shift_right(1);
        assert_eq!(a.last_discarded_digit(), 0);
        // The seeded digit 7 is now "older".
        assert!(a.older_discarded_digits());
    }

    #[test]
    fn test_display() {
        let h = PlainHelper::decimal();
        assert_eq!(h.value_of(-12).to_string(), "-12E0");
        let inf = h.create_with_flags(
            BigUint::zero(),
            BigInt::zero(),
            NumFlags::INFINITY | NumFlags::NEGATIVE,
        );
        assert_eq!(inf.to_string(), "-Infinity");
        let nan = h.create_with_flags(BigUint::zero(), BigInt::zero(), NumFlags::QUIET_NAN);
        assert_eq!(nan.to_string(), "NaN");
    }
}
