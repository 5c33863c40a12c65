use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

use crate::helper::ShiftAccumulator;

/// `radix^power` by binary exponentiation.
pub(crate) fn radix_power(radix: u32, mut power: u64) -> BigUint {
    let mut base = BigUint::from(radix);
    let mut acc = BigUint::one();
    while power > 0 {
        if power & 1 == 1 {
            acc *= &base;
        }
        power >>= 1;
        if power > 0 {
            base = &base * &base;
        }
    }
    acc
}

/// Counts the digits of `value` in the given radix. Zero has one
/// digit.
pub(crate) fn digit_length(value: &BigUint, radix: u32) -> u64 {
    if value.is_zero() {
        return 1;
    }
    if radix == 2 {
        return value.bits();
    }
    // Peel off 32 digits at a time, then count the rest one by one.
    let chunk = radix_power(radix, 32);
    let mut rest = value.clone();
    let mut digits: u64 = 0;
    while rest >= chunk {
        rest /= &chunk;
        digits += 32;
    }
    let small = BigUint::from(radix);
    while !rest.is_zero() {
        rest /= &small;
        digits += 1;
    }
    digits
}

/// A [`ShiftAccumulator`] over an arbitrary radix, backed by big
/// integer division.
#[derive(Clone, Debug)]
pub struct DigitShiftAccumulator {
    radix: u32,
    shifted: BigUint,
    discarded: BigInt,
    last: u32,
    older: bool,
    // Cached digit length of `shifted`.
    digits: Option<u64>,
}

impl DigitShiftAccumulator {
    /// Creates an accumulator over `magnitude`, seeded with carried
    /// discarded-digit state.
    pub fn new(
        radix: u32,
        magnitude: BigUint,
        last_discarded: u32,
        older_discarded: bool,
    ) -> Self {
        debug_assert!(radix >= 2);
        debug_assert!(last_discarded < radix);
        Self {
            radix,
            shifted: magnitude,
            discarded: BigInt::zero(),
            last: last_discarded,
            older: older_discarded,
            digits: None,
        }
    }

    /// Discards every remaining digit, folding them into the sticky
    /// state.
    fn discard_all(&mut self, count: BigInt) {
        self.older = self.older || self.last != 0 || !self.shifted.is_zero();
        self.last = 0;
        self.shifted = BigUint::zero();
        self.discarded += count;
        self.digits = Some(1);
    }
}

impl ShiftAccumulator for DigitShiftAccumulator {
    fn shifted(&self) -> &BigUint {
        &self.shifted
    }

    fn last_discarded_digit(&self) -> u32 {
        self.last
    }

    fn older_discarded_digits(&self) -> bool {
        self.older
    }

    fn discarded_digit_count(&self) -> &BigInt {
        &self.discarded
    }

    fn digit_length(&self) -> u64 {
        match self.digits {
            Some(d) => d,
            None => {
                // Interior mutability isn't worth it for a cache;
                // recompute on demand when the cache is cold.
                digit_length(&self.shifted, self.radix)
            }
        }
    }

    fn shift_right(&mut self, count: u64) {
        if count == 0 {
            return;
        }
        let len = digit_length(&self.shifted, self.radix);
        if count > len {
            // Every digit of the magnitude goes, plus leading zeros.
            self.discard_all(BigInt::from(count));
            return;
        }
        let (quo, rem) = if count == len && self.radix == 2 {
            // Cheap path: the shift strips the whole magnitude.
            (BigUint::zero(), self.shifted.clone())
        } else {
            let pow = radix_power(self.radix, count);
            self.shifted.div_rem(&pow)
        };
        // The digit at position count-1 is the new "last discarded";
        // anything below it joins the sticky bit.
        let below = radix_power(self.radix, count - 1);
        let (top, low) = rem.div_rem(&below);
        self.older = self.older || self.last != 0 || !low.is_zero();
        self.last = top.to_u32().unwrap_or(0);
        self.shifted = quo;
        self.discarded += BigInt::from(count);
        self.digits = None;
    }

    fn shift_right_big(&mut self, count: &BigInt) {
        if count.sign() != Sign::Plus {
            return;
        }
        let len = digit_length(&self.shifted, self.radix);
        if *count > BigInt::from(len) {
            self.discard_all(count.clone());
            return;
        }
        // count <= digit length, so it fits comfortably in a u64.
        let small = count.to_u64().unwrap_or(len);
        self.shift_right(small);
    }

    fn shift_to_digits(&mut self, digits: u64) {
        let len = digit_length(&self.shifted, self.radix);
        if len > digits {
            self.shift_right(len - digits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acc(radix: u32, value: u64) -> DigitShiftAccumulator {
        DigitShiftAccumulator::new(radix, BigUint::from(value), 0, false)
    }

    #[test]
    fn test_digit_length() {
        assert_eq!(digit_length(&BigUint::zero(), 10), 1);
        assert_eq!(digit_length(&BigUint::from(9u32), 10), 1);
        assert_eq!(digit_length(&BigUint::from(10u32), 10), 2);
        assert_eq!(digit_length(&BigUint::from(99_999u32), 10), 5);
        assert_eq!(digit_length(&BigUint::from(7u32), 2), 3);
        assert_eq!(digit_length(&BigUint::from(8u32), 2), 4);
        assert_eq!(digit_length(&BigUint::from(10u32).pow(40), 10), 41);
    }

    #[test]
    fn test_shift_right() {
        let mut a = acc(10, 12_345);
        a.shift_right(2);
        assert_eq!(*a.shifted(), BigUint::from(123u32));
        assert_eq!(a.last_discarded_digit(), 4);
        assert!(a.older_discarded_digits());
        assert_eq!(*a.discarded_digit_count(), BigInt::from(2));

        let mut a = acc(10, 12_300);
        a.shift_right(2);
        assert_eq!(a.last_discarded_digit(), 0);
        assert!(!a.older_discarded_digits());
        a.shift_right(1);
        assert_eq!(a.last_discarded_digit(), 3);
        assert!(!a.older_discarded_digits());
        a.shift_right(1);
        // Former last digit (3) becomes an older digit.
        assert_eq!(a.last_discarded_digit(), 2);
        assert!(a.older_discarded_digits());
    }

    #[test]
    fn test_shift_past_end() {
        let mut a = acc(10, 123);
        a.shift_right(5);
        assert!(a.shifted().is_zero());
        assert_eq!(a.last_discarded_digit(), 0);
        assert!(a.older_discarded_digits());
        assert_eq!(*a.discarded_digit_count(), BigInt::from(5));
        assert_eq!(a.digit_length(), 1);
    }

    #[test]
    fn test_shift_right_big() {
        let mut a = acc(10, 123);
        a.shift_right_big(&BigInt::from(10).pow(30));
        assert!(a.shifted().is_zero());
        assert!(a.older_discarded_digits());
        assert_eq!(*a.discarded_digit_count(), BigInt::from(10).pow(30));

        let mut a = acc(10, 123);
        a.shift_right_big(&BigInt::from(-4));
        assert_eq!(*a.shifted(), BigUint::from(123u32));
    }

    #[test]
    fn test_shift_to_digits() {
        let mut a = acc(10, 999_999);
        a.shift_to_digits(3);
        assert_eq!(*a.shifted(), BigUint::from(999u32));
        assert_eq!(a.last_discarded_digit(), 9);
        assert!(a.older_discarded_digits());
        // Already short enough: no-op.
        a.shift_to_digits(5);
        assert_eq!(*a.shifted(), BigUint::from(999u32));
    }

    #[test]
    fn test_binary_radix() {
        let mut a = acc(2, 0b1011);
        a.shift_right(2);
        assert_eq!(*a.shifted(), BigUint::from(0b10u32));
        assert_eq!(a.last_discarded_digit(), 1);
        assert!(a.older_discarded_digits());
    }

    #[test]
    fn test_radix_power() {
        assert_eq!(radix_power(10, 0), BigUint::one());
        assert_eq!(radix_power(10, 3), BigUint::from(1000u32));
        assert_eq!(radix_power(2, 10), BigUint::from(1024u32));
        assert_eq!(radix_power(16, 5), BigUint::from(0x100000u32));
    }
}
