// Bitflags
#![allow(clippy::indexing_slicing)]

use bitflags::bitflags;

/// Classifies an abstract number: sign plus the special-value kind,
/// if any. A finite value has at most [`NEGATIVE`][NumFlags::NEGATIVE]
/// set.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct NumFlags(u32);

bitflags! {
    impl NumFlags: u32 {
        /// The value's sign is negative. Meaningful for zeros,
        /// infinities, and NaN payloads alike.
        const NEGATIVE = 0x1;
        /// The value is an infinity.
        const INFINITY = 0x2;
        /// The value is a quiet NaN.
        const QUIET_NAN = 0x4;
        /// The value is a signaling NaN. Using one as an operand
        /// raises [`Status::INVALID`][crate::Status::INVALID].
        const SIGNALING_NAN = 0x8;
    }
}

impl NumFlags {
    /// Either kind of NaN.
    pub const NAN: Self = Self::QUIET_NAN.union(Self::SIGNALING_NAN);
    /// Any non-finite kind.
    pub const SPECIAL: Self = Self::INFINITY.union(Self::NAN);

    /// Reports whether the value is non-finite.
    pub const fn is_special(self) -> bool {
        self.intersects(Self::SPECIAL)
    }

    /// Reports whether the value is a NaN of either kind.
    pub const fn is_nan(self) -> bool {
        self.intersects(Self::NAN)
    }

    /// Reports whether the value is an infinity.
    pub const fn is_infinity(self) -> bool {
        self.contains(Self::INFINITY)
    }

    /// Reports whether the sign bit is set.
    pub const fn is_negative(self) -> bool {
        self.contains(Self::NEGATIVE)
    }
}

/// How much of the IEEE 854 value space a representation can hold.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ArithmeticSupport {
    /// Only finite numbers exist. Operations whose result would be an
    /// infinity or NaN fail with a hard error instead.
    FiniteOnly,
    /// Infinities, quiet NaNs, and signaling NaNs are representable.
    #[default]
    ExtendedFloat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(!NumFlags::NEGATIVE.is_special());
        assert!(NumFlags::INFINITY.is_special());
        assert!((NumFlags::INFINITY | NumFlags::NEGATIVE).is_infinity());
        assert!(NumFlags::QUIET_NAN.is_nan());
        assert!(NumFlags::SIGNALING_NAN.is_nan());
        assert!(!NumFlags::INFINITY.is_nan());
        assert!((NumFlags::NEGATIVE | NumFlags::QUIET_NAN).is_negative());
    }
}
