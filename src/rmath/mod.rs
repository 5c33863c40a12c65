//! The radix-independent arithmetic engine.

use core::cmp::Ordering;

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::ctx::{Context, Rounding, Status};
use crate::engine::Engine;
use crate::err::Error;
use crate::helper::{RadixHelper, ShiftAccumulator};
use crate::num::{ArithmeticSupport, NumFlags};

mod div;
mod round;
mod series;

#[cfg(test)]
mod tests;

type Num<H> = <H as RadixHelper>::Value;
type Res<H> = Result<Num<H>, Error<Num<H>>>;

/// The largest radix-power shift the engine will materialize. Larger
/// shifts would need more memory than any realistic result.
const MAX_RADIX_SHIFT: u64 = i32::MAX as u64;

/// Radix-independent arithmetic over the representation described by
/// `H`.
///
/// The engine implements every [`Engine`] operation in terms of the
/// helper's mantissa/exponent accessors and shift accumulators, so
/// one body of code serves decimal, binary, and any other radix.
#[derive(Clone, Debug)]
pub struct RadixMath<H: RadixHelper> {
    pub(crate) helper: H,
    pub(crate) radix: u32,
    pub(crate) support: ArithmeticSupport,
}

impl<H: RadixHelper> RadixMath<H> {
    /// Creates an engine over the given helper.
    pub fn new(helper: H) -> Self {
        let radix = helper.radix();
        let support = helper.support();
        Self {
            helper,
            radix,
            support,
        }
    }

    /// The helper this engine was built over.
    pub fn helper(&self) -> &H {
        &self.helper
    }

    // ---- small accessors ----------------------------------------

    pub(crate) fn is_finite(&self, value: &Num<H>) -> bool {
        !self.helper.flags(value).is_special()
    }

    pub(crate) fn is_negative(&self, value: &Num<H>) -> bool {
        self.helper.flags(value).is_negative()
    }

    pub(crate) fn num_digits(&self, magnitude: &BigUint) -> u64 {
        self.helper.shift_accumulator(magnitude.clone()).digit_length()
    }

    pub(crate) fn value_of(&self, value: i64) -> Num<H> {
        self.helper.value_of(value)
    }

    fn make_finite(&self, mantissa: BigUint, exponent: BigInt, negative: bool) -> Num<H> {
        let flags = if negative {
            NumFlags::NEGATIVE
        } else {
            NumFlags::empty()
        };
        self.helper.create_with_flags(mantissa, exponent, flags)
    }

    /// Forces the sign bit of `value` to `negative`.
    pub(crate) fn ensure_sign(&self, value: Num<H>, negative: bool) -> Num<H> {
        let flags = self.helper.flags(&value);
        if flags.is_negative() == negative {
            return value;
        }
        let mut flags = flags & !NumFlags::NEGATIVE;
        if negative {
            flags |= NumFlags::NEGATIVE;
        }
        self.helper
            .create_with_flags(self.helper.mantissa(&value), self.helper.exponent(&value), flags)
    }

    pub(crate) fn abs_raw(&self, value: &Num<H>) -> Num<H> {
        self.ensure_sign(value.clone(), false)
    }

    /// Flips the sign bit without any NaN or zero handling.
    pub(crate) fn negate_raw(&self, value: &Num<H>) -> Num<H> {
        let negative = self.helper.flags(value).is_negative();
        self.ensure_sign(value.clone(), !negative)
    }

    // ---- signaling ----------------------------------------------

    /// Truncates a NaN payload to the working precision and quiets
    /// the NaN.
    pub(crate) fn return_quiet_nan(&self, value: &Num<H>, ctx: &mut Context) -> Num<H> {
        let mut mant = self.helper.mantissa(value);
        let mut changed = false;
        if !mant.is_zero() && ctx.precision > 0 {
            let limit = self.helper.multiply_by_radix_power(&BigUint::one(), ctx.precision);
            if mant >= limit {
                mant %= limit;
                changed = true;
            }
        }
        let flags = self.helper.flags(value);
        if !changed && flags.contains(NumFlags::QUIET_NAN) {
            return value.clone();
        }
        let flags = (flags & NumFlags::NEGATIVE) | NumFlags::QUIET_NAN;
        self.helper.create_with_flags(mant, BigInt::zero(), flags)
    }

    pub(crate) fn signaling_nan_invalid(&self, value: &Num<H>, ctx: &mut Context) -> Num<H> {
        ctx.report(Status::INVALID);
        self.return_quiet_nan(value, ctx)
    }

    pub(crate) fn signal_invalid(&self, ctx: &mut Context) -> Res<H> {
        if self.support == ArithmeticSupport::FiniteOnly {
            return Err(Error::NotFinite("invalid operation"));
        }
        ctx.report(Status::INVALID);
        Ok(self
            .helper
            .create_with_flags(BigUint::zero(), BigInt::zero(), NumFlags::QUIET_NAN))
    }

    pub(crate) fn signal_invalid_with_message(
        &self,
        ctx: &mut Context,
        msg: &'static str,
    ) -> Res<H> {
        if self.support == ArithmeticSupport::FiniteOnly {
            return Err(Error::NotFinite(msg));
        }
        ctx.report(Status::INVALID);
        Ok(self
            .helper
            .create_with_flags(BigUint::zero(), BigInt::zero(), NumFlags::QUIET_NAN))
    }

    pub(crate) fn signal_overflow(&self, negative: bool) -> Res<H> {
        if self.support == ArithmeticSupport::FiniteOnly {
            return Err(Error::NotFinite("overflow"));
        }
        let mut flags = NumFlags::INFINITY;
        if negative {
            flags |= NumFlags::NEGATIVE;
        }
        Ok(self
            .helper
            .create_with_flags(BigUint::zero(), BigInt::zero(), flags))
    }

    /// Signals overflow, saturating to the largest finite value in
    /// the directed rounding modes.
    pub(crate) fn signal_overflow_with_context(
        &self,
        ctx: &mut Context,
        negative: bool,
    ) -> Res<H> {
        ctx.report(Status::OVERFLOW | Status::INEXACT | Status::ROUNDED);
        let directed = matches!(ctx.rounding, Rounding::Down | Rounding::ZeroFiveUp)
            || (ctx.rounding == Rounding::Ceiling && negative)
            || (ctx.rounding == Rounding::Floor && !negative);
        if ctx.precision > 0 && ctx.has_exponent_range && directed {
            let mut overflow_mant =
                self.helper.multiply_by_radix_power(&BigUint::one(), ctx.precision);
            overflow_mant -= BigUint::one();
            let clamp = &ctx.emax + 1 - BigInt::from(ctx.precision);
            return Ok(self.make_finite(overflow_mant, clamp, negative));
        }
        self.signal_overflow(negative)
    }

    pub(crate) fn signal_divide_by_zero(&self, ctx: &mut Context, negative: bool) -> Res<H> {
        if self.support == ArithmeticSupport::FiniteOnly {
            return Err(Error::NotFinite("division by zero"));
        }
        ctx.report(Status::DIVIDE_BY_ZERO);
        let mut flags = NumFlags::INFINITY;
        if negative {
            flags |= NumFlags::NEGATIVE;
        }
        Ok(self
            .helper
            .create_with_flags(BigUint::zero(), BigInt::zero(), flags))
    }

    /// Copies flags raised in a working context back to the caller's.
    /// Invalid and DivideByZero mask everything else.
    pub(crate) fn transfer_flags(dst: &mut Context, src: &Context) {
        let hard = src.flags & (Status::INVALID | Status::DIVIDE_BY_ZERO);
        if !hard.is_empty() {
            dst.report(hard);
        } else {
            dst.report(src.flags);
        }
    }

    // ---- special-value dispatch ---------------------------------

    /// Handles NaN operands for a two-operand operation. Signaling
    /// NaNs win over quiet NaNs; the left operand wins over the
    /// right.
    pub(crate) fn handle_not_a_number(
        &self,
        lhs: &Num<H>,
        rhs: &Num<H>,
        ctx: &mut Context,
    ) -> Option<Num<H>> {
        let lflags = self.helper.flags(lhs);
        let rflags = self.helper.flags(rhs);
        if lflags.contains(NumFlags::SIGNALING_NAN) {
            return Some(self.signaling_nan_invalid(lhs, ctx));
        }
        if rflags.contains(NumFlags::SIGNALING_NAN) {
            return Some(self.signaling_nan_invalid(rhs, ctx));
        }
        if lflags.contains(NumFlags::QUIET_NAN) {
            return Some(self.return_quiet_nan(lhs, ctx));
        }
        if rflags.contains(NumFlags::QUIET_NAN) {
            return Some(self.return_quiet_nan(rhs, ctx));
        }
        None
    }

    pub(crate) fn division_handle_special(
        &self,
        lhs: &Num<H>,
        rhs: &Num<H>,
        ctx: &mut Context,
    ) -> Result<Option<Num<H>>, Error<Num<H>>> {
        let lflags = self.helper.flags(lhs);
        let rflags = self.helper.flags(rhs);
        if !(lflags | rflags).is_special() {
            return Ok(None);
        }
        if let Some(result) = self.handle_not_a_number(lhs, rhs, ctx) {
            return Ok(Some(result));
        }
        if lflags.is_infinity() && rflags.is_infinity() {
            return self.signal_invalid(ctx).map(Some);
        }
        let result_neg = (lflags ^ rflags).contains(NumFlags::NEGATIVE);
        if lflags.is_infinity() {
            return Ok(Some(self.ensure_sign(lhs.clone(), result_neg)));
        }
        if rflags.is_infinity() {
            // Dividing by infinity gives an epsilon-sized zero.
            if ctx.has_exponent_range && ctx.precision > 0 {
                ctx.report(Status::CLAMPED);
                let exp = &ctx.emin - BigInt::from(ctx.precision) + 1;
                return Ok(Some(self.make_finite(BigUint::zero(), exp, result_neg)));
            }
            let zero = self.make_finite(BigUint::zero(), BigInt::zero(), result_neg);
            return self.round_to_precision(&zero, ctx).map(Some);
        }
        Ok(None)
    }

    pub(crate) fn remainder_handle_special(
        &self,
        lhs: &Num<H>,
        rhs: &Num<H>,
        ctx: &mut Context,
    ) -> Result<Option<Num<H>>, Error<Num<H>>> {
        let lflags = self.helper.flags(lhs);
        let rflags = self.helper.flags(rhs);
        if (lflags | rflags).is_special() {
            if let Some(result) = self.handle_not_a_number(lhs, rhs, ctx) {
                return Ok(Some(result));
            }
            if lflags.is_infinity() {
                return self.signal_invalid(ctx).map(Some);
            }
            if rflags.is_infinity() {
                return self.round_to_precision(lhs, ctx).map(Some);
            }
        }
        if self.helper.mantissa(rhs).is_zero() {
            return self.signal_invalid(ctx).map(Some);
        }
        Ok(None)
    }

    pub(crate) fn min_max_handle_special(
        &self,
        a: &Num<H>,
        b: &Num<H>,
        ctx: &mut Context,
        is_min: bool,
        compare_abs: bool,
    ) -> Result<Option<Num<H>>, Error<Num<H>>> {
        let aflags = self.helper.flags(a);
        let bflags = self.helper.flags(b);
        if !(aflags | bflags).is_special() {
            return Ok(None);
        }
        if aflags.contains(NumFlags::SIGNALING_NAN) {
            return Ok(Some(self.signaling_nan_invalid(a, ctx)));
        }
        if bflags.contains(NumFlags::SIGNALING_NAN) {
            return Ok(Some(self.signaling_nan_invalid(b, ctx)));
        }
        if aflags.contains(NumFlags::QUIET_NAN) {
            if bflags.contains(NumFlags::QUIET_NAN) {
                return Ok(Some(self.return_quiet_nan(a, ctx)));
            }
            // Prefer the numeric operand.
            return self.round_to_precision(b, ctx).map(Some);
        }
        if bflags.contains(NumFlags::QUIET_NAN) {
            return self.round_to_precision(a, ctx).map(Some);
        }
        if aflags.is_infinity() {
            if compare_abs && !bflags.is_infinity() {
                // Infinity has the larger magnitude.
                return if is_min {
                    self.round_to_precision(b, ctx).map(Some)
                } else {
                    Ok(Some(a.clone()))
                };
            }
            return if is_min {
                if aflags.is_negative() {
                    Ok(Some(a.clone()))
                } else {
                    self.round_to_precision(b, ctx).map(Some)
                }
            } else if !aflags.is_negative() {
                Ok(Some(a.clone()))
            } else {
                self.round_to_precision(b, ctx).map(Some)
            };
        }
        if bflags.is_infinity() {
            if compare_abs {
                return if is_min {
                    self.round_to_precision(a, ctx).map(Some)
                } else {
                    Ok(Some(b.clone()))
                };
            }
            return if is_min {
                if !bflags.is_negative() {
                    self.round_to_precision(a, ctx).map(Some)
                } else {
                    Ok(Some(b.clone()))
                }
            } else if bflags.is_negative() {
                self.round_to_precision(a, ctx).map(Some)
            } else {
                Ok(Some(b.clone()))
            };
        }
        Ok(None)
    }

    pub(crate) fn multiply_add_handle_special(
        &self,
        op1: &Num<H>,
        op2: &Num<H>,
        op3: &Num<H>,
        ctx: &mut Context,
    ) -> Result<Option<Num<H>>, Error<Num<H>>> {
        let f1 = self.helper.flags(op1);
        if f1.contains(NumFlags::SIGNALING_NAN) {
            return Ok(Some(self.signaling_nan_invalid(op1, ctx)));
        }
        let f2 = self.helper.flags(op2);
        if f2.contains(NumFlags::SIGNALING_NAN) {
            return Ok(Some(self.signaling_nan_invalid(op2, ctx)));
        }
        let f3 = self.helper.flags(op3);
        if f3.contains(NumFlags::SIGNALING_NAN) {
            return Ok(Some(self.signaling_nan_invalid(op3, ctx)));
        }
        if f1.contains(NumFlags::QUIET_NAN) {
            return Ok(Some(self.return_quiet_nan(op1, ctx)));
        }
        if f2.contains(NumFlags::QUIET_NAN) {
            return Ok(Some(self.return_quiet_nan(op2, ctx)));
        }
        // Infinity times zero is checked before the third operand's
        // quiet NaN, because the operation starts by multiplying the
        // first two operands.
        if f1.is_infinity() && !f2.is_special() && self.helper.mantissa(op2).is_zero() {
            return self.signal_invalid(ctx).map(Some);
        }
        if f2.is_infinity() && !f1.is_special() && self.helper.mantissa(op1).is_zero() {
            return self.signal_invalid(ctx).map(Some);
        }
        if f3.contains(NumFlags::QUIET_NAN) {
            return Ok(Some(self.return_quiet_nan(op3, ctx)));
        }
        Ok(None)
    }

    fn compare_handle_special(
        &self,
        lhs: &Num<H>,
        rhs: &Num<H>,
        treat_quiet_nans_as_signaling: bool,
        ctx: &mut Context,
    ) -> Option<Num<H>> {
        let lflags = self.helper.flags(lhs);
        let rflags = self.helper.flags(rhs);
        if !(lflags | rflags).is_special() {
            return None;
        }
        if lflags.contains(NumFlags::SIGNALING_NAN) {
            return Some(self.signaling_nan_invalid(lhs, ctx));
        }
        if rflags.contains(NumFlags::SIGNALING_NAN) {
            return Some(self.signaling_nan_invalid(rhs, ctx));
        }
        if treat_quiet_nans_as_signaling {
            if lflags.contains(NumFlags::QUIET_NAN) {
                return Some(self.signaling_nan_invalid(lhs, ctx));
            }
            if rflags.contains(NumFlags::QUIET_NAN) {
                return Some(self.signaling_nan_invalid(rhs, ctx));
            }
        } else {
            if lflags.contains(NumFlags::QUIET_NAN) {
                return Some(self.return_quiet_nan(lhs, ctx));
            }
            if rflags.contains(NumFlags::QUIET_NAN) {
                return Some(self.return_quiet_nan(rhs, ctx));
            }
        }
        let signed_inf = NumFlags::INFINITY | NumFlags::NEGATIVE;
        if lflags.is_infinity() {
            if (lflags & signed_inf) == (rflags & signed_inf) {
                return Some(self.value_of(0));
            }
            return Some(self.value_of(if lflags.is_negative() { -1 } else { 1 }));
        }
        if rflags.is_infinity() {
            if (lflags & signed_inf) == (rflags & signed_inf) {
                return Some(self.value_of(0));
            }
            return Some(self.value_of(if rflags.is_negative() { 1 } else { -1 }));
        }
        None
    }

    /// Orders two values when at least one is an infinity, assuming
    /// neither is a NaN.
    fn compare_special(&self, lhs: &Num<H>, rhs: &Num<H>) -> Option<Ordering> {
        let lflags = self.helper.flags(lhs);
        let rflags = self.helper.flags(rhs);
        if !(lflags | rflags).is_special() {
            return None;
        }
        let signed_inf = NumFlags::INFINITY | NumFlags::NEGATIVE;
        if lflags.is_infinity() {
            if (lflags & signed_inf) == (rflags & signed_inf) {
                return Some(Ordering::Equal);
            }
            return Some(if lflags.is_negative() {
                Ordering::Less
            } else {
                Ordering::Greater
            });
        }
        if rflags.is_infinity() {
            if (lflags & signed_inf) == (rflags & signed_inf) {
                return Some(Ordering::Equal);
            }
            return Some(if rflags.is_negative() {
                Ordering::Greater
            } else {
                Ordering::Less
            });
        }
        None
    }

    // ---- rounding decision --------------------------------------

    /// Decides whether discarding `(last, older)` under `rounding`
    /// rounds the retained magnitude `value` away from zero.
    pub(crate) fn round_given_digits(
        &self,
        last: u32,
        older: bool,
        rounding: Rounding,
        neg: bool,
        value: &BigUint,
    ) -> bool {
        let half = self.radix / 2;
        match rounding {
            Rounding::HalfUp => last >= half,
            Rounding::HalfEven => {
                if last >= half {
                    last > half || older || value.bit(0)
                } else {
                    false
                }
            }
            Rounding::Ceiling => !neg && (last != 0 || older),
            Rounding::Floor => neg && (last != 0 || older),
            Rounding::HalfDown => last > half || (last == half && older),
            Rounding::Up => last != 0 || older,
            Rounding::ZeroFiveUp => {
                if last == 0 && !older {
                    false
                } else if self.radix == 2 {
                    true
                } else {
                    let last_digit = (value % self.radix).to_u32().unwrap_or(0);
                    last_digit == 0 || last_digit == half
                }
            }
            Rounding::Down | Rounding::Unnecessary => false,
        }
    }

    pub(crate) fn round_given_accum(
        &self,
        accum: &H::Accum,
        rounding: Rounding,
        neg: bool,
        value: &BigUint,
    ) -> bool {
        self.round_given_digits(
            accum.last_discarded_digit(),
            accum.older_discarded_digits(),
            rounding,
            neg,
            value,
        )
    }

    // ---- rescaling ----------------------------------------------

    /// `mantissa * radix^|e1 - e2|`, or `None` when the shift is
    /// infeasibly large.
    pub(crate) fn rescale_by_exponent_diff(
        &self,
        mantissa: &BigUint,
        e1: &BigInt,
        e2: &BigInt,
    ) -> Option<BigUint> {
        if mantissa.is_zero() {
            return Some(BigUint::zero());
        }
        let diff = (e1 - e2).abs();
        let small = diff.to_u64()?;
        if small > MAX_RADIX_SHIFT {
            return None;
        }
        Some(self.helper.multiply_by_radix_power(mantissa, small))
    }

    // ---- sign ops -----------------------------------------------

    pub(crate) fn abs(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        let flags = self.helper.flags(value);
        if flags.contains(NumFlags::SIGNALING_NAN) {
            return Ok(self.signaling_nan_invalid(value, ctx));
        }
        if flags.contains(NumFlags::QUIET_NAN) {
            return Ok(self.return_quiet_nan(value, ctx));
        }
        if flags.is_negative() {
            let positive = self.helper.create_with_flags(
                self.helper.mantissa(value),
                self.helper.exponent(value),
                flags & !NumFlags::NEGATIVE,
            );
            return self.round_to_precision(&positive, ctx);
        }
        self.round_to_precision(value, ctx)
    }

    pub(crate) fn negate(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        let flags = self.helper.flags(value);
        if flags.contains(NumFlags::SIGNALING_NAN) {
            return Ok(self.signaling_nan_invalid(value, ctx));
        }
        if flags.contains(NumFlags::QUIET_NAN) {
            return Ok(self.return_quiet_nan(value, ctx));
        }
        let mant = self.helper.mantissa(value);
        if !flags.is_infinity() && mant.is_zero() {
            // Negating a zero follows the subtraction rules: the
            // result is negative only under Floor rounding.
            let neg = flags.is_negative() && ctx.rounding == Rounding::Floor;
            let mut newflags = flags & !NumFlags::NEGATIVE;
            if flags.is_negative() && neg {
                newflags = flags | NumFlags::NEGATIVE;
            }
            let zero =
                self.helper
                    .create_with_flags(mant, self.helper.exponent(value), newflags);
            return self.round_to_precision(&zero, ctx);
        }
        let negated = self.helper.create_with_flags(
            mant,
            self.helper.exponent(value),
            flags ^ NumFlags::NEGATIVE,
        );
        self.round_to_precision(&negated, ctx)
    }

    pub(crate) fn subtract(&self, lhs: &Num<H>, rhs: &Num<H>, ctx: &mut Context) -> Res<H> {
        let flags = self.helper.flags(rhs);
        let negated = if flags.is_nan() {
            rhs.clone()
        } else {
            self.helper.create_with_flags(
                self.helper.mantissa(rhs),
                self.helper.exponent(rhs),
                flags ^ NumFlags::NEGATIVE,
            )
        };
        self.add(lhs, &negated, ctx)
    }

    // ---- multiplication -----------------------------------------

    pub(crate) fn multiply(&self, lhs: &Num<H>, rhs: &Num<H>, ctx: &mut Context) -> Res<H> {
        let lflags = self.helper.flags(lhs);
        let rflags = self.helper.flags(rhs);
        if (lflags | rflags).is_special() {
            if let Some(result) = self.handle_not_a_number(lhs, rhs, ctx) {
                return Ok(result);
            }
            let result_neg = (lflags ^ rflags).contains(NumFlags::NEGATIVE);
            if lflags.is_infinity() {
                if !rflags.is_special() && self.helper.mantissa(rhs).is_zero() {
                    return self.signal_invalid(ctx);
                }
                return Ok(self.ensure_sign(lhs.clone(), result_neg));
            }
            if rflags.is_infinity() {
                if !lflags.is_special() && self.helper.mantissa(lhs).is_zero() {
                    return self.signal_invalid(ctx);
                }
                return Ok(self.ensure_sign(rhs.clone(), result_neg));
            }
        }
        let newexp = self.helper.exponent(lhs) + self.helper.exponent(rhs);
        let result_neg = (lflags ^ rflags).contains(NumFlags::NEGATIVE);
        let product = self.make_finite(
            self.helper.mantissa(lhs) * self.helper.mantissa(rhs),
            newexp,
            result_neg,
        );
        self.round_to_precision(&product, ctx)
    }

    pub(crate) fn multiply_and_add(
        &self,
        a: &Num<H>,
        b: &Num<H>,
        c: &Num<H>,
        ctx: &mut Context,
    ) -> Res<H> {
        let mut ctx2 = Context::unlimited().with_blank_flags();
        if let Some(result) = self.multiply_add_handle_special(a, b, c, ctx)? {
            return Ok(result);
        }
        let product = self.multiply(a, b, &mut ctx2)?;
        let result = self.add(&product, c, ctx)?;
        ctx.report(ctx2.flags);
        Ok(result)
    }

    // ---- addition -----------------------------------------------

    /// Adds two aligned, unsigned mantissas with the sign rules for
    /// signed zeros.
    fn add_core(
        &self,
        mant1: BigUint,
        mant2: BigUint,
        exponent: BigInt,
        flags1: NumFlags,
        flags2: NumFlags,
        ctx: &Context,
    ) -> Num<H> {
        let neg1 = flags1.is_negative();
        let neg2 = flags2.is_negative();
        let (sum, mut neg_result) = if neg1 != neg2 {
            // Signs differ: a subtraction.
            let diff = BigInt::from(mant1) - BigInt::from(mant2);
            let neg = if diff.is_zero() {
                neg1 ^ neg2
            } else {
                neg1 ^ diff.is_negative()
            };
            (diff.into_parts().1, neg)
        } else {
            (mant1 + mant2, neg1)
        };
        if sum.is_zero() && neg_result {
            // An exact zero sum is negative only for (-x) + (-y), or
            // for opposite signs under Floor rounding.
            if !((neg1 && neg2) || ((neg1 ^ neg2) && ctx.rounding == Rounding::Floor)) {
                neg_result = false;
            }
        }
        self.make_finite(sum, exponent, neg_result)
    }

    pub(crate) fn add(&self, lhs: &Num<H>, rhs: &Num<H>, ctx: &mut Context) -> Res<H> {
        let lflags = self.helper.flags(lhs);
        let rflags = self.helper.flags(rhs);
        if (lflags | rflags).is_special() {
            if let Some(result) = self.handle_not_a_number(lhs, rhs, ctx) {
                return Ok(result);
            }
            if lflags.is_infinity() {
                if rflags.is_infinity()
                    && lflags.is_negative() != rflags.is_negative()
                {
                    return self.signal_invalid(ctx);
                }
                return Ok(lhs.clone());
            }
            if rflags.is_infinity() {
                return Ok(rhs.clone());
            }
        }
        let op1_exp = self.helper.exponent(lhs);
        let op2_exp = self.helper.exponent(rhs);
        let expcmp = op1_exp.cmp(&op2_exp);
        let op1_mant = self.helper.mantissa(lhs);
        let op2_mant = self.helper.mantissa(rhs);
        let retval;
        if expcmp == Ordering::Equal {
            retval = self.add_core(op1_mant, op2_mant, op1_exp, lflags, rflags, ctx);
        } else {
            let expdiff = (&op1_exp - &op2_exp).abs();
            if ctx.precision > 0 && expdiff > BigInt::from(ctx.precision) {
                let precision = BigInt::from(ctx.precision);
                // When the operands are so far apart that the smaller
                // one can only nudge the rounding, fold it into
                // seeded discarded digits instead of materializing
                // the alignment shift.
                if op1_exp < op2_exp && !op2_mant.is_zero() {
                    let digit_length1 = self.num_digits(&op1_mant);
                    if &op1_exp + BigInt::from(digit_length1) + 2 < op2_exp {
                        let tmp: BigInt = &op2_exp - 4 - BigInt::from(digit_length1) - &precision;
                        let new_diff = (&tmp - &op2_exp).abs();
                        if new_diff < expdiff {
                            let same_sign = self.helper.sign(lhs) == self.helper.sign(rhs);
                            let one_op_zero = op1_mant.is_zero();
                            return self.add_far_operand(
                                rhs, op2_mant, op2_exp, same_sign, one_op_zero, ctx,
                            );
                        }
                    }
                } else if op1_exp > op2_exp && !op1_mant.is_zero() {
                    let digit_length2 = self.num_digits(&op2_mant);
                    if &op2_exp + BigInt::from(digit_length2) + 2 < op1_exp {
                        let tmp: BigInt = &op1_exp - 4 - BigInt::from(digit_length2) - &precision;
                        let new_diff = (&tmp - &op1_exp).abs();
                        if new_diff < expdiff {
                            let same_sign = self.helper.sign(lhs) == self.helper.sign(rhs);
                            let one_op_zero = op2_mant.is_zero();
                            return self.add_far_operand(
                                lhs, op1_mant, op1_exp, same_sign, one_op_zero, ctx,
                            );
                        }
                    }
                }
            }
            let result_exp = if expcmp == Ordering::Less {
                op1_exp.clone()
            } else {
                op2_exp.clone()
            };
            if expcmp == Ordering::Greater {
                let Some(rescaled) =
                    self.rescale_by_exponent_diff(&op1_mant, &op1_exp, &op2_exp)
                else {
                    return self
                        .signal_invalid_with_message(ctx, "exponent difference too large");
                };
                retval = self.add_core(rescaled, op2_mant, result_exp, lflags, rflags, ctx);
            } else {
                let Some(rescaled) =
                    self.rescale_by_exponent_diff(&op2_mant, &op1_exp, &op2_exp)
                else {
                    return self
                        .signal_invalid_with_message(ctx, "exponent difference too large");
                };
                retval = self.add_core(op1_mant, rescaled, result_exp, lflags, rflags, ctx);
            }
        }
        self.round_to_precision(&retval, ctx)
    }

    /// The far-apart-operands path of [`add`][Self::add]: the result
    /// is the dominant operand perturbed just enough that rounding
    /// sees the other one.
    fn add_far_operand(
        &self,
        big: &Num<H>,
        mut big_mant: BigUint,
        mut big_exp: BigInt,
        same_sign: bool,
        one_op_zero: bool,
        ctx: &mut Context,
    ) -> Res<H> {
        let precision = ctx.precision;
        let digit_length = self.num_digits(&big_mant);
        let flags = self.helper.flags(big);
        if digit_length < precision {
            // Pad the dominant operand out to full precision, leaving
            // room to subtract one quantum when the signs differ.
            let mut precision_diff = precision - digit_length;
            if !one_op_zero && !same_sign {
                precision_diff += 2;
            }
            big_mant = self.helper.multiply_by_radix_power(&big_mant, precision_diff);
            big_exp -= BigInt::from(precision_diff);
            if !one_op_zero && !same_sign {
                big_mant -= BigUint::one();
            }
            let value = self.helper.create_with_flags(big_mant, big_exp, flags);
            if one_op_zero {
                ctx.report(Status::ROUNDED);
            }
            let last = if one_op_zero || same_sign { 0 } else { 1 };
            let older = !(one_op_zero && !same_sign);
            // digit_length < precision here, so no shift applies.
            return self.round_with_shift(value, last, older, None, false, ctx);
        }
        // Already at or above full precision.
        let shift = BigInt::from(digit_length) - BigInt::from(precision);
        if !one_op_zero && !same_sign {
            big_mant = self.helper.multiply_by_radix_power(&big_mant, 2);
            big_exp -= 2;
            big_mant -= BigUint::one();
            let value = self.helper.create_with_flags(big_mant, big_exp, flags);
            return self.round_with_shift(value, 0, false, Some(&shift), false, ctx);
        }
        if !same_sign {
            ctx.report(Status::ROUNDED);
        }
        self.round_with_shift(big.clone(), 0, same_sign, Some(&shift), false, ctx)
    }

    // ---- comparison ---------------------------------------------

    pub(crate) fn compare_with_context(
        &self,
        lhs: &Num<H>,
        rhs: &Num<H>,
        treat_quiet_nans_as_signaling: bool,
        ctx: &mut Context,
    ) -> Res<H> {
        if let Some(result) =
            self.compare_handle_special(lhs, rhs, treat_quiet_nans_as_signaling, ctx)
        {
            return Ok(result);
        }
        let ord = self.compare(lhs, rhs);
        Ok(self.value_of(match ord {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }))
    }

    /// Orders two values numerically. NaNs are equal to each other
    /// and greater than everything else; signed zeros are equal.
    pub(crate) fn compare(&self, lhs: &Num<H>, rhs: &Num<H>) -> Ordering {
        let lflags = self.helper.flags(lhs);
        let rflags = self.helper.flags(rhs);
        if lflags.is_nan() {
            if rflags.is_nan() {
                return Ordering::Equal;
            }
            return Ordering::Greater;
        }
        if rflags.is_nan() {
            return Ordering::Less;
        }
        if let Some(ord) = self.compare_special(lhs, rhs) {
            return ord;
        }
        let s = self.helper.sign(lhs);
        let ds = self.helper.sign(rhs);
        if s != ds {
            return if s < ds {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        if s == 0 {
            return Ordering::Equal;
        }
        let op1_exp = self.helper.exponent(lhs);
        let op2_exp = self.helper.exponent(rhs);
        let expcmp = op1_exp.cmp(&op2_exp);
        let op1_mant = self.helper.mantissa(lhs);
        let op2_mant = self.helper.mantissa(rhs);
        let mantcmp = if s < 0 {
            op1_mant.cmp(&op2_mant).reverse()
        } else {
            op1_mant.cmp(&op2_mant)
        };
        if mantcmp == Ordering::Equal {
            return if s < 0 { expcmp.reverse() } else { expcmp };
        }
        if expcmp == Ordering::Equal {
            return mantcmp;
        }
        let expdiff = (&op1_exp - &op2_exp).abs();
        // Far-apart exponents: decide by magnitude reach instead of
        // materializing a huge radix-power shift.
        if expdiff >= BigInt::from(100) {
            let precision1 = self.num_digits(&op1_mant);
            let precision2 = self.num_digits(&op2_mant);
            let max_precision = precision1.max(precision2);
            if expdiff > BigInt::from(max_precision) {
                if op1_exp < op2_exp {
                    if !op2_mant.is_zero() {
                        let digit_length1 = BigInt::from(precision1);
                        if &op1_exp + &digit_length1 + 2 < op2_exp {
                            let tmp: BigInt = &op2_exp
                                - 8
                                - &digit_length1
                                - BigInt::from(max_precision);
                            let new_diff = (&tmp - &op2_exp).abs();
                            if new_diff < expdiff {
                                // The second operand dominates.
                                return if s < 0 {
                                    Ordering::Greater
                                } else {
                                    Ordering::Less
                                };
                            }
                        }
                    }
                } else if !op1_mant.is_zero() {
                    let digit_length2 = BigInt::from(precision2);
                    if &op2_exp + &digit_length2 + 2 < op1_exp {
                        let tmp: BigInt =
                            &op1_exp - 8 - &digit_length2 - BigInt::from(max_precision);
                        let new_diff = (&tmp - &op1_exp).abs();
                        if new_diff < expdiff {
                            // The first operand dominates.
                            return if s < 0 { Ordering::Less } else { Ordering::Greater };
                        }
                    }
                }
            }
        }
        let mantcmp = if expcmp == Ordering::Greater {
            match self.rescale_by_exponent_diff(&op1_mant, &op1_exp, &op2_exp) {
                Some(newmant) => newmant.cmp(&op2_mant),
                // Infeasible shift means the shifted value dwarfs
                // the other mantissa.
                None => Ordering::Greater,
            }
        } else {
            match self.rescale_by_exponent_diff(&op2_mant, &op1_exp, &op2_exp) {
                Some(newmant) => op1_mant.cmp(&newmant),
                None => Ordering::Less,
            }
        };
        if s < 0 {
            mantcmp.reverse()
        } else {
            mantcmp
        }
    }

    // ---- min/max ------------------------------------------------

    pub(crate) fn max(&self, a: &Num<H>, b: &Num<H>, ctx: &mut Context) -> Res<H> {
        if let Some(result) = self.min_max_handle_special(a, b, ctx, false, false)? {
            return Ok(result);
        }
        match self.compare(a, b) {
            Ordering::Less => return self.round_to_precision(b, ctx),
            Ordering::Greater => return self.round_to_precision(a, ctx),
            Ordering::Equal => {}
        }
        let neg_a = self.is_negative(a);
        if neg_a != self.is_negative(b) {
            return if neg_a {
                self.round_to_precision(b, ctx)
            } else {
                self.round_to_precision(a, ctx)
            };
        }
        // Equal values: break the tie on exponent.
        let exp_gt = self.helper.exponent(a) > self.helper.exponent(b);
        if neg_a == exp_gt {
            self.round_to_precision(b, ctx)
        } else {
            self.round_to_precision(a, ctx)
        }
    }

    pub(crate) fn min(&self, a: &Num<H>, b: &Num<H>, ctx: &mut Context) -> Res<H> {
        if let Some(result) = self.min_max_handle_special(a, b, ctx, true, false)? {
            return Ok(result);
        }
        match self.compare(a, b) {
            Ordering::Less => return self.round_to_precision(a, ctx),
            Ordering::Greater => return self.round_to_precision(b, ctx),
            Ordering::Equal => {}
        }
        let neg_a = self.is_negative(a);
        if neg_a != self.is_negative(b) {
            return if neg_a {
                self.round_to_precision(a, ctx)
            } else {
                self.round_to_precision(b, ctx)
            };
        }
        let exp_gt = self.helper.exponent(a) > self.helper.exponent(b);
        if neg_a == exp_gt {
            self.round_to_precision(a, ctx)
        } else {
            self.round_to_precision(b, ctx)
        }
    }

    pub(crate) fn max_magnitude(&self, a: &Num<H>, b: &Num<H>, ctx: &mut Context) -> Res<H> {
        if let Some(result) = self.min_max_handle_special(a, b, ctx, false, true)? {
            return Ok(result);
        }
        match self.compare(&self.abs_raw(a), &self.abs_raw(b)) {
            Ordering::Equal => self.max(a, b, ctx),
            Ordering::Greater => self.round_to_precision(a, ctx),
            Ordering::Less => self.round_to_precision(b, ctx),
        }
    }

    pub(crate) fn min_magnitude(&self, a: &Num<H>, b: &Num<H>, ctx: &mut Context) -> Res<H> {
        if let Some(result) = self.min_max_handle_special(a, b, ctx, true, true)? {
            return Ok(result);
        }
        match self.compare(&self.abs_raw(a), &self.abs_raw(b)) {
            Ordering::Equal => self.min(a, b, ctx),
            Ordering::Less => self.round_to_precision(a, ctx),
            Ordering::Greater => self.round_to_precision(b, ctx),
        }
    }

    // ---- neighbor values ----------------------------------------

    /// The largest finite value for the context's precision, at
    /// exponent `emax + 1 - precision`.
    fn max_finite_value(&self, ctx: &Context, negative: bool) -> Num<H> {
        let mut overflow_mant =
            self.helper.multiply_by_radix_power(&BigUint::one(), ctx.precision);
        overflow_mant -= BigUint::one();
        let exp = &ctx.emax + 1 - BigInt::from(ctx.precision);
        self.make_finite(overflow_mant, exp, negative)
    }

    fn check_next_context(&self, ctx: &mut Context) -> Result<Option<Num<H>>, Error<Num<H>>> {
        if ctx.precision == 0 {
            return self
                .signal_invalid_with_message(ctx, "unlimited precision not supported here")
                .map(Some);
        }
        if !ctx.has_exponent_range {
            return self
                .signal_invalid_with_message(ctx, "context has no exponent range")
                .map(Some);
        }
        Ok(None)
    }

    pub(crate) fn next_minus(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        if let Some(result) = self.check_next_context(ctx)? {
            return Ok(result);
        }
        let flags = self.helper.flags(value);
        if flags.contains(NumFlags::SIGNALING_NAN) {
            return Ok(self.signaling_nan_invalid(value, ctx));
        }
        if flags.contains(NumFlags::QUIET_NAN) {
            return Ok(self.return_quiet_nan(value, ctx));
        }
        if flags.is_infinity() {
            if flags.is_negative() {
                return Ok(value.clone());
            }
            return Ok(self.max_finite_value(ctx, false));
        }
        let mut minexp = &ctx.emin - BigInt::from(ctx.precision) + 1;
        let exp = self.helper.exponent(value);
        if exp <= minexp {
            // Stay below the value's own quantum.
            minexp = &exp - 2;
        }
        let quantum =
            self.helper
                .create_with_flags(BigUint::one(), minexp, NumFlags::NEGATIVE);
        let mut ctx2 = ctx.clone().with_rounding(Rounding::Floor);
        let result = self.add(value, &quantum, &mut ctx2)?;
        ctx.report(ctx2.flags);
        Ok(result)
    }

    pub(crate) fn next_plus(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        if let Some(result) = self.check_next_context(ctx)? {
            return Ok(result);
        }
        let flags = self.helper.flags(value);
        if flags.contains(NumFlags::SIGNALING_NAN) {
            return Ok(self.signaling_nan_invalid(value, ctx));
        }
        if flags.contains(NumFlags::QUIET_NAN) {
            return Ok(self.return_quiet_nan(value, ctx));
        }
        if flags.is_infinity() {
            if flags.is_negative() {
                return Ok(self.max_finite_value(ctx, true));
            }
            return Ok(value.clone());
        }
        let mut minexp = &ctx.emin - BigInt::from(ctx.precision) + 1;
        let exp = self.helper.exponent(value);
        if exp <= minexp {
            minexp = &exp - 2;
        }
        let quantum = self
            .helper
            .create_with_flags(BigUint::one(), minexp, NumFlags::empty());
        let mut ctx2 = ctx.clone().with_rounding(Rounding::Ceiling);
        let result = self.add(value, &quantum, &mut ctx2)?;
        ctx.report(ctx2.flags);
        Ok(result)
    }

    pub(crate) fn next_toward(
        &self,
        value: &Num<H>,
        other: &Num<H>,
        ctx: &mut Context,
    ) -> Res<H> {
        if let Some(result) = self.check_next_context(ctx)? {
            return Ok(result);
        }
        let this_flags = self.helper.flags(value);
        let other_flags = self.helper.flags(other);
        if (this_flags | other_flags).is_special() {
            if let Some(result) = self.handle_not_a_number(value, other, ctx) {
                return Ok(result);
            }
        }
        let cmp = self.compare(value, other);
        if cmp == Ordering::Equal {
            let signed = self.ensure_sign(value.clone(), other_flags.is_negative());
            let mut quiet = ctx.clone().with_no_flags();
            return self.round_to_precision(&signed, &mut quiet);
        }
        if this_flags.is_infinity() {
            let signed_inf = NumFlags::INFINITY | NumFlags::NEGATIVE;
            if (this_flags & signed_inf) == (other_flags & signed_inf) {
                return Ok(value.clone());
            }
            return Ok(self.max_finite_value(ctx, this_flags.is_negative()));
        }
        let mut minexp = &ctx.emin - BigInt::from(ctx.precision) + 1;
        let exp = self.helper.exponent(value);
        if exp < minexp {
            minexp = &exp - 2;
        } else {
            // Drop below the exponent range so underflow is flagged
            // when the step crosses it.
            minexp -= 2;
        }
        let quantum_flags = if cmp == Ordering::Greater {
            NumFlags::NEGATIVE
        } else {
            NumFlags::empty()
        };
        let quantum = self.helper.create_with_flags(BigUint::one(), minexp, quantum_flags);
        let rounding = if cmp == Ordering::Greater {
            Rounding::Floor
        } else {
            Rounding::Ceiling
        };
        let mut ctx2 = ctx.clone().with_rounding(rounding).with_blank_flags();
        let result = self.add(value, &quantum, &mut ctx2)?;
        if !ctx2
            .flags
            .intersects(Status::OVERFLOW | Status::UNDERFLOW)
        {
            // Stepping toward a bound only reports range crossings.
            ctx2.flags = Status::empty();
        }
        if ctx2.flags.contains(Status::UNDERFLOW) {
            let bigmant = self.helper.mantissa(&result);
            let maxmant = self
                .helper
                .multiply_by_radix_power(&BigUint::one(), ctx.precision.saturating_sub(1));
            if bigmant >= maxmant || ctx.precision == 1 {
                // A full-precision mantissa did not really
                // underflow.
                ctx2.flags = Status::empty();
            }
        }
        ctx.report(ctx2.flags);
        Ok(result)
    }
}

impl<H: RadixHelper> Engine<H::Value> for RadixMath<H> {
    fn add(&self, lhs: &H::Value, rhs: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::add(self, lhs, rhs, ctx)
    }

    fn subtract(&self, lhs: &H::Value, rhs: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::subtract(self, lhs, rhs, ctx)
    }

    fn multiply(&self, lhs: &H::Value, rhs: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::multiply(self, lhs, rhs, ctx)
    }

    fn multiply_and_add(
        &self,
        a: &H::Value,
        b: &H::Value,
        c: &H::Value,
        ctx: &mut Context,
    ) -> Res<H> {
        RadixMath::multiply_and_add(self, a, b, c, ctx)
    }

    fn divide(&self, lhs: &H::Value, rhs: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::divide(self, lhs, rhs, ctx)
    }

    fn divide_to_exponent(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        desired_exponent: &BigInt,
        ctx: &mut Context,
    ) -> Res<H> {
        RadixMath::divide_to_exponent(self, lhs, rhs, desired_exponent, ctx)
    }

    fn divide_to_integer_natural_scale(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &mut Context,
    ) -> Res<H> {
        RadixMath::divide_to_integer_natural_scale(self, lhs, rhs, ctx)
    }

    fn divide_to_integer_zero_scale(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &mut Context,
    ) -> Res<H> {
        RadixMath::divide_to_integer_zero_scale(self, lhs, rhs, ctx)
    }

    fn remainder(&self, lhs: &H::Value, rhs: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::remainder(self, lhs, rhs, ctx)
    }

    fn remainder_near(&self, lhs: &H::Value, rhs: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::remainder_near(self, lhs, rhs, ctx)
    }

    fn abs(&self, value: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::abs(self, value, ctx)
    }

    fn negate(&self, value: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::negate(self, value, ctx)
    }

    fn plus(&self, value: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::plus(self, value, ctx)
    }

    fn round_to_precision(&self, value: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::round_to_precision(self, value, ctx)
    }

    fn round_to_binary_precision(&self, value: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::round_to_binary_precision(self, value, ctx)
    }

    fn quantize(&self, value: &H::Value, other: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::quantize(self, value, other, ctx)
    }

    fn round_to_exponent_exact(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &mut Context,
    ) -> Res<H> {
        RadixMath::round_to_exponent_exact(self, value, exponent, ctx)
    }

    fn round_to_exponent_simple(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &mut Context,
    ) -> Res<H> {
        RadixMath::round_to_exponent_simple(self, value, exponent, ctx)
    }

    fn round_to_exponent_no_rounded_flag(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &mut Context,
    ) -> Res<H> {
        RadixMath::round_to_exponent_no_rounded_flag(self, value, exponent, ctx)
    }

    fn reduce(&self, value: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::reduce(self, value, ctx)
    }

    fn square_root(&self, value: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::square_root(self, value, ctx)
    }

    fn power(&self, base: &H::Value, pow: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::power(self, base, pow, ctx)
    }

    fn exp(&self, value: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::exp(self, value, ctx)
    }

    fn ln(&self, value: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::ln(self, value, ctx)
    }

    fn log10(&self, value: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::log10(self, value, ctx)
    }

    fn pi(&self, ctx: &mut Context) -> Res<H> {
        RadixMath::pi(self, ctx)
    }

    fn min(&self, lhs: &H::Value, rhs: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::min(self, lhs, rhs, ctx)
    }

    fn max(&self, lhs: &H::Value, rhs: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::max(self, lhs, rhs, ctx)
    }

    fn min_magnitude(&self, lhs: &H::Value, rhs: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::min_magnitude(self, lhs, rhs, ctx)
    }

    fn max_magnitude(&self, lhs: &H::Value, rhs: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::max_magnitude(self, lhs, rhs, ctx)
    }

    fn next_plus(&self, value: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::next_plus(self, value, ctx)
    }

    fn next_minus(&self, value: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::next_minus(self, value, ctx)
    }

    fn next_toward(&self, value: &H::Value, other: &H::Value, ctx: &mut Context) -> Res<H> {
        RadixMath::next_toward(self, value, other, ctx)
    }

    fn compare_with_context(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        treat_quiet_nans_as_signaling: bool,
        ctx: &mut Context,
    ) -> Res<H> {
        RadixMath::compare_with_context(self, lhs, rhs, treat_quiet_nans_as_signaling, ctx)
    }

    fn compare(&self, lhs: &H::Value, rhs: &H::Value) -> Ordering {
        RadixMath::compare(self, lhs, rhs)
    }
}
