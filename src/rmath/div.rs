//! Division, integer division, and remainders.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{Signed, Zero};

use super::{Num, RadixMath, Res};
use crate::ctx::{Context, Rounding, Status};
use crate::helper::{RadixHelper, ShiftAccumulator};
use crate::num::NumFlags;

/// How [`RadixMath::divide_internal`] scales its result.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum IntegerMode {
    /// The quotient is rounded to the context's precision at the
    /// preferred (natural) exponent.
    Regular,
    /// The quotient is computed at a fixed target exponent.
    FixedScale,
}

impl<H: RadixHelper> RadixMath<H> {
    pub(crate) fn divide(&self, lhs: &Num<H>, rhs: &Num<H>, ctx: &mut Context) -> Res<H> {
        self.divide_internal(lhs, rhs, ctx, IntegerMode::Regular, &BigInt::zero())
    }

    pub(crate) fn divide_to_exponent(
        &self,
        lhs: &Num<H>,
        rhs: &Num<H>,
        desired_exponent: &BigInt,
        ctx: &mut Context,
    ) -> Res<H> {
        if !ctx.exponent_within_range(desired_exponent) {
            return self.signal_invalid_with_message(ctx, "exponent not within exponent range");
        }
        let mut ctx2 = ctx
            .clone()
            .with_unlimited_exponents()
            .with_precision(0)
            .with_blank_flags();
        let ret =
            self.divide_internal(lhs, rhs, &mut ctx2, IntegerMode::FixedScale, desired_exponent)?;
        ctx.report(ctx2.flags);
        Ok(ret)
    }

    pub(crate) fn divide_to_integer_natural_scale(
        &self,
        lhs: &Num<H>,
        rhs: &Num<H>,
        ctx: &mut Context,
    ) -> Res<H> {
        let desired_scale = self.helper.exponent(lhs) - self.helper.exponent(rhs);
        let mut ctx2 = Context::new(ctx.precision).with_rounding(Rounding::Down);
        let mut ret =
            self.divide_internal(lhs, rhs, &mut ctx2, IntegerMode::FixedScale, &BigInt::zero())?;
        if ctx2
            .flags
            .intersects(Status::INVALID | Status::DIVIDE_BY_ZERO)
        {
            ctx.report(Status::INVALID | Status::DIVIDE_BY_ZERO);
            return Ok(ret);
        }
        let neg = (self.helper.sign(lhs) < 0) ^ (self.helper.sign(rhs) < 0);
        if self.helper.mantissa(&ret).is_zero() {
            // Zero result: just give it the preferred exponent.
            ret = self.helper.create_with_flags(
                BigUint::zero(),
                desired_scale.clone(),
                self.helper.flags(&ret),
            );
        } else if desired_scale.is_negative() {
            let bigmantissa = self.helper.mantissa(&ret);
            let Some(bigmantissa) =
                self.rescale_by_exponent_diff(&bigmantissa, &desired_scale, &BigInt::zero())
            else {
                return self.signal_invalid_with_message(ctx, "exponent difference too large");
            };
            ret = self.helper.create_with_flags(
                bigmantissa,
                desired_scale.clone(),
                self.helper.flags(&ret),
            );
        } else if desired_scale.is_positive() {
            // Strip trailing zeros until the preferred exponent is
            // reached.
            let mut bigmantissa = self.helper.mantissa(&ret);
            let mut exponent = self.helper.exponent(&ret);
            let bigradix = BigUint::from(self.radix);
            while desired_scale != exponent {
                let (bigquo, bigrem) = bigmantissa.div_rem(&bigradix);
                if !bigrem.is_zero() {
                    break;
                }
                bigmantissa = bigquo;
                exponent += 1;
            }
            ret = self
                .helper
                .create_with_flags(bigmantissa, exponent, self.helper.flags(&ret));
        }
        ret = self.round_to_precision(&ret, ctx)?;
        Ok(self.ensure_sign(ret, neg))
    }

    pub(crate) fn divide_to_integer_zero_scale(
        &self,
        lhs: &Num<H>,
        rhs: &Num<H>,
        ctx: &mut Context,
    ) -> Res<H> {
        let mut ctx2 = Context::new(ctx.precision).with_rounding(Rounding::Down);
        let ret =
            self.divide_internal(lhs, rhs, &mut ctx2, IntegerMode::FixedScale, &BigInt::zero())?;
        if ctx2
            .flags
            .intersects(Status::INVALID | Status::DIVIDE_BY_ZERO)
        {
            ctx.report(ctx2.flags & (Status::INVALID | Status::DIVIDE_BY_ZERO));
            return Ok(ret);
        }
        // The integer quotient must fit the caller's precision
        // exactly.
        let mut ctx2 = ctx.clone().with_blank_flags().with_unlimited_exponents();
        let ret = self.round_to_precision(&ret, &mut ctx2)?;
        if ctx2.flags.contains(Status::ROUNDED) {
            return self.signal_invalid(ctx);
        }
        Ok(ret)
    }

    pub(crate) fn remainder(&self, lhs: &Num<H>, rhs: &Num<H>, ctx: &mut Context) -> Res<H> {
        let mut ctx2 = ctx.clone().with_blank_flags();
        if let Some(ret) = self.remainder_handle_special(lhs, rhs, &mut ctx2)? {
            Self::transfer_flags(ctx, &ctx2);
            return Ok(ret);
        }
        let ret = self.divide_to_integer_zero_scale(lhs, rhs, &mut ctx2)?;
        if ctx2.flags.contains(Status::INVALID) {
            return self.signal_invalid(ctx);
        }
        let product = self.multiply(&ret, rhs, &mut Context::none())?;
        let ret = self.add(lhs, &self.negate_raw(&product), &mut ctx2)?;
        let ret = self.ensure_sign(ret, self.is_negative(lhs));
        Self::transfer_flags(ctx, &ctx2);
        Ok(ret)
    }

    pub(crate) fn remainder_near(&self, lhs: &Num<H>, rhs: &Num<H>, ctx: &mut Context) -> Res<H> {
        let mut ctx2 = ctx
            .clone()
            .with_rounding(Rounding::HalfEven)
            .with_blank_flags();
        if let Some(ret) = self.remainder_handle_special(lhs, rhs, &mut ctx2)? {
            Self::transfer_flags(ctx, &ctx2);
            return Ok(ret);
        }
        let ret =
            self.divide_internal(lhs, rhs, &mut ctx2, IntegerMode::FixedScale, &BigInt::zero())?;
        if ctx2.flags.contains(Status::INVALID) {
            return self.signal_invalid(ctx);
        }
        // The nearest-integer quotient must be exactly representable.
        let mut ctx2 = ctx2.with_blank_flags();
        let ret = self.round_to_precision(&ret, &mut ctx2)?;
        if ctx2.flags.intersects(Status::ROUNDED | Status::INVALID) {
            return self.signal_invalid(ctx);
        }
        let mut ctx2 = ctx.clone().with_blank_flags();
        let product = self.multiply(&ret, rhs, &mut Context::none())?;
        let mut ret2 = self.add(lhs, &self.negate_raw(&product), &mut ctx2)?;
        if ctx2.flags.contains(Status::INVALID) {
            return self.signal_invalid(ctx);
        }
        if self.helper.flags(&ret2).is_empty() && self.helper.mantissa(&ret2).is_zero() {
            // A zero remainder keeps the dividend's sign.
            ret2 = self.ensure_sign(ret2, self.is_negative(lhs));
        }
        Self::transfer_flags(ctx, &ctx2);
        Ok(ret2)
    }

    /// Classifies a division remainder as discarded digits for the
    /// rounding decision. `None` means rounding was required but the
    /// mode forbids it.
    fn round_to_scale_status(
        &self,
        remainder: &BigUint,
        divisor: &BigUint,
        rounding: Rounding,
    ) -> Option<(u32, bool)> {
        if remainder.is_zero() {
            return Some((0, false));
        }
        if matches!(
            rounding,
            Rounding::HalfDown | Rounding::HalfUp | Rounding::HalfEven
        ) {
            // Compare the remainder against half the divisor; only
            // the half-way distinction matters to these modes.
            let half_divisor = divisor >> 1u32;
            return Some(match remainder.cmp(&half_divisor) {
                core::cmp::Ordering::Equal if !divisor.bit(0) => (self.radix / 2, false),
                core::cmp::Ordering::Greater => (self.radix / 2, true),
                _ => (0, true),
            });
        }
        if rounding == Rounding::Unnecessary {
            return None;
        }
        Some((1, true))
    }

    /// Rounds an integer quotient with remainder to a fixed target
    /// exponent.
    #[allow(clippy::too_many_arguments)]
    fn round_to_scale(
        &self,
        mantissa: BigUint,
        remainder: &BigUint,
        divisor: &BigUint,
        desired_exponent: &BigInt,
        shift: &BigInt,
        neg: bool,
        ctx: &mut Context,
    ) -> Res<H> {
        let rounding = ctx.rounding;
        let Some((last_discarded, older_discarded)) =
            self.round_to_scale_status(remainder, divisor, rounding)
        else {
            return self.signal_invalid_with_message(ctx, "rounding was required");
        };
        let mut flags = Status::empty();
        let mut newmantissa = mantissa.clone();
        if shift.is_zero() {
            if last_discarded != 0 || older_discarded {
                flags |= Status::INEXACT | Status::ROUNDED;
                if rounding == Rounding::Unnecessary {
                    return self.signal_invalid_with_message(ctx, "rounding was required");
                }
                if self.round_given_digits(
                    last_discarded,
                    older_discarded,
                    rounding,
                    neg,
                    &newmantissa,
                ) {
                    newmantissa += 1u32;
                }
            }
        } else {
            let mut accum = self.helper.shift_accumulator_with_digits(
                mantissa.clone(),
                last_discarded,
                older_discarded,
            );
            accum.shift_right_big(shift);
            newmantissa = accum.shifted().clone();
            if !accum.discarded_digit_count().is_zero()
                || accum.last_discarded_digit() != 0
                || accum.older_discarded_digits()
            {
                if !mantissa.is_zero() {
                    flags |= Status::ROUNDED;
                }
                if accum.last_discarded_digit() != 0 || accum.older_discarded_digits() {
                    flags |= Status::INEXACT | Status::ROUNDED;
                    if rounding == Rounding::Unnecessary {
                        return self.signal_invalid_with_message(ctx, "rounding was required");
                    }
                }
                if self.round_given_accum(&accum, rounding, neg, &newmantissa) {
                    newmantissa += 1u32;
                }
            }
        }
        ctx.report(flags);
        let numflags = if neg {
            NumFlags::NEGATIVE
        } else {
            NumFlags::empty()
        };
        Ok(self
            .helper
            .create_with_flags(newmantissa, desired_exponent.clone(), numflags))
    }

    pub(crate) fn divide_internal(
        &self,
        lhs: &Num<H>,
        rhs: &Num<H>,
        ctx: &mut Context,
        integer_mode: IntegerMode,
        desired_exponent: &BigInt,
    ) -> Res<H> {
        if let Some(ret) = self.division_handle_special(lhs, rhs, ctx)? {
            return Ok(ret);
        }
        let sign_a = self.helper.sign(lhs);
        let sign_b = self.helper.sign(rhs);
        let result_neg = self.is_negative(lhs) != self.is_negative(rhs);
        if sign_b == 0 {
            if sign_a == 0 {
                return self.signal_invalid(ctx);
            }
            return self.signal_divide_by_zero(ctx, result_neg);
        }
        if sign_a == 0 {
            // Zero dividend: only the exponent needs computing.
            let numflags = if result_neg {
                NumFlags::NEGATIVE
            } else {
                NumFlags::empty()
            };
            if integer_mode == IntegerMode::FixedScale {
                return Ok(self.helper.create_with_flags(
                    BigUint::zero(),
                    desired_exponent.clone(),
                    numflags,
                ));
            }
            let exp = self.helper.exponent(lhs) - self.helper.exponent(rhs);
            let zero = self.helper.create_with_flags(BigUint::zero(), exp, numflags);
            return self.round_to_precision(&zero, ctx);
        }
        let mut mantissa_dividend = self.helper.mantissa(lhs);
        let mut mantissa_divisor = self.helper.mantissa(rhs);
        let expdiff = self.helper.exponent(lhs) - self.helper.exponent(rhs);
        let natural_exponent = expdiff.clone();
        let has_precision = ctx.precision != 0;
        if integer_mode == IntegerMode::FixedScale {
            if desired_exponent > &natural_exponent {
                // The target is coarser than the ideal exponent.
                ctx.report(Status::ROUNDED);
            }
            if expdiff <= *desired_exponent {
                let shift = desired_exponent - &expdiff;
                let (quo, rem) = mantissa_dividend.div_rem(&mantissa_divisor);
                return self.round_to_scale(
                    quo,
                    &rem,
                    &mantissa_divisor,
                    desired_exponent,
                    &shift,
                    result_neg,
                    ctx,
                );
            }
            if has_precision && &expdiff - 8 > BigInt::from(ctx.precision) {
                // 8 guard digits
                return self
                    .signal_invalid_with_message(ctx, "result can't fit the precision");
            }
            let Some(scaled) =
                self.rescale_by_exponent_diff(&mantissa_dividend, &expdiff, desired_exponent)
            else {
                return self.signal_invalid_with_message(ctx, "exponent difference too large");
            };
            let (quo, rem) = scaled.div_rem(&mantissa_divisor);
            return self.round_to_scale(
                quo,
                &rem,
                &mantissa_divisor,
                desired_exponent,
                &BigInt::zero(),
                result_neg,
                ctx,
            );
        }
        // Regular mode.
        let numflags = if result_neg {
            NumFlags::NEGATIVE
        } else {
            NumFlags::empty()
        };
        if (&mantissa_dividend % &mantissa_divisor).is_zero() {
            // Dividend is divisible by the divisor.
            let quo = &mantissa_dividend / &mantissa_divisor;
            let exact = self
                .helper
                .create_with_flags(quo, natural_exponent, numflags);
            return self.round_to_precision(&exact, ctx);
        }
        if has_precision {
            // Scale the dividend so the quotient carries one digit
            // beyond the working precision, then round once.
            let mut shift = ctx.precision;
            let dividend_precision = self.num_digits(&mantissa_dividend);
            let divisor_precision = self.num_digits(&mantissa_divisor);
            let divid = if dividend_precision <= divisor_precision {
                shift += divisor_precision - dividend_precision + 1;
                self.helper.multiply_by_radix_power(&mantissa_dividend, shift)
            } else {
                let extra = dividend_precision - divisor_precision;
                if extra <= shift {
                    shift = shift - extra + 1;
                    self.helper.multiply_by_radix_power(&mantissa_dividend, shift)
                } else {
                    shift = 0;
                    mantissa_dividend.clone()
                }
            };
            let (quo, rem) = divid.div_rem(&mantissa_divisor);
            let Some((last_discarded, older_discarded)) =
                self.round_to_scale_status(&rem, &mantissa_divisor, ctx.rounding)
            else {
                return self.signal_invalid_with_message(ctx, "rounding was required");
            };
            let natexp = &natural_exponent - BigInt::from(shift);
            let mut ctxcopy = ctx.clone().with_blank_flags();
            let retval = self.helper.create_with_flags(quo, natexp, numflags);
            let retval = self.round_with_shift(
                retval,
                last_discarded,
                older_discarded,
                None,
                false,
                &mut ctxcopy,
            )?;
            if ctxcopy.flags.contains(Status::INEXACT) {
                ctx.report(ctxcopy.flags);
                return Ok(retval);
            }
            ctx.report(ctxcopy.flags);
            if ctx.has_flags {
                ctx.flags &= !Status::ROUNDED;
            }
            let precision = if rem.is_zero() {
                None
            } else {
                Some(ctx.precision)
            };
            return self.reduce_to_ideal(&retval, ctx, precision, Some(&expdiff));
        }
        // Unlimited precision: the expansion must terminate.
        let mut adjust = BigInt::zero();
        let mut result: BigUint;
        let radix = BigUint::from(self.radix);
        let mantcmp = mantissa_dividend.cmp(&mantissa_divisor);
        if mantcmp == core::cmp::Ordering::Less {
            let dividend_precision = self.num_digits(&mantissa_dividend);
            let divisor_precision = self.num_digits(&mantissa_divisor);
            let mut scale = divisor_precision.saturating_sub(dividend_precision);
            if scale == 0 {
                scale = 1;
            }
            mantissa_dividend = self.helper.multiply_by_radix_power(&mantissa_dividend, scale);
            adjust += BigInt::from(scale);
            if mantissa_dividend < mantissa_divisor {
                mantissa_dividend *= &radix;
                adjust += 1;
            }
        } else if mantcmp == core::cmp::Ordering::Greater {
            let dividend_precision = self.num_digits(&mantissa_dividend);
            let divisor_precision = self.num_digits(&mantissa_divisor);
            let scale = dividend_precision - divisor_precision;
            let old_divisor = mantissa_divisor.clone();
            mantissa_divisor = self.helper.multiply_by_radix_power(&mantissa_divisor, scale);
            adjust -= BigInt::from(scale);
            if mantissa_dividend < mantissa_divisor {
                // Scaled one digit too far.
                if scale == 1 {
                    mantissa_divisor = old_divisor;
                } else {
                    mantissa_divisor /= &radix;
                }
                adjust += 1;
            }
        }
        if mantcmp == core::cmp::Ordering::Equal {
            result = BigUint::from(1u32);
            mantissa_dividend = BigUint::zero();
        } else {
            if !self
                .helper
                .has_terminating_radix_expansion(&mantissa_dividend, &mantissa_divisor)
            {
                return self.signal_invalid_with_message(
                    ctx,
                    "result would have a nonterminating expansion",
                );
            }
            result = BigUint::zero();
            loop {
                let (quo, rem) = mantissa_dividend.div_rem(&mantissa_divisor);
                result += quo;
                mantissa_dividend = rem;
                if mantissa_dividend.is_zero() && !adjust.is_negative() {
                    break;
                }
                adjust += 1;
                result *= &radix;
                mantissa_dividend *= &radix;
            }
        }
        // mantissa_dividend now holds the remainder.
        let exp = &expdiff - &adjust;
        let rounding = ctx.rounding;
        let mut last_discarded = 0;
        let mut older_discarded = false;
        if !mantissa_dividend.is_zero() {
            if matches!(
                rounding,
                Rounding::HalfDown | Rounding::HalfEven | Rounding::HalfUp
            ) {
                let half_divisor = &mantissa_divisor >> 1u32;
                match mantissa_dividend.cmp(&half_divisor) {
                    core::cmp::Ordering::Equal if !mantissa_divisor.bit(0) => {
                        last_discarded = self.radix / 2;
                    }
                    core::cmp::Ordering::Greater => {
                        last_discarded = self.radix / 2;
                        older_discarded = true;
                    }
                    _ => {
                        older_discarded = true;
                    }
                }
            } else {
                if rounding == Rounding::Unnecessary {
                    return self.signal_invalid_with_message(ctx, "rounding was required");
                }
                last_discarded = 1;
                older_discarded = true;
            }
        }
        if exp > expdiff {
            // The true exponent ended up above the ideal one.
            ctx.report(Status::ROUNDED);
        }
        let retval = self.helper.create_with_flags(result, exp, numflags);
        self.round_with_shift(retval, last_discarded, older_discarded, None, false, ctx)
    }
}
