//! Precision rounding: the single code path every operation funnels
//! its raw result through.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use super::{Num, RadixMath, Res};
use crate::ctx::{Context, Rounding, Status};
use crate::helper::{RadixHelper, ShiftAccumulator};
use crate::num::NumFlags;

impl<H: RadixHelper> RadixMath<H> {
    pub(crate) fn round_to_precision(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        self.round_internal(value.clone(), 0, false, None, false, false, ctx)
    }

    /// Rounds like [`round_to_precision`][Self::round_to_precision],
    /// but also normalizes a negative zero to positive (except under
    /// Floor rounding).
    pub(crate) fn plus(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        self.round_internal(value.clone(), 0, false, None, false, true, ctx)
    }

    /// Rounds so the mantissa fits in `precision` *bits* rather than
    /// digits.
    pub(crate) fn round_to_binary_precision(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        self.round_internal(value.clone(), 0, false, None, true, false, ctx)
    }

    pub(crate) fn round_with_shift(
        &self,
        value: Num<H>,
        last_discarded: u32,
        older_discarded: bool,
        shift: Option<&BigInt>,
        adjust_negative_zero: bool,
        ctx: &mut Context,
    ) -> Res<H> {
        self.round_internal(
            value,
            last_discarded,
            older_discarded,
            shift,
            false,
            adjust_negative_zero,
            ctx,
        )
    }

    /// Whether an overflow under `rounding` saturates to the largest
    /// finite value instead of producing an infinity.
    fn overflow_saturates(rounding: Rounding, neg: bool) -> bool {
        matches!(rounding, Rounding::Down | Rounding::ZeroFiveUp)
            || (rounding == Rounding::Ceiling && neg)
            || (rounding == Rounding::Floor && !neg)
    }

    /// The largest finite value for the working precision, used when
    /// an overflow saturates.
    fn saturated_overflow(
        &self,
        binary_prec: bool,
        max_mantissa: &BigUint,
        fast_precision: u64,
        emax: &BigInt,
        neg: bool,
    ) -> Num<H> {
        let overflow_mant = if binary_prec {
            max_mantissa.clone()
        } else {
            let mut m = self.helper.multiply_by_radix_power(&BigUint::one(), fast_precision);
            m -= BigUint::one();
            m
        };
        let clamp = emax + 1 - BigInt::from(fast_precision);
        let flags = if neg {
            NumFlags::NEGATIVE
        } else {
            NumFlags::empty()
        };
        self.helper.create_with_flags(overflow_mant, clamp, flags)
    }

    /// Rounds `value` to the context's precision and exponent range,
    /// folding in digits already discarded by the caller and an
    /// optional right shift applied before rounding.
    pub(crate) fn round_internal(
        &self,
        mut value: Num<H>,
        last_discarded: u32,
        older_discarded: bool,
        shift: Option<&BigInt>,
        mut binary_prec: bool,
        adjust_negative_zero: bool,
        ctx: &mut Context,
    ) -> Res<H> {
        let shift_zero = shift.map_or(true, Zero::is_zero);
        let seeded = last_discarded != 0 || older_discarded;
        if ctx.precision == 0 && !ctx.has_exponent_range && !seeded && shift_zero {
            return Ok(value);
        }
        let mut this_flags = self.helper.flags(&value);
        if this_flags.is_special() {
            if this_flags.contains(NumFlags::SIGNALING_NAN) {
                ctx.report(Status::INVALID);
                return Ok(self.return_quiet_nan(&value, ctx));
            }
            if this_flags.contains(NumFlags::QUIET_NAN) {
                return Ok(self.return_quiet_nan(&value, ctx));
            }
            return Ok(value);
        }
        let mut fast_precision = ctx.precision;
        if self.radix == 2 || fast_precision == 0 {
            // Bit precision equals digit precision here.
            binary_prec = false;
        }
        let rounding = ctx.rounding;
        let unlimited_prec = fast_precision == 0;
        let has_range = ctx.has_exponent_range;
        let emax = ctx.emax.clone();
        let emin = ctx.emin.clone();
        let mut accum: Option<H::Accum> = None;
        if !binary_prec && fast_precision > 0 && shift_zero {
            // Fast path: the mantissa may already fit.
            let mut mantabs = self.helper.mantissa(&value);
            let neg_zero = adjust_negative_zero
                && this_flags.is_negative()
                && mantabs.is_zero()
                && rounding != Rounding::Floor;
            if neg_zero {
                value = self.ensure_sign(value, false);
                this_flags = NumFlags::empty();
            }
            let acc = self.helper.shift_accumulator_with_digits(
                mantabs.clone(),
                last_discarded,
                older_discarded,
            );
            let digit_count = acc.digit_length();
            if digit_count <= fast_precision {
                let neg = this_flags.is_negative();
                if !self.round_given_digits(last_discarded, older_discarded, rounding, neg, &mantabs)
                {
                    if seeded {
                        ctx.report(Status::INEXACT | Status::ROUNDED);
                    }
                    if !has_range {
                        return Ok(value);
                    }
                    let bigexp = self.helper.exponent(&value);
                    let adjusted = &bigexp + BigInt::from(fast_precision) - 1;
                    let normal_min = &emin + BigInt::from(fast_precision) - 1;
                    if adjusted <= emax && adjusted >= normal_min {
                        return Ok(value);
                    }
                } else {
                    if seeded {
                        ctx.report(Status::INEXACT | Status::ROUNDED);
                    }
                    mantabs += BigUint::one();
                    let still_within_precision = if digit_count < fast_precision {
                        true
                    } else {
                        let limit =
                            self.helper.multiply_by_radix_power(&BigUint::one(), fast_precision);
                        mantabs < limit
                    };
                    if still_within_precision {
                        let bigexp = self.helper.exponent(&value);
                        if !has_range {
                            return Ok(self.helper.create_with_flags(mantabs, bigexp, this_flags));
                        }
                        let adjusted = &bigexp + BigInt::from(fast_precision) - 1;
                        let normal_min = &emin + BigInt::from(fast_precision) - 1;
                        if adjusted <= emax && adjusted >= normal_min {
                            return Ok(self.helper.create_with_flags(
                                mantabs, bigexp, this_flags,
                            ));
                        }
                    }
                }
            }
            accum = Some(acc);
        }
        if adjust_negative_zero
            && this_flags.is_negative()
            && self.helper.mantissa(&value).is_zero()
            && rounding != Rounding::Floor
        {
            value = self.ensure_sign(value, false);
            this_flags = NumFlags::empty();
        }
        let neg = this_flags.is_negative();
        let oldmantissa = self.helper.mantissa(&value);
        let mantissa_was_zero = oldmantissa.is_zero() && !seeded;
        let mut exp = self.helper.exponent(&value);
        let mut flags = Status::empty();
        let mut accum = match accum {
            Some(acc) => acc,
            None => self.helper.shift_accumulator_with_digits(
                oldmantissa.clone(),
                last_discarded,
                older_discarded,
            ),
        };
        let mut max_mantissa = BigUint::one();
        if binary_prec {
            max_mantissa = (BigUint::one() << fast_precision) - BigUint::one();
            // Work in digits of this radix from here on.
            fast_precision = self.num_digits(&max_mantissa);
        }
        if let Some(s) = shift {
            if !s.is_zero() {
                accum.shift_right_big(s);
            }
        }
        if unlimited_prec {
            fast_precision = accum.digit_length();
        } else {
            accum.shift_to_digits(fast_precision);
        }
        if binary_prec {
            while accum.shifted() > &max_mantissa {
                accum.shift_right(1);
            }
        }
        let discarded_bits = accum.discarded_digit_count().clone();
        exp += &discarded_bits;
        let mut adj_exponent: BigInt = &exp + BigInt::from(accum.digit_length()) - 1;
        if binary_prec && has_range && adj_exponent == emax {
            // On the boundary the digit count alone can't tell
            // whether the mantissa still fits the bit budget.
            let expdiff = fast_precision.saturating_sub(accum.digit_length());
            let curr = self.helper.multiply_by_radix_power(accum.shifted(), expdiff);
            if curr > max_mantissa {
                adj_exponent += 1;
            }
        }
        let mut new_adj_exponent = adj_exponent.clone();
        let mut early_rounded = BigUint::zero();
        if ctx.has_flags && has_range && !unlimited_prec && adj_exponent < emin {
            // Round a copy early to tell whether rounding carries
            // the value up out of the subnormal range.
            early_rounded = accum.shifted().clone();
            if self.round_given_accum(&accum, rounding, neg, &early_rounded) {
                early_rounded += BigUint::one();
                if !early_rounded.bit(0) || self.radix & 1 != 0 {
                    let mut new_digit_length = self.num_digits(&early_rounded);
                    if binary_prec || new_digit_length > fast_precision {
                        new_digit_length = fast_precision;
                    }
                    new_adj_exponent = &exp + BigInt::from(new_digit_length) - 1;
                }
            }
        }
        if has_range && adj_exponent > emax {
            if mantissa_was_zero {
                ctx.report(flags | Status::CLAMPED);
                let mut fast_emax = emax;
                if ctx.clamp {
                    let clamp_exp = &fast_emax + 1 - BigInt::from(fast_precision);
                    if fast_emax > clamp_exp {
                        ctx.report(Status::CLAMPED);
                        fast_emax = clamp_exp;
                    }
                }
                return Ok(self.helper.create_with_flags(oldmantissa, fast_emax, this_flags));
            }
            // Overflow.
            flags |= Status::OVERFLOW | Status::INEXACT | Status::ROUNDED;
            if rounding == Rounding::Unnecessary {
                return self.signal_invalid_with_message(ctx, "rounding was required");
            }
            if !unlimited_prec && Self::overflow_saturates(rounding, neg) {
                ctx.report(flags);
                return Ok(self.saturated_overflow(
                    binary_prec,
                    &max_mantissa,
                    fast_precision,
                    &emax,
                    neg,
                ));
            }
            ctx.report(flags);
            return self.signal_overflow(neg);
        }
        if has_range && adj_exponent < emin {
            // Subnormal.
            let fast_etiny = &emin - BigInt::from(fast_precision) + 1;
            if ctx.has_flags && !early_rounded.is_zero() && new_adj_exponent < emin {
                flags |= Status::SUBNORMAL;
            }
            if exp < fast_etiny {
                let expdiff = &fast_etiny - &exp + &discarded_bits;
                let mut accum2 = self.helper.shift_accumulator_with_digits(
                    oldmantissa.clone(),
                    last_discarded,
                    older_discarded,
                );
                accum2.shift_right_big(&expdiff);
                let mut newmantissa = accum2.shifted().clone();
                let inexact =
                    accum2.last_discarded_digit() != 0 || accum2.older_discarded_digits();
                if inexact && rounding == Rounding::Unnecessary {
                    return self.signal_invalid_with_message(ctx, "rounding was required");
                }
                if !accum2.discarded_digit_count().is_zero() || inexact {
                    if !mantissa_was_zero {
                        flags |= Status::ROUNDED;
                    }
                    if inexact {
                        flags |= Status::INEXACT | Status::ROUNDED;
                    }
                    if self.round_given_accum(&accum2, rounding, neg, &newmantissa) {
                        newmantissa += BigUint::one();
                    }
                }
                if newmantissa.is_zero() {
                    flags |= Status::CLAMPED;
                }
                if flags.contains(Status::SUBNORMAL | Status::INEXACT) {
                    flags |= Status::UNDERFLOW | Status::ROUNDED;
                }
                ctx.report(flags);
                let mut etiny = fast_etiny;
                if ctx.clamp {
                    let clamp_exp = &emax + 1 - BigInt::from(fast_precision);
                    if etiny > clamp_exp {
                        if !newmantissa.is_zero() {
                            let Some(m) =
                                self.rescale_by_exponent_diff(&newmantissa, &etiny, &clamp_exp)
                            else {
                                return self.signal_invalid_with_message(
                                    ctx,
                                    "exponent difference too large",
                                );
                            };
                            newmantissa = m;
                        }
                        ctx.report(Status::CLAMPED);
                        etiny = clamp_exp;
                    }
                }
                let newflags = if neg {
                    NumFlags::NEGATIVE
                } else {
                    NumFlags::empty()
                };
                return Ok(self.helper.create_with_flags(newmantissa, etiny, newflags));
            }
        }
        let mut recheck_overflow = false;
        let mut bigmantissa = oldmantissa;
        if !accum.discarded_digit_count().is_zero()
            || accum.last_discarded_digit() != 0
            || accum.older_discarded_digits()
        {
            if !bigmantissa.is_zero() {
                flags |= Status::ROUNDED;
            }
            bigmantissa = accum.shifted().clone();
            if accum.last_discarded_digit() != 0 || accum.older_discarded_digits() {
                flags |= Status::INEXACT | Status::ROUNDED;
                if rounding == Rounding::Unnecessary {
                    return self.signal_invalid_with_message(ctx, "rounding was required");
                }
            }
            if self.round_given_accum(&accum, rounding, neg, &bigmantissa) {
                let old_digit_length = accum.digit_length();
                bigmantissa += BigUint::one();
                if binary_prec {
                    recheck_overflow = true;
                }
                // The increment may have grown the mantissa past the
                // precision.
                if !unlimited_prec
                    && (!bigmantissa.bit(0) || self.radix & 1 != 0)
                    && (binary_prec || old_digit_length >= fast_precision)
                {
                    let mut accum2 = self.helper.shift_accumulator(bigmantissa.clone());
                    let new_digit_length = accum2.digit_length();
                    if binary_prec || new_digit_length > fast_precision {
                        let needed_shift = new_digit_length.saturating_sub(fast_precision);
                        accum2.shift_right(needed_shift);
                        if binary_prec {
                            while accum2.shifted() > &max_mantissa {
                                accum2.shift_right(1);
                            }
                        }
                        if !accum2.discarded_digit_count().is_zero() {
                            let dropped = accum2.discarded_digit_count().clone();
                            exp += &dropped;
                            bigmantissa = accum2.shifted().clone();
                            if !binary_prec {
                                recheck_overflow = true;
                            }
                        }
                    }
                    accum = accum2;
                }
            }
        }
        if recheck_overflow && has_range {
            adj_exponent = &exp + BigInt::from(accum.digit_length()) - 1;
            if binary_prec && adj_exponent == emax {
                let expdiff = fast_precision.saturating_sub(accum.digit_length());
                let curr = self.helper.multiply_by_radix_power(accum.shifted(), expdiff);
                if curr > max_mantissa {
                    adj_exponent += 1;
                }
            }
            if adj_exponent > emax {
                flags |= Status::OVERFLOW | Status::INEXACT | Status::ROUNDED;
                if !unlimited_prec && Self::overflow_saturates(rounding, neg) {
                    ctx.report(flags);
                    return Ok(self.saturated_overflow(
                        binary_prec,
                        &max_mantissa,
                        fast_precision,
                        &emax,
                        neg,
                    ));
                }
                ctx.report(flags);
                return self.signal_overflow(neg);
            }
        }
        ctx.report(flags);
        if ctx.clamp && has_range {
            let clamp_exp = &emax + 1 - BigInt::from(fast_precision);
            if exp > clamp_exp {
                if !bigmantissa.is_zero() {
                    let Some(m) = self.rescale_by_exponent_diff(&bigmantissa, &exp, &clamp_exp)
                    else {
                        return self
                            .signal_invalid_with_message(ctx, "exponent difference too large");
                    };
                    bigmantissa = m;
                }
                ctx.report(Status::CLAMPED);
                exp = clamp_exp;
            }
        }
        let newflags = if neg {
            NumFlags::NEGATIVE
        } else {
            NumFlags::empty()
        };
        Ok(self.helper.create_with_flags(bigmantissa, exp, newflags))
    }

    // ---- rescaling operations -----------------------------------

    pub(crate) fn quantize(
        &self,
        value: &Num<H>,
        other: &Num<H>,
        ctx: &mut Context,
    ) -> Res<H> {
        let this_flags = self.helper.flags(value);
        let other_flags = self.helper.flags(other);
        if (this_flags | other_flags).is_special() {
            if let Some(result) = self.handle_not_a_number(value, other, ctx) {
                return Ok(result);
            }
            if (this_flags & other_flags).is_infinity() {
                return self.round_to_precision(value, ctx);
            }
            if (this_flags | other_flags).is_infinity() {
                return self.signal_invalid(ctx);
            }
        }
        let exp_other = self.helper.exponent(other);
        if !ctx.exponent_within_range(&exp_other) {
            return self.signal_invalid_with_message(ctx, "exponent not within exponent range");
        }
        let mut tmpctx = ctx.clone().with_blank_flags();
        let mant_this = self.helper.mantissa(value);
        let exp_this = self.helper.exponent(value);
        let negative = this_flags.is_negative();
        let ret = if exp_this == exp_other {
            self.round_to_precision(value, &mut tmpctx)?
        } else if mant_this.is_zero() {
            let zero = self.helper.create_with_flags(
                BigUint::zero(),
                exp_other.clone(),
                this_flags & NumFlags::NEGATIVE,
            );
            self.round_to_precision(&zero, &mut tmpctx)?
        } else if exp_this > exp_other {
            let radix_power = &exp_this - &exp_other;
            if tmpctx.precision > 0 && radix_power > BigInt::from(tmpctx.precision) + 10 {
                // The rescaled mantissa can't possibly fit.
                return self
                    .signal_invalid_with_message(ctx, "result too high for current precision");
            }
            let Some(mant) = self.rescale_by_exponent_diff(&mant_this, &exp_this, &exp_other)
            else {
                return self.signal_invalid_with_message(ctx, "exponent difference too large");
            };
            let scaled = self.helper.create_with_flags(
                mant,
                exp_other.clone(),
                this_flags & NumFlags::NEGATIVE,
            );
            self.round_to_precision(&scaled, &mut tmpctx)?
        } else {
            let shift = &exp_other - &exp_this;
            self.round_with_shift(value.clone(), 0, false, Some(&shift), false, &mut tmpctx)?
        };
        if tmpctx.flags.contains(Status::OVERFLOW) {
            return self.signal_invalid(ctx);
        }
        if self.helper.exponent(&ret) != exp_other {
            return self.signal_invalid(ctx);
        }
        let ret = self.ensure_sign(ret, negative);
        ctx.report(tmpctx.flags & !Status::UNDERFLOW);
        Ok(ret)
    }

    pub(crate) fn round_to_exponent_exact(
        &self,
        value: &Num<H>,
        exp_other: &BigInt,
        ctx: &mut Context,
    ) -> Res<H> {
        if self.helper.exponent(value) >= *exp_other {
            return self.round_to_precision(value, ctx);
        }
        let mut pctx = ctx.clone().with_precision(0).with_blank_flags();
        let target =
            self.helper
                .create_with_flags(BigUint::one(), exp_other.clone(), NumFlags::empty());
        let ret = self.quantize(value, &target, &mut pctx)?;
        ctx.report(pctx.flags);
        Ok(ret)
    }

    pub(crate) fn round_to_exponent_simple(
        &self,
        value: &Num<H>,
        exp_other: &BigInt,
        ctx: &mut Context,
    ) -> Res<H> {
        let this_flags = self.helper.flags(value);
        if this_flags.is_special() {
            if let Some(result) = self.handle_not_a_number(value, value, ctx) {
                return Ok(result);
            }
            if this_flags.is_infinity() {
                return Ok(value.clone());
            }
        }
        if self.helper.exponent(value) >= *exp_other {
            return self.round_to_precision(value, ctx);
        }
        if !ctx.exponent_within_range(exp_other) {
            return self.signal_invalid_with_message(ctx, "exponent not within exponent range");
        }
        let bigmantissa = self.helper.mantissa(value);
        let shift = exp_other - self.helper.exponent(value);
        let mut accum = self.helper.shift_accumulator(bigmantissa);
        accum.shift_right_big(&shift);
        let shifted = self.helper.create_with_flags(
            accum.shifted().clone(),
            exp_other.clone(),
            this_flags,
        );
        self.round_with_shift(
            shifted,
            accum.last_discarded_digit(),
            accum.older_discarded_digits(),
            None,
            false,
            ctx,
        )
    }

    pub(crate) fn round_to_exponent_no_rounded_flag(
        &self,
        value: &Num<H>,
        exponent: &BigInt,
        ctx: &mut Context,
    ) -> Res<H> {
        let mut pctx = ctx.clone().with_blank_flags();
        let ret = self.round_to_exponent_exact(value, exponent, &mut pctx)?;
        ctx.report(pctx.flags & !(Status::INEXACT | Status::ROUNDED));
        Ok(ret)
    }

    pub(crate) fn reduce(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        self.reduce_to_ideal(value, ctx, None, None)
    }

    /// Rounds, then strips trailing zero digits from the mantissa,
    /// stopping at `precision` digits or at the ideal exponent.
    pub(crate) fn reduce_to_ideal(
        &self,
        value: &Num<H>,
        ctx: &mut Context,
        precision: Option<u64>,
        ideal_exp: Option<&BigInt>,
    ) -> Res<H> {
        let ret = self.round_to_precision(value, ctx)?;
        if self.helper.flags(&ret).is_special() {
            return Ok(ret);
        }
        let mut bigmant = self.helper.mantissa(&ret);
        let mut exp = self.helper.exponent(&ret);
        if bigmant.is_zero() {
            exp = BigInt::zero();
        } else {
            let mut digits = precision.map(|_| self.num_digits(&bigmant));
            let bigradix = BigUint::from(self.radix);
            while !bigmant.is_zero() {
                if let (Some(d), Some(p)) = (digits, precision) {
                    if d == p {
                        break;
                    }
                }
                if let Some(ideal) = ideal_exp {
                    if exp == *ideal {
                        break;
                    }
                }
                let (bigquo, bigrem) = bigmant.div_rem(&bigradix);
                if !bigrem.is_zero() {
                    break;
                }
                bigmant = bigquo;
                exp += 1;
                if let Some(d) = digits.as_mut() {
                    *d -= 1;
                }
            }
        }
        let flags = self.helper.flags(value);
        let mut ret = self.helper.create_with_flags(bigmant, exp, flags);
        if ctx.clamp {
            let mut ctxtmp = ctx.clone().with_blank_flags();
            ret = self.round_to_precision(&ret, &mut ctxtmp)?;
            ctx.report(ctxtmp.flags & !Status::CLAMPED);
        }
        Ok(self.ensure_sign(ret, flags.is_negative()))
    }
}
