//! Transcendental functions computed by series expansion.
//!
//! Each series runs in a widened working context and watches
//! successive guesses: iteration stops when a guess repeats, or when
//! the guesses vacillate around the true value for long enough that
//! further terms only shuffle rounding error.

use core::cmp::Ordering;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use super::{Num, RadixMath, Res};
use crate::ctx::{Context, Rounding, Status};
use crate::helper::RadixHelper;
use crate::num::NumFlags;

/// Tracks whether successive guesses of an iterative series are still
/// converging.
struct Convergence {
    last_compare: i32,
    vacillations: u32,
}

impl Convergence {
    fn new() -> Self {
        Self {
            last_compare: 0,
            vacillations: 0,
        }
    }

    /// Feeds the comparison of the previous guess against the new one;
    /// returns false when iteration should stop. When guesses
    /// vacillate, the lower guess wins to reduce rounding error.
    fn keep_going(&mut self, cmp: Ordering) -> bool {
        let cmp = cmp as i32;
        if cmp == 0 {
            return false;
        }
        if (cmp > 0 && self.last_compare < 0) || (self.last_compare > 0 && cmp < 0) {
            self.vacillations += 1;
            if self.vacillations > 3 && cmp > 0 {
                self.last_compare = cmp;
                return false;
            }
        }
        self.last_compare = cmp;
        true
    }
}

fn power_of_two(count: u64) -> BigUint {
    BigUint::one() << count
}

impl<H: RadixHelper> RadixMath<H> {
    /// The constant pi, by the Gauss-Legendre algorithm.
    pub(crate) fn pi(&self, ctx: &mut Context) -> Res<H> {
        if ctx.precision == 0 {
            return self.signal_invalid_with_message(ctx, "ctx has unlimited precision");
        }
        let a = self.value_of(1);
        let mut ctxdiv = ctx
            .clone()
            .with_precision(ctx.precision + 10)
            .with_rounding(Rounding::ZeroFiveUp)
            .with_blank_flags();
        let two = self.value_of(2);
        let sqrt_two = self.square_root(&two, &mut ctxdiv)?;
        let mut b = self.divide(&a, &sqrt_two, &mut ctxdiv)?;
        let four = self.value_of(4);
        // For even radixes, multiplying by one half is exact.
        let half = if self.radix & 1 == 0 {
            Some(self.helper.create_with_flags(
                BigUint::from(self.radix / 2),
                -BigInt::one(),
                NumFlags::empty(),
            ))
        } else {
            None
        };
        let mut a = a;
        let mut t = self.divide(&a, &four, &mut ctxdiv)?;
        let mut conv = Convergence::new();
        let mut last_guess: Option<Num<H>> = None;
        let mut guess;
        let mut power_two = BigUint::one();
        loop {
            let aplus_b = self.add(&a, &b, &mut Context::none())?;
            let new_a = match &half {
                Some(half) => self.multiply(&aplus_b, half, &mut Context::none())?,
                None => self.divide(&aplus_b, &two, &mut ctxdiv)?,
            };
            let a_minus_new_a = self.add(&a, &self.negate_raw(&new_a), &mut Context::none())?;
            if self.compare(&a, &b) != Ordering::Equal {
                let atimes_b = self.multiply(&a, &b, &mut ctxdiv)?;
                b = self.square_root(&atimes_b, &mut ctxdiv)?;
            }
            a = new_a;
            guess = self.multiply(&aplus_b, &aplus_b, &mut Context::none())?;
            let t4 = self.multiply(&t, &four, &mut Context::none())?;
            guess = self.divide(&guess, &t4, &mut ctxdiv)?;
            let mut more = true;
            if let Some(last) = &last_guess {
                more = conv.keep_going(self.compare(last, &guess));
            }
            if !more {
                break;
            }
            let mut tmp_t = self.multiply(&a_minus_new_a, &a_minus_new_a, &mut Context::none())?;
            let pow2 = self.helper.create_with_flags(
                power_two.clone(),
                BigInt::zero(),
                NumFlags::empty(),
            );
            tmp_t = self.multiply(&tmp_t, &pow2, &mut Context::none())?;
            t = self.add(&t, &self.negate_raw(&tmp_t), &mut ctxdiv)?;
            power_two <<= 1u32;
            last_guess = Some(guess);
        }
        self.round_to_precision(&guess, ctx)
    }

    /// `-ln(value)` series for values near 1, as
    /// `z + z^2/2 + z^3/3 + ...` with `z = 1 - value`.
    fn ln_series(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        let mut ctxdiv = ctx
            .clone()
            .with_precision(ctx.precision + 6)
            .with_rounding(Rounding::ZeroFiveUp)
            .with_blank_flags();
        let z = self.add(&self.negate_raw(value), &self.value_of(1), &mut Context::none())?;
        let mut zpow = self.multiply(&z, &z, &mut ctxdiv)?;
        let mut guess = self.negate_raw(&z);
        let mut denom = BigUint::from(2u32);
        let mut conv = Convergence::new();
        loop {
            let denom_num =
                self.helper
                    .create_with_flags(denom.clone(), BigInt::zero(), NumFlags::empty());
            let tmp = self.divide(&zpow, &denom_num, &mut ctxdiv)?;
            let new_guess = self.add(&guess, &self.negate_raw(&tmp), &mut ctxdiv)?;
            let more = conv.keep_going(self.compare(&guess, &new_guess));
            guess = new_guess;
            if !more {
                break;
            }
            zpow = self.multiply(&zpow, &z, &mut ctxdiv)?;
            denom += 1u32;
        }
        self.round_to_precision(&guess, ctx)
    }

    /// The Taylor series for the exponential, for values below 1.
    fn exp_internal(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        let one = self.value_of(1);
        let mut ctxdiv = ctx
            .clone()
            .with_precision(ctx.precision + 6)
            .with_rounding(Rounding::ZeroFiveUp)
            .with_blank_flags();
        let mut bigint_n = BigUint::from(2u32);
        let mut facto = BigUint::one();
        let mut guess = self.add(&one, value, &mut Context::none())?;
        let mut pow = value.clone();
        let mut conv = Convergence::new();
        loop {
            // guess += value^n / n!
            pow = self.multiply(&pow, value, &mut ctxdiv)?;
            facto *= &bigint_n;
            let facto_num =
                self.helper
                    .create_with_flags(facto.clone(), BigInt::zero(), NumFlags::empty());
            let tmp = self.divide(&pow, &facto_num, &mut ctxdiv)?;
            let new_guess = self.add(&guess, &tmp, &mut ctxdiv)?;
            let more = conv.keep_going(self.compare(&guess, &new_guess));
            guess = new_guess;
            if !more {
                break;
            }
            bigint_n += 1u32;
        }
        self.round_to_precision(&guess, ctx)
    }

    /// Raises a finite value to an integer power by binary
    /// exponentiation.
    fn power_integral(&self, value: &Num<H>, pow: &BigInt, ctx: &mut Context) -> Res<H> {
        let one = self.value_of(1);
        if pow.is_zero() {
            // Zero to the power of zero is handled by the caller.
            return self.round_to_precision(&one, ctx);
        }
        if pow.is_one() {
            return self.round_to_precision(value, ctx);
        }
        if *pow == BigInt::from(2) {
            return self.multiply(value, value, ctx);
        }
        if *pow == BigInt::from(3) {
            let squared = self.multiply(value, value, &mut Context::none())?;
            return self.multiply(value, &squared, ctx);
        }
        let retval_neg = self.is_negative(value) && pow.is_odd();
        let error = self.num_digits(pow.magnitude()) + 6;
        let mut ctxdiv = ctx
            .clone()
            .with_precision(ctx.precision + error)
            .with_rounding(Rounding::ZeroFiveUp)
            .with_blank_flags();
        let mut value = value.clone();
        let mut pow = pow.clone();
        if pow.is_negative() {
            // Use the reciprocal for negative powers.
            value = self.divide(&one, &value, &mut ctxdiv)?;
            pow = -pow;
        }
        let mut r = one;
        while !pow.is_zero() {
            if pow.is_odd() {
                r = self.multiply(&r, &value, &mut ctxdiv)?;
                if ctxdiv.flags.contains(Status::OVERFLOW) {
                    return self.signal_overflow_with_context(ctx, retval_neg);
                }
            }
            pow >>= 1u32;
            if !pow.is_zero() {
                ctxdiv.clear_flags();
                let tmp = self.multiply(&value, &value, &mut ctxdiv)?;
                if ctxdiv.flags.contains(Status::OVERFLOW) {
                    // Squaring again would only overflow harder.
                    return self.signal_overflow_with_context(ctx, retval_neg);
                }
                value = tmp;
            }
        }
        self.round_to_precision(&r, ctx)
    }

    /// Pads a value with trailing zeros out to the working precision,
    /// marking the result inexact.
    fn extend_precision(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        if ctx.precision == 0 {
            return self.round_to_precision(value, ctx);
        }
        let mut mant = self.helper.mantissa(value);
        let digits = self.num_digits(&mant);
        let mut exponent = self.helper.exponent(value);
        if digits < ctx.precision {
            let diff = ctx.precision - digits;
            mant = self.helper.multiply_by_radix_power(&mant, diff);
            exponent -= BigInt::from(diff);
        }
        ctx.report(Status::ROUNDED | Status::INEXACT);
        let padded = self
            .helper
            .create_with_flags(mant, exponent, NumFlags::empty());
        self.round_to_precision(&padded, ctx)
    }

    /// Reports whether a value's adjusted exponent would survive the
    /// context's exponent range, for the shortcut cases of `power`.
    fn is_within_exponent_range_for_pow(&self, value: &Num<H>, ctx: &Context) -> bool {
        if !ctx.has_exponent_range {
            return true;
        }
        let digits = self.num_digits(&self.helper.mantissa(value));
        let mut adj: BigInt = self.helper.exponent(value) + BigInt::from(digits) - 1;
        if adj.is_negative() {
            adj = -(-adj / 2i32);
        }
        adj >= ctx.emin && adj <= ctx.emax
    }

    pub(crate) fn power(&self, value: &Num<H>, pow: &Num<H>, ctx: &mut Context) -> Res<H> {
        if let Some(ret) = self.handle_not_a_number(value, pow, ctx) {
            return Ok(ret);
        }
        let this_sign = self.helper.sign(value);
        let pow_sign = self.helper.sign(pow);
        let this_flags = self.helper.flags(value);
        let pow_flags = self.helper.flags(pow);
        if this_sign == 0 && pow_sign == 0 {
            return self.signal_invalid(ctx);
        }
        if this_sign < 0 && pow_flags.is_infinity() {
            return self.signal_invalid(ctx);
        }
        if this_sign > 0 && !this_flags.is_infinity() && pow_flags.is_infinity() {
            // Finite positive base with an infinite power.
            let one = self.value_of(1);
            return match self.compare(value, &one) {
                Ordering::Less => {
                    if pow_sign < 0 {
                        Ok(self.helper.create_with_flags(
                            BigUint::zero(),
                            BigInt::zero(),
                            NumFlags::INFINITY,
                        ))
                    } else {
                        let zero = self.make_finite(BigUint::zero(), BigInt::zero(), false);
                        self.round_to_precision(&zero, ctx)
                    }
                }
                Ordering::Equal => self.extend_precision(&one, ctx),
                Ordering::Greater => {
                    if pow_sign > 0 {
                        Ok(pow.clone())
                    } else {
                        let zero = self.make_finite(BigUint::zero(), BigInt::zero(), false);
                        self.round_to_precision(&zero, ctx)
                    }
                }
            };
        }
        let pow_exponent = self.helper.exponent(pow);
        let mut is_pow_integral = pow_exponent.is_positive();
        let mut is_pow_odd = false;
        let mut pow_int: Option<Num<H>> = None;
        let int_zero = self.make_finite(BigUint::zero(), BigInt::zero(), false);
        if !is_pow_integral {
            let q = self.quantize(
                pow,
                &int_zero,
                &mut Context::none().with_rounding(Rounding::Down),
            )?;
            is_pow_integral = self.compare(&q, pow) == Ordering::Equal;
            is_pow_odd = self.helper.mantissa(&q).bit(0);
            pow_int = Some(q);
        } else if self.radix % 2 == 0 {
            // A positive exponent in an even radix can never be odd.
            is_pow_odd = false;
        } else {
            let q = self.quantize(
                pow,
                &int_zero,
                &mut Context::none().with_rounding(Rounding::Down),
            )?;
            is_pow_odd = self.helper.mantissa(&q).bit(0);
            pow_int = Some(q);
        }
        let is_result_negative = this_flags.is_negative()
            && !pow_flags.is_infinity()
            && is_pow_integral
            && is_pow_odd;
        if this_sign == 0 && pow_sign != 0 {
            // 0^negative is infinity; 0^positive is zero.
            let mut flags = if pow_sign < 0 {
                NumFlags::INFINITY
            } else {
                NumFlags::empty()
            };
            if is_result_negative {
                flags |= NumFlags::NEGATIVE;
            }
            let ret = self
                .helper
                .create_with_flags(BigUint::zero(), BigInt::zero(), flags);
            if flags.is_infinity() {
                return Ok(ret);
            }
            return self.round_to_precision(&ret, ctx);
        }
        if (!is_pow_integral || pow_sign < 0) && ctx.precision == 0 {
            return self.signal_invalid_with_message(
                ctx,
                "ctx has unlimited precision and pow's exponent is not an integer or is negative",
            );
        }
        if this_sign < 0 && !is_pow_integral {
            return self.signal_invalid(ctx);
        }
        if this_flags.is_infinity() {
            let numflags = if is_result_negative {
                NumFlags::NEGATIVE
            } else {
                NumFlags::empty()
            };
            let ret = match pow_sign.cmp(&0) {
                Ordering::Greater => self.helper.create_with_flags(
                    BigUint::zero(),
                    BigInt::zero(),
                    numflags | NumFlags::INFINITY,
                ),
                Ordering::Less => {
                    self.helper
                        .create_with_flags(BigUint::zero(), BigInt::zero(), numflags)
                }
                Ordering::Equal => self.helper.create_with_flags(
                    BigUint::one(),
                    BigInt::zero(),
                    NumFlags::empty(),
                ),
            };
            return self.round_to_precision(&ret, ctx);
        }
        if pow_sign == 0 {
            let one = self
                .helper
                .create_with_flags(BigUint::one(), BigInt::zero(), NumFlags::empty());
            return self.round_to_precision(&one, ctx);
        }
        let one = self.value_of(1);
        if is_pow_integral {
            if self.compare(value, &one) == Ordering::Equal {
                if !self.is_within_exponent_range_for_pow(pow, ctx) {
                    return self.signal_invalid(ctx);
                }
                return Ok(one);
            }
            let pow_int = match pow_int {
                Some(q) => q,
                None => self.quantize(
                    pow,
                    &int_zero,
                    &mut Context::none().with_rounding(Rounding::Down),
                )?,
            };
            let mut signed_mant = BigInt::from(self.helper.mantissa(&pow_int));
            if pow_sign < 0 {
                signed_mant = -signed_mant;
            }
            return self.power_integral(value, &signed_mant, ctx);
        }
        if self.compare(value, &one) == Ordering::Equal && pow_sign > 0 {
            if !self.is_within_exponent_range_for_pow(pow, ctx) {
                return self.signal_invalid(ctx);
            }
            return self.extend_precision(&one, ctx);
        }
        // General case: value^pow = exp(ln(value) * pow).
        let mut ctxdiv = ctx
            .clone()
            .with_precision(ctx.precision + 10)
            .with_rounding(Rounding::ZeroFiveUp)
            .with_blank_flags();
        let lnresult = self.ln(value, &mut ctxdiv)?;
        let lnresult = self.multiply(&lnresult, pow, &mut Context::none())?;
        let mut ctxdiv = ctx.clone().with_blank_flags();
        let lnresult = self.exp(&lnresult, &mut ctxdiv)?;
        if ctxdiv
            .flags
            .intersects(Status::CLAMPED | Status::OVERFLOW)
        {
            if !self.is_within_exponent_range_for_pow(value, ctx) {
                return self.signal_invalid(ctx);
            }
            if !self.is_within_exponent_range_for_pow(pow, ctx) {
                return self.signal_invalid(ctx);
            }
        }
        ctx.report(ctxdiv.flags);
        Ok(lnresult)
    }

    pub(crate) fn log10(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        if ctx.precision == 0 {
            return self.signal_invalid_with_message(ctx, "ctx has unlimited precision");
        }
        let flags = self.helper.flags(value);
        if flags.contains(NumFlags::SIGNALING_NAN) {
            return Ok(self.signaling_nan_invalid(value, ctx));
        }
        if flags.contains(NumFlags::QUIET_NAN) {
            return Ok(self.return_quiet_nan(value, ctx));
        }
        let sign = self.helper.sign(value);
        if sign < 0 {
            return self.signal_invalid(ctx);
        }
        if flags.is_infinity() {
            return Ok(value.clone());
        }
        let mut ctx_copy = ctx.clone().with_blank_flags();
        let one = self.value_of(1);
        let result;
        if sign == 0 {
            // Log of zero is negative infinity.
            let neg_inf = self.helper.create_with_flags(
                BigUint::zero(),
                BigInt::zero(),
                NumFlags::NEGATIVE | NumFlags::INFINITY,
            );
            result = self.round_to_precision(&neg_inf, &mut ctx_copy)?;
        } else if self.compare(value, &one) == Ordering::Equal {
            let zero = self.make_finite(BigUint::zero(), BigInt::zero(), false);
            result = self.round_to_precision(&zero, &mut ctx_copy)?;
        } else {
            let mut shortcut = None;
            if self.radix == 10 {
                // An integer power of ten: the result is its decimal
                // exponent.
                let mut mantissa = self.helper.mantissa(value);
                let mut exp_tmp = self.helper.exponent(value);
                let ten = BigUint::from(10u32);
                loop {
                    let (bigquo, bigrem) = mantissa.div_rem(&ten);
                    if !bigrem.is_zero() {
                        break;
                    }
                    mantissa = bigquo;
                    exp_tmp += 1;
                }
                if mantissa.is_one() {
                    let numflags = if exp_tmp.is_negative() {
                        NumFlags::NEGATIVE
                    } else {
                        NumFlags::empty()
                    };
                    let (_, magnitude) = exp_tmp.into_parts();
                    let exp_value =
                        self.helper
                            .create_with_flags(magnitude, BigInt::zero(), numflags);
                    shortcut = Some(self.round_to_precision(&exp_value, &mut ctx_copy)?);
                }
            }
            result = match shortcut {
                Some(ret) => ret,
                None => {
                    let mut ctxdiv = ctx
                        .clone()
                        .with_precision(ctx.precision + 10)
                        .with_rounding(Rounding::ZeroFiveUp)
                        .with_blank_flags();
                    let ten = self.value_of(10);
                    let log_natural = self.ln(value, &mut ctxdiv)?;
                    let log_ten = self.ln(&ten, &mut ctxdiv)?;
                    self.divide(&log_natural, &log_ten, ctx)?
                }
            };
        }
        ctx.report(ctx_copy.flags);
        Ok(result)
    }

    pub(crate) fn ln(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        if ctx.precision == 0 {
            return self.signal_invalid_with_message(ctx, "ctx has unlimited precision");
        }
        let flags = self.helper.flags(value);
        if flags.contains(NumFlags::SIGNALING_NAN) {
            return Ok(self.signaling_nan_invalid(value, ctx));
        }
        if flags.contains(NumFlags::QUIET_NAN) {
            return Ok(self.return_quiet_nan(value, ctx));
        }
        let sign = self.helper.sign(value);
        if sign < 0 {
            return self.signal_invalid(ctx);
        }
        if flags.is_infinity() {
            return Ok(value.clone());
        }
        if sign == 0 {
            return Ok(self.helper.create_with_flags(
                BigUint::zero(),
                BigInt::zero(),
                NumFlags::NEGATIVE | NumFlags::INFINITY,
            ));
        }
        let mut ctx_copy = ctx.clone().with_blank_flags();
        let one = self.value_of(1);
        let mut result = value.clone();
        match self.compare(value, &one) {
            Ordering::Equal => {
                let zero = self.make_finite(BigUint::zero(), BigInt::zero(), false);
                result = self.round_to_precision(&zero, &mut ctx_copy)?;
            }
            Ordering::Less => {
                let error = self.num_digits(&self.helper.mantissa(value)) + 6;
                let mut ctxdiv = ctx
                    .clone()
                    .with_precision(ctx.precision + error)
                    .with_rounding(Rounding::ZeroFiveUp)
                    .with_blank_flags();
                let quarter = self.divide(&one, &self.value_of(4), &mut ctx_copy)?;
                if self.compare(&result, &quarter) != Ordering::Greater {
                    // Square-root the value up toward one half, then
                    // scale the series result back by 2^roots.
                    let half = self.multiply(&quarter, &self.value_of(2), &mut Context::none())?;
                    let mut roots = 0u64;
                    while self.compare(&result, &half) == Ordering::Less {
                        let mut unlimited = ctxdiv.clone().with_unlimited_exponents();
                        result = self.square_root(&result, &mut unlimited)?;
                        roots += 1;
                    }
                    result = self.ln_series(&result, &mut ctxdiv)?;
                    let scale = self.helper.create_with_flags(
                        power_of_two(roots),
                        BigInt::zero(),
                        NumFlags::empty(),
                    );
                    result = self.multiply(&result, &scale, &mut ctx_copy)?;
                } else {
                    result = self.ln_series(&result, &mut ctx_copy)?;
                }
                ctx_copy.report(Status::INEXACT | Status::ROUNDED);
            }
            Ordering::Greater => {
                let error = self.num_digits(&self.helper.mantissa(value)) + 6;
                let mut ctxdiv = ctx
                    .clone()
                    .with_precision(ctx.precision + error)
                    .with_rounding(Rounding::ZeroFiveUp)
                    .with_blank_flags();
                let two = self.value_of(2);
                if self.compare(&result, &two) != Ordering::Less {
                    let mut roots = 0u64;
                    while self.compare(&result, &two) != Ordering::Less {
                        let mut unlimited = ctxdiv.clone().with_unlimited_exponents();
                        result = self.square_root(&result, &mut unlimited)?;
                        roots += 1;
                    }
                    // ln(x) = -ln(1/x), scaled back by 2^roots.
                    result = self.divide(&one, &result, &mut ctxdiv)?;
                    result = self.ln_series(&result, &mut ctxdiv)?;
                    result = self.negate_raw(&result);
                    let scale = self.helper.create_with_flags(
                        power_of_two(roots),
                        BigInt::zero(),
                        NumFlags::empty(),
                    );
                    result = self.multiply(&result, &scale, &mut ctx_copy)?;
                } else {
                    result = self.divide(&one, &result, &mut ctxdiv)?;
                    result = self.ln_series(&result, &mut ctxdiv)?;
                    result = self.negate_raw(&result);
                    result = self.round_to_precision(&result, &mut ctx_copy)?;
                }
                ctx_copy.report(Status::INEXACT | Status::ROUNDED);
            }
        }
        ctx.report(ctx_copy.flags);
        Ok(result)
    }

    pub(crate) fn exp(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        if ctx.precision == 0 {
            return self.signal_invalid_with_message(ctx, "ctx has unlimited precision");
        }
        let flags = self.helper.flags(value);
        if flags.contains(NumFlags::SIGNALING_NAN) {
            return Ok(self.signaling_nan_invalid(value, ctx));
        }
        if flags.contains(NumFlags::QUIET_NAN) {
            return Ok(self.return_quiet_nan(value, ctx));
        }
        let mut ctx_copy = ctx.clone().with_blank_flags();
        if flags.is_infinity() {
            if flags.is_negative() {
                let zero = self.make_finite(BigUint::zero(), BigInt::zero(), false);
                let retval = self.round_to_precision(&zero, &mut ctx_copy)?;
                ctx.report(ctx_copy.flags);
                return Ok(retval);
            }
            return Ok(value.clone());
        }
        let sign = self.helper.sign(value);
        let one = self.value_of(1);
        let mut ctxdiv = ctx
            .clone()
            .with_precision(ctx.precision + 10)
            .with_rounding(Rounding::ZeroFiveUp)
            .with_blank_flags();
        let result;
        if sign == 0 {
            result = self.round_to_precision(&one, &mut ctx_copy)?;
        } else if sign < 0 {
            // exp(-x) = 1/exp(x).
            let val = self.exp(&self.negate_raw(value), &mut ctxdiv)?;
            let interim = if ctxdiv.flags.contains(Status::OVERFLOW) || !self.is_finite(&val) {
                // Overflowed, try again with unlimited exponents.
                ctxdiv.clear_flags();
                let mut unlimited = ctxdiv.clone().with_unlimited_exponents();
                self.exp(&self.negate_raw(value), &mut unlimited)?
            } else {
                val
            };
            result = self.divide(&one, &interim, &mut ctx_copy)?;
            ctx.report(Status::INEXACT | Status::ROUNDED);
        } else if self.compare(value, &one) == Ordering::Less {
            result = self.exp_internal(value, &mut ctx_copy)?;
            ctx.report(Status::INEXACT | Status::ROUNDED);
        } else {
            // exp(x) = exp(1 + frac/int)^int for x >= 1.
            let intpart = self.quantize(
                value,
                &one,
                &mut Context::none().with_rounding(Rounding::Down),
            )?;
            let fracpart = self.add(value, &self.negate_raw(&intpart), &mut Context::none())?;
            let quotient = self.divide(&fracpart, &intpart, &mut ctxdiv)?;
            let fracpart = self.add(&one, &quotient, &mut Context::none())?;
            ctxdiv.clear_flags();
            let interim = self.exp_internal(&fracpart, &mut ctxdiv)?;
            if ctxdiv.flags.contains(Status::UNDERFLOW) {
                ctx.report(ctxdiv.flags);
            }
            ctx.report(Status::INEXACT | Status::ROUNDED);
            let int_mant = BigInt::from(self.helper.mantissa(&intpart));
            let powered = self.power_integral(&interim, &int_mant, &mut ctxdiv)?;
            if ctxdiv.flags.contains(Status::OVERFLOW) {
                ctx.report(ctxdiv.flags);
            }
            result = self.round_to_precision(&powered, &mut ctx_copy)?;
        }
        ctx.report(ctx_copy.flags);
        Ok(result)
    }

    fn square_root_handle_special(
        &self,
        value: &Num<H>,
        ctx: &mut Context,
    ) -> Result<Option<Num<H>>, crate::err::Error<Num<H>>> {
        let flags = self.helper.flags(value);
        if flags.is_special() {
            if flags.contains(NumFlags::SIGNALING_NAN) {
                return Ok(Some(self.signaling_nan_invalid(value, ctx)));
            }
            if flags.contains(NumFlags::QUIET_NAN) {
                return Ok(Some(self.return_quiet_nan(value, ctx)));
            }
            if flags.is_infinity() {
                if flags.is_negative() {
                    return self.signal_invalid(ctx).map(Some);
                }
                return Ok(Some(value.clone()));
            }
        }
        if self.helper.sign(value) < 0 {
            return self.signal_invalid(ctx).map(Some);
        }
        Ok(None)
    }

    pub(crate) fn square_root(&self, value: &Num<H>, ctx: &mut Context) -> Res<H> {
        if ctx.precision == 0 {
            return self.signal_invalid_with_message(ctx, "ctx has unlimited precision");
        }
        if let Some(ret) = self.square_root_handle_special(value, ctx)? {
            return Ok(ret);
        }
        let mut ctxtmp = ctx.clone().with_blank_flags();
        let orig_exp = self.helper.exponent(value);
        let mut current_exp = orig_exp.clone();
        // The ideal exponent is half the input's, rounded toward
        // negative infinity.
        let mut ideal_exp = &current_exp / 2;
        if current_exp.is_negative() && current_exp.is_odd() {
            ideal_exp -= 1;
        }
        if self.helper.sign(value) == 0 {
            let zero = self.helper.create_with_flags(
                BigUint::zero(),
                ideal_exp,
                self.helper.flags(value),
            );
            let ret = self.round_to_precision(&zero, &mut ctxtmp)?;
            ctx.report(ctxtmp.flags);
            return Ok(ret);
        }
        let mut mantissa = self.helper.mantissa(value);
        let digit_count = self.num_digits(&mantissa);
        let target_precision = ctx.precision;
        let precision = target_precision * 2 + 2;
        let mut rounded = false;
        let mut inexact = false;
        if digit_count < precision {
            let mut diff = precision - digit_count;
            // Keep the scaled exponent even so halving it is exact.
            if (diff & 1 == 1) ^ orig_exp.is_odd() {
                diff += 1;
            }
            current_exp -= BigInt::from(diff);
            mantissa = self.helper.multiply_by_radix_power(&mantissa, diff);
        }
        let root = mantissa.sqrt();
        let remainder = &mantissa - &root * &root;
        mantissa = root;
        if !remainder.is_zero() {
            rounded = true;
            inexact = true;
        }
        let oldexp = current_exp.clone();
        current_exp /= 2;
        if oldexp.is_negative() && oldexp.is_odd() {
            current_exp -= 1;
        }
        let guess = self
            .helper
            .create_with_flags(mantissa, current_exp, NumFlags::empty());
        let mut retval = self.round_with_shift(guess, 0, inexact, None, false, &mut ctxtmp)?;
        let current_exp = self.helper.exponent(&retval);
        if !ctxtmp.flags.contains(Status::UNDERFLOW)
            && (current_exp <= ideal_exp || !self.is_finite(&retval))
        {
            let reduce_precision = if inexact {
                Some(target_precision)
            } else {
                None
            };
            retval = if ctx.has_exponent_range {
                self.reduce_to_ideal(&retval, &mut ctxtmp, reduce_precision, Some(&ideal_exp))?
            } else {
                self.reduce_to_ideal(
                    &retval,
                    &mut Context::none(),
                    reduce_precision,
                    Some(&ideal_exp),
                )?
            };
        }
        if ctx.clamp
            && self.helper.exponent(&retval) != ideal_exp
            && !ctxtmp.flags.contains(Status::INEXACT)
        {
            ctx.report(Status::CLAMPED);
        }
        if ctxtmp.flags.contains(Status::OVERFLOW) {
            rounded = true;
        }
        let current_exp = self.helper.exponent(&retval);
        if rounded || current_exp > ideal_exp {
            ctxtmp.flags |= Status::ROUNDED;
        } else {
            ctxtmp.flags &= !Status::ROUNDED;
        }
        if inexact {
            ctxtmp.flags |= Status::ROUNDED | Status::INEXACT;
        }
        ctx.report(ctxtmp.flags);
        Ok(retval)
    }
}
