//! A decorator that turns signaled conditions into errors.

use core::cmp::Ordering;
use core::fmt;

use num_bigint::BigInt;

use crate::ctx::{Context, Status};
use crate::engine::Engine;
use crate::err::{Error, TrapError};

/// Wraps an [`Engine`] so that any condition listed in the context's
/// trap mask is returned as a [`TrapError`] instead of being recorded
/// silently.
///
/// Every operation runs against a blank working context; the raised
/// flags are merged into the caller's context either way, so trapping
/// changes only how the condition is delivered, never which flags end
/// up set. When several trapped conditions fire at once, the error
/// carries the one raised first in signaling order: `UNDERFLOW`,
/// `OVERFLOW`, `INVALID`, and `DIVIDE_BY_ZERO` before `SUBNORMAL`,
/// `INEXACT`, `ROUNDED`, and `CLAMPED`.
#[derive(Clone, Debug)]
pub struct Trappable<E> {
    inner: E,
}

impl<E> Trappable<E> {
    /// Wraps an engine.
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    /// The wrapped engine.
    pub fn inner(&self) -> &E {
        &self.inner
    }
}

fn working_context(ctx: &Context) -> Context {
    ctx.clone().with_blank_flags()
}

fn trigger_traps<T: Clone + fmt::Debug>(
    result: T,
    src: &Context,
    dst: &mut Context,
) -> Result<T, Error<T>> {
    if src.flags.is_empty() {
        return Ok(result);
    }
    dst.report(src.flags);
    let trapped = dst.traps & src.flags;
    if trapped.is_empty() {
        return Ok(result);
    }
    const SIGNAL_ORDER: [Status; 8] = [
        Status::UNDERFLOW,
        Status::OVERFLOW,
        Status::INVALID,
        Status::DIVIDE_BY_ZERO,
        Status::SUBNORMAL,
        Status::INEXACT,
        Status::ROUNDED,
        Status::CLAMPED,
    ];
    for flag in SIGNAL_ORDER {
        if trapped.contains(flag) {
            return Err(Error::Trap(TrapError {
                flag,
                raised: src.flags,
                result,
            }));
        }
    }
    Ok(result)
}

macro_rules! trapping {
    ($ctx:ident, $call:expr) => {{
        let mut tctx = working_context($ctx);
        let result = {
            let $ctx = &mut tctx;
            $call?
        };
        trigger_traps(result, &tctx, $ctx)
    }};
}

impl<T, E> Engine<T> for Trappable<E>
where
    T: Clone + fmt::Debug,
    E: Engine<T>,
{
    fn add(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.add(lhs, rhs, ctx))
    }

    fn subtract(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.subtract(lhs, rhs, ctx))
    }

    fn multiply(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.multiply(lhs, rhs, ctx))
    }

    fn multiply_and_add(&self, a: &T, b: &T, c: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.multiply_and_add(a, b, c, ctx))
    }

    fn divide(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.divide(lhs, rhs, ctx))
    }

    fn divide_to_exponent(
        &self,
        lhs: &T,
        rhs: &T,
        desired_exponent: &BigInt,
        ctx: &mut Context,
    ) -> Result<T, Error<T>> {
        trapping!(
            ctx,
            self.inner.divide_to_exponent(lhs, rhs, desired_exponent, ctx)
        )
    }

    fn divide_to_integer_natural_scale(
        &self,
        lhs: &T,
        rhs: &T,
        ctx: &mut Context,
    ) -> Result<T, Error<T>> {
        trapping!(
            ctx,
            self.inner.divide_to_integer_natural_scale(lhs, rhs, ctx)
        )
    }

    fn divide_to_integer_zero_scale(
        &self,
        lhs: &T,
        rhs: &T,
        ctx: &mut Context,
    ) -> Result<T, Error<T>> {
        trapping!(
            ctx,
            self.inner.divide_to_integer_zero_scale(lhs, rhs, ctx)
        )
    }

    fn remainder(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.remainder(lhs, rhs, ctx))
    }

    fn remainder_near(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.remainder_near(lhs, rhs, ctx))
    }

    fn abs(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.abs(value, ctx))
    }

    fn negate(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.negate(value, ctx))
    }

    fn plus(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.plus(value, ctx))
    }

    fn round_to_precision(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.round_to_precision(value, ctx))
    }

    fn round_to_binary_precision(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.round_to_binary_precision(value, ctx))
    }

    fn quantize(&self, value: &T, other: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.quantize(value, other, ctx))
    }

    fn round_to_exponent_exact(
        &self,
        value: &T,
        exponent: &BigInt,
        ctx: &mut Context,
    ) -> Result<T, Error<T>> {
        trapping!(
            ctx,
            self.inner.round_to_exponent_exact(value, exponent, ctx)
        )
    }

    fn round_to_exponent_simple(
        &self,
        value: &T,
        exponent: &BigInt,
        ctx: &mut Context,
    ) -> Result<T, Error<T>> {
        trapping!(
            ctx,
            self.inner.round_to_exponent_simple(value, exponent, ctx)
        )
    }

    fn round_to_exponent_no_rounded_flag(
        &self,
        value: &T,
        exponent: &BigInt,
        ctx: &mut Context,
    ) -> Result<T, Error<T>> {
        trapping!(
            ctx,
            self.inner.round_to_exponent_no_rounded_flag(value, exponent, ctx)
        )
    }

    fn reduce(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.reduce(value, ctx))
    }

    fn square_root(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.square_root(value, ctx))
    }

    fn power(&self, base: &T, pow: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.power(base, pow, ctx))
    }

    fn exp(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.exp(value, ctx))
    }

    fn ln(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.ln(value, ctx))
    }

    fn log10(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.log10(value, ctx))
    }

    fn pi(&self, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.pi(ctx))
    }

    fn min(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.min(lhs, rhs, ctx))
    }

    fn max(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.max(lhs, rhs, ctx))
    }

    fn min_magnitude(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.min_magnitude(lhs, rhs, ctx))
    }

    fn max_magnitude(&self, lhs: &T, rhs: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.max_magnitude(lhs, rhs, ctx))
    }

    fn next_plus(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.next_plus(value, ctx))
    }

    fn next_minus(&self, value: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.next_minus(value, ctx))
    }

    fn next_toward(&self, value: &T, other: &T, ctx: &mut Context) -> Result<T, Error<T>> {
        trapping!(ctx, self.inner.next_toward(value, other, ctx))
    }

    fn compare_with_context(
        &self,
        lhs: &T,
        rhs: &T,
        treat_quiet_nans_as_signaling: bool,
        ctx: &mut Context,
    ) -> Result<T, Error<T>> {
        trapping!(
            ctx,
            self.inner
                .compare_with_context(lhs, rhs, treat_quiet_nans_as_signaling, ctx)
        )
    }

    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        self.inner.compare(lhs, rhs)
    }
}
