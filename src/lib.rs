//! `arbfp` is an arbitrary-precision floating-point arithmetic engine
//! that is generic over the radix of the number representation.
//!
//! The semantics follow IEEE 754-2008 (and its predecessor IEEE 854):
//! signed zeros, infinities, quiet and signaling NaNs, nine rounding
//! modes, gradual underflow to subnormals, exponent clamping, and
//! status flags for every signaled condition.
//!
//! # Overview
//!
//! - [`RadixMath`] implements every [`Engine`] operation over any
//!   [`RadixHelper`], which describes a number representation: its
//!   radix, how to read a value's sign, mantissa, and exponent, and
//!   how to shift digits.
//! - [`Plain`] and [`PlainHelper`] provide a ready-made bignum
//!   representation for any radix.
//! - [`Context`] carries the working precision, rounding mode, and
//!   exponent range into each operation and collects [`Status`] flags
//!   out of it.
//! - [`Trappable`] wraps an engine so that conditions in the context's
//!   trap mask come back as [`TrapError`]s instead of silent flags.
//!
//! # Example
//!
//! ```
//! use arbfp::{Context, Engine, PlainHelper, RadixHelper, RadixMath, Status};
//!
//! let math = RadixMath::new(PlainHelper::decimal());
//! let mut ctx = Context::new(9);
//! let a = math.helper().value_of(1);
//! let b = math.helper().value_of(3);
//! let third = math.divide(&a, &b, &mut ctx)?;
//! assert_eq!(third.to_string(), "333333333E-9");
//! assert!(ctx.flags().contains(Status::INEXACT));
//! # Ok::<(), arbfp::Error<arbfp::Plain>>(())
//! ```

#![deny(unsafe_code)]

mod ctx;
mod engine;
mod err;
mod helper;
mod num;
mod plain;
mod rmath;
mod shift;
mod trap;

pub use ctx::{Context, Rounding, Status};
pub use engine::Engine;
pub use err::{Error, TrapError};
pub use helper::{RadixHelper, ShiftAccumulator};
pub use num::{ArithmeticSupport, NumFlags};
pub use plain::{Plain, PlainHelper};
pub use rmath::RadixMath;
pub use shift::DigitShiftAccumulator;
pub use trap::Trappable;
