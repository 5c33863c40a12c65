use core::fmt;

use thiserror::Error;

use crate::ctx::Status;

/// The error type for arithmetic operations.
#[derive(Debug, Error)]
pub enum Error<T: fmt::Debug> {
    /// The representation supports only finite numbers and the
    /// result would be an infinity or NaN.
    #[error("result is not finite: {0}")]
    NotFinite(&'static str),
    /// A trapped condition fired.
    #[error(transparent)]
    Trap(#[from] TrapError<T>),
}

/// Raised when an operation signals a condition in the context's
/// trap mask.
///
/// Carries the full set of raised conditions and the result the
/// operation would otherwise have returned.
#[derive(Debug, Error)]
#[error("{} condition trapped", .flag.describe())]
pub struct TrapError<T: fmt::Debug> {
    /// The highest-priority trapped condition.
    pub flag: Status,
    /// Every condition the operation raised.
    pub raised: Status,
    /// The result the operation would have returned.
    pub result: T,
}
