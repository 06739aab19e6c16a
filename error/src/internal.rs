use crate::{Error, ErrorKind, def_error_base_on_kind};
use derive_more::Display;

/// An error with only a string as the reason.
#[derive(thiserror::Error, Debug, Clone)]
#[error("{0}")]
pub struct OtherError(String);

/// A list specifying categories of internal error.
///
/// It is used with [`InternalError`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
pub enum InternalErrorKind {
    /// An arithmetic overflow occurs during capacity calculation,
    /// e.g. summing the capacities of collected inputs
    CapacityOverflow,

    /// A component reached a state it should never be in
    Unreachable,

    /// Other system error
    Other,
}

def_error_base_on_kind!(InternalError, InternalErrorKind, "Internal error.");

impl From<InternalError> for Error {
    fn from(error: InternalError) -> Self {
        ErrorKind::Internal.because(error)
    }
}

impl From<InternalErrorKind> for Error {
    fn from(kind: InternalErrorKind) -> Self {
        Into::<InternalError>::into(kind).into()
    }
}

impl OtherError {
    /// Creates an error with only a string as the reason.
    pub fn new<T>(reason: T) -> Self
    where
        T: ToString,
    {
        Self(reason.to_string())
    }
}
