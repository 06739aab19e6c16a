//! Underlying error types used over the transaction assembler crates.
//!
//! Every component crate keeps its own detailed error enum and converts it
//! into the top-level [`Error`] tagged with an [`ErrorKind`].

use std::{error::Error as StdError, fmt, ops::Deref, sync::Arc};

mod internal;
pub mod prelude;
pub mod util;


use derive_more::Display;
pub use internal::{InternalError, InternalErrorKind, OtherError};
use prelude::*;

/// A wrapper around a dynamic error type.
#[derive(Debug, Clone)]
pub struct AnyError(Arc<anyhow::Error>);

/// A list specifying categories of assembler error.
///
/// This list is intended to grow over time and it is not recommended to exhaustively match against
/// it.
///
/// It is used with [`Error`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Display)]
pub enum ErrorKind {
    /// The underlying error is a `WitnessError` raised by the witness codec.
    Witness,
    /// The underlying error is a `CellCollectorError` raised while paging live cells.
    CellCollector,
    /// The underlying error is a `TxBuilderError` raised by the transaction builder.
    TxBuilder,
    /// The underlying error is a `TransactionSignerError` raised while signing script groups.
    Signer,
    /// The underlying error is a `ConfigError` raised while loading configuration files.
    Config,
    /// The underlying error is an [`InternalError`].
    Internal,
}

def_error_base_on_kind!(Error, ErrorKind, "Top-level assembler error type.");

impl<E> From<E> for AnyError
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self(Arc::new(error.into()))
    }
}

impl Deref for AnyError {
    type Target = Arc<anyhow::Error>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for AnyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}
