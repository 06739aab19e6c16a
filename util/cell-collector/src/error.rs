use ckb_assembler_error::{Error, ErrorKind};
use thiserror::Error;

/// Errors raised by a cell source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CellCollectorError {
    /// The indexer failed to answer a page request.
    #[error("indexer error: {0}")]
    Indexer(String),

    /// The page size must be positive.
    #[error("page size should be greater than 0")]
    ZeroPageSize,

    /// The page budget is spent before the cell source is exhausted.
    #[error("requested {0} pages from indexer, page limit reached")]
    PageLimitReached(u32),

    /// Any other failure of a custom cell source.
    #[error("{0}")]
    Other(String),
}

impl From<CellCollectorError> for Error {
    fn from(error: CellCollectorError) -> Self {
        ErrorKind::CellCollector.because(error)
    }
}
