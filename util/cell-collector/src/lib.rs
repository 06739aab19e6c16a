//! Cell sources feeding the transaction builder.
//!
//! A cell source is any `Iterator<Item = Result<TransactionInput, CellCollectorError>>`. The
//! builder pulls one input at a time and stops as soon as the collected capacity is enough, so a
//! source may be arbitrarily long. [`LiveCellIterator`] pages over an indexer lazily.

mod config;
mod error;
mod indexer;
mod iterator;

#[cfg(test)]
mod tests;

pub use config::CellCollectorConfig;
pub use error::CellCollectorError;
pub use indexer::{CellQuery, IndexerPage, IndexerRpc};
pub use iterator::LiveCellIterator;
