//! Transaction builder.
//!
//! [`TransactionBuilder`] collects inputs from a cell source until the declared outputs and the
//! fee are covered. Every script group of the transaction must be claimed by exactly one
//! [`ScriptHandler`] in the [`ScriptHandlerRegistry`], which adds the cell deps of the script and
//! a witness placeholder as large as the final witness. The fee is computed on the transaction
//! with placeholders, so signing later never changes the transaction size.

mod builder;
mod config;
mod error;
mod fee;
pub mod handler;
mod tx_data;

#[cfg(test)]
mod tests;

pub use builder::{BuildState, TransactionBuilder};
pub use config::TxBuilderConfig;
pub use error::{HandlerError, TxBuilderError};
pub use fee::FeeCalculator;
pub use handler::{ScriptHandler, ScriptHandlerRegistry};
pub use tx_data::TxData;
