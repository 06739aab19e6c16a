//! CKB transaction assembler.
//!
//! Puts the pipeline together: a cell source feeds a [`TransactionBuilder`], which balances the
//! transaction with witness placeholders sized by the script handlers, then a
//! [`TransactionSigner`] fills the witnesses of every script group.
//!
//! ```ignore
//! let config = AssemblerConfig::load_from_file("assembler.toml")?;
//! let (registry, signer) = DevChain::load(&config)?.registries()?;
//! let cells = LiveCellIterator::with_config(indexer, query, &config.collector);
//! let mut builder = TransactionBuilder::new(cells, &registry, config.builder.clone());
//! builder.add_output(output).set_change_lock(change_lock);
//! let tx = assemble(&mut builder, &signer, &[SignContext::new().with_key(key)])?;
//! ```

mod config;
mod devchain;

pub use ckb_assembler_error::{Error, ErrorKind};
pub use ckb_assembler_types as types;
pub use ckb_cell_collector as cell_collector;
pub use ckb_tx_builder as tx_builder;
pub use ckb_tx_signer as tx_signer;
pub use config::{AssemblerConfig, ConfigError};
pub use devchain::{DevChain, CAPACITY_DIFF_SYSTEM_CELL};

use ckb_assembler_types::{TransactionInput, TransactionWithScriptGroups};
use ckb_cell_collector::CellCollectorError;
use ckb_logger::debug;
use ckb_tx_builder::TransactionBuilder;
use ckb_tx_signer::{SignContext, TransactionSigner};

/// Builds the transaction and signs it once per context.
///
/// Contexts without input cells get the cells consumed by the builder, so signers reading the
/// input capacities work without extra setup. With no context at all, the transaction is signed
/// once with a context only holding the input cells.
pub fn assemble<S>(
    builder: &mut TransactionBuilder<'_, S>,
    signer: &TransactionSigner,
    contexts: &[SignContext],
) -> Result<TransactionWithScriptGroups, Error>
where
    S: Iterator<Item = Result<TransactionInput, CellCollectorError>>,
{
    let mut tx = builder.build()?;
    let input_cells = builder.input_cells();
    debug!(
        "built tx {} with {} inputs and {} script groups",
        tx.tx_view().hash(),
        input_cells.len(),
        tx.script_groups().len()
    );

    let default_context = [SignContext::new()];
    let contexts = if contexts.is_empty() {
        &default_context[..]
    } else {
        contexts
    };
    for context in contexts {
        let context = if context.input_cells().is_some() {
            context.clone()
        } else {
            context.clone().with_input_cells(input_cells.clone())
        };
        let signed = signer.sign_transaction(&mut tx, &context)?;
        debug!("signed groups {:?}", signed);
    }
    Ok(tx)
}
