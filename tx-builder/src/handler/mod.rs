//! Script handlers prepare the script groups of a transaction.
//!
//! A handler claims the groups whose script it knows and, for each of them, adds the cell deps
//! the script needs and a placeholder witness as large as the final witness. Handlers must be
//! idempotent: the builder runs them again whenever more inputs are collected.

mod capacity_diff;
mod sighash;

pub use capacity_diff::{CapacityDiffScriptHandler, CAPACITY_DIFF_SIZE};
pub use sighash::{Secp256k1Blake160SighashAllScriptHandler, SECP_SIGNATURE_SIZE};

use crate::{HandlerError, TxBuilderError, TxData};
use ckb_assembler_types::{witness::WitnessField, ScriptGroup};
use ckb_logger::trace;
use ckb_types::{bytes::Bytes, packed::CellDep};
use std::any::Any;

/// Prepares the script groups of one kind of script.
pub trait ScriptHandler: Send + Sync {
    /// The handler name used in errors and logs.
    fn name(&self) -> &str;

    /// Whether the handler is responsible for the group.
    fn is_match(&self, script_group: &ScriptGroup) -> bool;

    /// Adds cell deps and witness placeholders for the group.
    ///
    /// `context` is one of the contexts the caller passes to the builder. Returns whether the
    /// transaction is modified.
    fn build_transaction(
        &self,
        tx_data: &mut TxData,
        script_group: &ScriptGroup,
        context: &dyn Any,
    ) -> Result<bool, HandlerError>;
}

/// The handlers known to a transaction builder, in registration order.
#[derive(Default)]
pub struct ScriptHandlerRegistry {
    handlers: Vec<Box<dyn ScriptHandler>>,
}

impl ScriptHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler. Handlers registered earlier are kept.
    pub fn register<H: ScriptHandler + 'static>(&mut self, handler: H) -> &mut Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Finds the only handler claiming the group.
    pub fn resolve(
        &self,
        script_group: &ScriptGroup,
    ) -> Result<&dyn ScriptHandler, TxBuilderError> {
        let mut claimants = self
            .handlers
            .iter()
            .filter(|handler| handler.is_match(script_group));
        match (claimants.next(), claimants.next()) {
            (Some(handler), None) => Ok(handler.as_ref()),
            (None, _) => Err(TxBuilderError::UnhandledScriptGroup {
                script_hash: script_group.script_hash(),
                group_type: script_group.group_type,
            }),
            (Some(first), Some(second)) => {
                let handlers = [first, second]
                    .into_iter()
                    .chain(claimants)
                    .map(|handler| handler.name().to_owned())
                    .collect();
                Err(TxBuilderError::AmbiguousScriptGroup {
                    script_hash: script_group.script_hash(),
                    group_type: script_group.group_type,
                    handlers,
                })
            }
        }
    }

    /// Runs the claiming handler of every group once per context.
    ///
    /// All the groups are resolved first, so nothing is modified when a group is unhandled.
    pub fn build_transaction(
        &self,
        tx_data: &mut TxData,
        script_groups: &[ScriptGroup],
        contexts: &[&dyn Any],
    ) -> Result<bool, TxBuilderError> {
        let resolved = script_groups
            .iter()
            .map(|group| self.resolve(group).map(|handler| (handler, group)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut modified = false;
        for (handler, group) in resolved {
            for context in contexts {
                let changed = handler
                    .build_transaction(tx_data, group, *context)
                    .map_err(|source| TxBuilderError::Handler {
                        handler: handler.name().to_owned(),
                        script_hash: group.script_hash(),
                        group_type: group.group_type,
                        source,
                    })?;
                trace!(
                    "handler {} on {} group {}: modified {}",
                    handler.name(),
                    group.group_type,
                    group.script_hash(),
                    changed
                );
                modified |= changed;
            }
        }
        Ok(modified)
    }
}

/// Adds `cell_dep` and a zero filled lock placeholder of `len` bytes at the group witness.
pub(crate) fn prepare_lock_group(
    tx_data: &mut TxData,
    script_group: &ScriptGroup,
    cell_dep: &CellDep,
    len: usize,
) -> Result<bool, HandlerError> {
    let mut modified = tx_data.add_cell_dep(cell_dep.clone());
    if let Some(index) = script_group.witness_index() {
        let placeholder = Bytes::from(vec![0u8; len]);
        modified |= tx_data.set_witness_field(index, WitnessField::Lock, placeholder)?;
    }
    Ok(modified)
}
