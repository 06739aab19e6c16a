use crate::ScriptGroup;
use ckb_types::{core::TransactionView, packed, prelude::*};

/// A structurally complete transaction and the script groups found in it.
///
/// After a builder returns it, only the witnesses may change. The cell deps, inputs and outputs
/// are fixed, otherwise the fee paid would no longer match the one the builder computed.
#[derive(Debug, Clone)]
pub struct TransactionWithScriptGroups {
    tx_view: TransactionView,
    script_groups: Vec<ScriptGroup>,
}

impl TransactionWithScriptGroups {
    /// Pairs a transaction with its script groups.
    pub fn new(tx_view: TransactionView, script_groups: Vec<ScriptGroup>) -> Self {
        TransactionWithScriptGroups {
            tx_view,
            script_groups,
        }
    }

    /// The transaction.
    pub fn tx_view(&self) -> &TransactionView {
        &self.tx_view
    }

    /// The script groups, in the order the builder found them.
    pub fn script_groups(&self) -> &[ScriptGroup] {
        &self.script_groups
    }

    /// The witnesses of the transaction.
    pub fn witnesses(&self) -> Vec<packed::Bytes> {
        self.tx_view.witnesses().into_iter().collect()
    }

    /// Replaces all the witnesses, keeping every other field.
    pub fn set_witnesses(&mut self, witnesses: Vec<packed::Bytes>) {
        self.tx_view = self
            .tx_view
            .as_advanced_builder()
            .set_witnesses(witnesses)
            .build();
    }

    /// Splits into the transaction and its script groups.
    pub fn into_parts(self) -> (TransactionView, Vec<ScriptGroup>) {
        (self.tx_view, self.script_groups)
    }
}
