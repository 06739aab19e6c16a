//! Script signers and the registry dispatching script groups to them.

mod capacity_diff;
mod sighash;

pub use capacity_diff::CapacityDiffSigner;
pub use sighash::{sighash_all_message, Secp256k1Blake160SighashAllSigner};

use crate::{SignContext, SignerError, SigningTransaction, TransactionSignerError};
use ckb_assembler_types::{ScriptGroup, ScriptGroupType, ScriptId, TransactionWithScriptGroups};
use ckb_logger::{debug, trace};
use std::collections::HashMap;

/// Fills the witness of one script group.
pub trait ScriptSigner: Send + Sync {
    /// The signer name used in errors and logs.
    fn name(&self) -> &str;

    /// Signs the group of `tx`. Returns whether a witness is written.
    fn sign(
        &self,
        tx: &mut SigningTransaction<'_>,
        context: &SignContext,
    ) -> Result<bool, SignerError>;
}

/// Signers keyed by group role and script id.
#[derive(Default)]
pub struct TransactionSigner {
    signers: HashMap<(ScriptGroupType, ScriptId), Box<dyn ScriptSigner>>,
}

impl TransactionSigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the signer of lock groups running `script_id`, replacing the previous one.
    pub fn register_lock_signer<S: ScriptSigner + 'static>(
        &mut self,
        script_id: ScriptId,
        signer: S,
    ) -> Option<Box<dyn ScriptSigner>> {
        self.register(ScriptGroupType::Lock, script_id, Box::new(signer))
    }

    /// Registers the signer of type groups running `script_id`, replacing the previous one.
    pub fn register_type_signer<S: ScriptSigner + 'static>(
        &mut self,
        script_id: ScriptId,
        signer: S,
    ) -> Option<Box<dyn ScriptSigner>> {
        self.register(ScriptGroupType::Type, script_id, Box::new(signer))
    }

    fn register(
        &mut self,
        group_type: ScriptGroupType,
        script_id: ScriptId,
        signer: Box<dyn ScriptSigner>,
    ) -> Option<Box<dyn ScriptSigner>> {
        self.signers.insert((group_type, script_id), signer)
    }

    pub fn signer(&self, script_group: &ScriptGroup) -> Option<&dyn ScriptSigner> {
        let script_id = ScriptId::from_script(&script_group.script)?;
        self.signers
            .get(&(script_group.group_type, script_id))
            .map(|signer| signer.as_ref())
    }

    /// Signs every group having a signer, in group order.
    ///
    /// Returns the positions of the groups whose signer wrote a witness. Signing stops at the
    /// first error; the witnesses written by the groups before it are kept in `tx`.
    pub fn sign_transaction(
        &self,
        tx: &mut TransactionWithScriptGroups,
        context: &SignContext,
    ) -> Result<Vec<usize>, TransactionSignerError> {
        let tx_view = tx.tx_view().clone();
        let mut witnesses = tx.witnesses();
        let mut signed = Vec::new();
        let mut result = Ok(());

        for (position, group) in tx.script_groups().iter().enumerate() {
            let signer = match self.signer(group) {
                Some(signer) => signer,
                None => {
                    debug!(
                        "no signer for {} group {}, skip",
                        group.group_type,
                        group.script_hash()
                    );
                    continue;
                }
            };
            let mut signing = SigningTransaction::new(&tx_view, &mut witnesses, group);
            match signer.sign(&mut signing, context) {
                Ok(written) => {
                    trace!(
                        "signer {} on {} group {}: written {}",
                        signer.name(),
                        group.group_type,
                        group.script_hash(),
                        written
                    );
                    if written {
                        signed.push(position);
                    }
                }
                Err(source) => {
                    result = Err(TransactionSignerError::Signer {
                        signer: signer.name().to_owned(),
                        script_hash: group.script_hash(),
                        group_type: group.group_type,
                        source,
                    });
                    break;
                }
            }
        }

        tx.set_witnesses(witnesses);
        result.map(|_| signed)
    }
}
