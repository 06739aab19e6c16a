use super::{prepare_lock_group, ScriptHandler};
use crate::{HandlerError, TxData};
use ckb_assembler_types::{ScriptGroup, ScriptGroupType, ScriptId};
use ckb_types::packed::CellDep;
use std::any::Any;

/// The size of a recoverable secp256k1 signature.
pub const SECP_SIGNATURE_SIZE: usize = 65;

/// Handles the secp256k1 blake160 sighash all lock.
///
/// The lock code and the secp256k1 data are loaded through the dep group deployed in genesis.
pub struct Secp256k1Blake160SighashAllScriptHandler {
    script_id: ScriptId,
    dep_group: CellDep,
}

impl Secp256k1Blake160SighashAllScriptHandler {
    pub fn new(script_id: ScriptId, dep_group: CellDep) -> Self {
        Secp256k1Blake160SighashAllScriptHandler {
            script_id,
            dep_group,
        }
    }

    pub fn script_id(&self) -> &ScriptId {
        &self.script_id
    }
}

impl ScriptHandler for Secp256k1Blake160SighashAllScriptHandler {
    fn name(&self) -> &str {
        "secp256k1_blake160_sighash_all"
    }

    fn is_match(&self, script_group: &ScriptGroup) -> bool {
        script_group.group_type == ScriptGroupType::Lock
            && self.script_id.matches(&script_group.script)
    }

    fn build_transaction(
        &self,
        tx_data: &mut TxData,
        script_group: &ScriptGroup,
        _context: &dyn Any,
    ) -> Result<bool, HandlerError> {
        prepare_lock_group(tx_data, script_group, &self.dep_group, SECP_SIGNATURE_SIZE)
    }
}
