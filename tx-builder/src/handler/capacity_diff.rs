use super::{prepare_lock_group, ScriptHandler};
use crate::{HandlerError, TxData};
use ckb_assembler_types::{ScriptGroup, ScriptGroupType, ScriptId};
use ckb_types::packed::CellDep;
use std::any::Any;

/// The size of the capacity difference stored in the lock field, an `i64`.
pub const CAPACITY_DIFF_SIZE: usize = 8;

/// Handles the capacity diff lock.
///
/// The lock verifies that the lock field of its first witness holds the capacity of the outputs
/// it locks minus the capacity of its inputs.
pub struct CapacityDiffScriptHandler {
    script_id: ScriptId,
    cell_dep: CellDep,
}

impl CapacityDiffScriptHandler {
    pub fn new(script_id: ScriptId, cell_dep: CellDep) -> Self {
        CapacityDiffScriptHandler { script_id, cell_dep }
    }

    pub fn script_id(&self) -> &ScriptId {
        &self.script_id
    }
}

impl ScriptHandler for CapacityDiffScriptHandler {
    fn name(&self) -> &str {
        "capacity_diff"
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
        prepare_lock_group(tx_data, script_group, &self.cell_dep, CAPACITY_DIFF_SIZE)
    }
}
