use super::ScriptSigner;
use crate::{SignContext, SignerError, SigningTransaction};
use ckb_assembler_types::witness::pack_int;
use ckb_types::prelude::*;

/// Writes the capacity difference of the group into its first witness.
///
/// The difference is the capacity of the outputs locked by the group script minus the capacity
/// of the group inputs, as an `i64`. It needs the consumed cells from the sign context.
#[derive(Default)]
pub struct CapacityDiffSigner;

impl CapacityDiffSigner {
    pub fn new() -> Self {
        CapacityDiffSigner
    }
}

impl ScriptSigner for CapacityDiffSigner {
    fn name(&self) -> &str {
        "capacity_diff"
    }

    fn sign(
        &self,
        tx: &mut SigningTransaction<'_>,
        context: &SignContext,
    ) -> Result<bool, SignerError> {
        let input_cells = context
            .input_cells()
            .ok_or(SignerError::MissingCapability("input cells"))?;
        let group = tx.script_group();

        let mut inputs_capacity = 0u64;
        for index in &group.input_indices {
            let cell = input_cells
                .input_cell(*index)
                .ok_or(SignerError::MissingInputCell(*index))?;
            inputs_capacity = inputs_capacity
                .checked_add(cell.capacity())
                .ok_or(SignerError::CapacityOverflow)?;
        }

        let mut outputs_capacity = 0u64;
        for output in tx.tx().outputs().into_iter() {
            if output.lock() == group.script {
                let capacity: u64 = output.capacity().unpack();
                outputs_capacity = outputs_capacity
                    .checked_add(capacity)
                    .ok_or(SignerError::CapacityOverflow)?;
            }
        }

        let diff = i64::try_from(outputs_capacity)
            .ok()
            .zip(i64::try_from(inputs_capacity).ok())
            .and_then(|(outputs, inputs)| outputs.checked_sub(inputs))
            .ok_or(SignerError::CapacityOverflow)?;
        tx.fill_lock_placeholder(pack_int(diff))
    }
}
