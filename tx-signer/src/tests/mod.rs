use ckb_assembler_types::{
    witness::WitnessEnvelope, InputCells, LiveCell, ScriptGroups, ScriptId, TransactionInput,
    TransactionWithScriptGroups,
};
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, TransactionBuilder},
    packed::{CellOutput, OutPoint, Script},
    prelude::*,
    H256,
};

mod signer;

pub(crate) const SHANNONS_PER_CKB: u64 = 100_000_000;

pub(crate) fn diff_script_id() -> ScriptId {
    ScriptId::new_data1(H256([0xd1; 32]))
}

pub(crate) fn sighash_script_id() -> ScriptId {
    ScriptId::new_type(H256([0x5e; 32]))
}

pub(crate) fn output(lock: &Script, shannons: u64) -> CellOutput {
    CellOutput::new_builder()
        .capacity(Capacity::shannons(shannons).pack())
        .lock(lock.clone())
        .build()
}

pub(crate) fn input(lock: &Script, index: u32, shannons: u64) -> TransactionInput {
    LiveCell::new(
        OutPoint::new(H256([0xee; 32]).pack(), index),
        output(lock, shannons),
        Bytes::new(),
    )
    .into()
}

/// A built transaction, with a lock placeholder of `lock_len` bytes at the first input of
/// every lock group.
pub(crate) fn built_tx(
    inputs: &[TransactionInput],
    outputs: &[CellOutput],
    lock_len: &dyn Fn(&Script) -> usize,
) -> TransactionWithScriptGroups {
    let groups = ScriptGroups::classify(
        inputs.iter().map(TransactionInput::previous_output),
        outputs,
    )
    .into_vec();
    let mut witnesses = vec![Bytes::new(); inputs.len()];
    for group in &groups {
        if let Some(index) = group.witness_index() {
            let placeholder = Bytes::from(vec![0u8; lock_len(&group.script)]);
            witnesses[index] = WitnessEnvelope::with_lock(placeholder).pack();
        }
    }
    let tx = TransactionBuilder::default()
        .inputs(inputs.iter().map(TransactionInput::cell_input))
        .outputs(outputs.to_vec())
        .outputs_data(outputs.iter().map(|_| Bytes::new().pack()))
        .witnesses(witnesses.into_iter().map(|witness| witness.pack()))
        .build();
    TransactionWithScriptGroups::new(tx, groups)
}

pub(crate) fn input_cells(inputs: &[TransactionInput]) -> InputCells {
    InputCells::new(inputs.to_vec())
}

pub(crate) fn witness_lock(tx: &TransactionWithScriptGroups, index: usize) -> Option<Bytes> {
    let witness = tx.tx_view().witnesses().get(index)?.raw_data();
    WitnessEnvelope::unpack(&witness).ok()?.lock
}
