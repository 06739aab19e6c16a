use ckb_assembler_types::{LiveCell, ScriptId, TransactionInput};
use ckb_cell_collector::CellCollectorError;
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, DepType},
    packed::{CellDep, CellOutput, OutPoint, Script},
    prelude::*,
    H256,
};


const SHANNONS_PER_CKB: u64 = 100_000_000;

pub(crate) fn ckb(amount: u64) -> u64 {
    amount * SHANNONS_PER_CKB
}

pub(crate) fn diff_script_id() -> ScriptId {
    ScriptId::new_data1(H256([0xd1; 32]))
}

pub(crate) fn sighash_script_id() -> ScriptId {
    ScriptId::new_type(H256([0x5e; 32]))
}

pub(crate) fn code_dep(byte: u8) -> CellDep {
    CellDep::new_builder()
        .out_point(OutPoint::new(H256([byte; 32]).pack(), 0))
        .dep_type(DepType::Code.into())
        .build()
}

pub(crate) fn group_dep(byte: u8) -> CellDep {
    CellDep::new_builder()
        .out_point(OutPoint::new(H256([byte; 32]).pack(), 0))
        .dep_type(DepType::DepGroup.into())
        .build()
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

pub(crate) fn source(
    inputs: Vec<TransactionInput>,
) -> impl Iterator<Item = Result<TransactionInput, CellCollectorError>> {
    inputs.into_iter().map(Ok)
}
