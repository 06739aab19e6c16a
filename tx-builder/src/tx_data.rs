use ckb_assembler_types::{
    witness::{update_field, WitnessError, WitnessField},
    TransactionInput,
};
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, TransactionBuilder, TransactionView},
    packed::{self, Byte32, CellDep, CellInput, CellOutput},
    prelude::*,
};

/// The transaction being built.
///
/// Handlers receive it to add cell deps, header deps and witnesses. Inputs and outputs are only
/// added by the builder.
///
/// Cell deps and header deps are deduplicated and keep the insertion order. There is always at
/// least one witness per input; extra witnesses may follow.
#[derive(Debug, Clone, Default)]
pub struct TxData {
    cell_deps: Vec<CellDep>,
    header_deps: Vec<Byte32>,
    inputs: Vec<CellInput>,
    outputs: Vec<CellOutput>,
    outputs_data: Vec<packed::Bytes>,
    witnesses: Vec<packed::Bytes>,
}

impl TxData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell dep unless it is already present. Returns whether it is added.
    pub fn add_cell_dep(&mut self, cell_dep: CellDep) -> bool {
        if self.cell_deps.contains(&cell_dep) {
            false
        } else {
            self.cell_deps.push(cell_dep);
            true
        }
    }

    pub fn cell_deps(&self) -> &[CellDep] {
        &self.cell_deps
    }

    /// Adds a header dep unless it is already present. Returns whether it is added.
    pub fn add_header_dep(&mut self, block_hash: Byte32) -> bool {
        if self.header_deps.contains(&block_hash) {
            false
        } else {
            self.header_deps.push(block_hash);
            true
        }
    }

    pub fn header_deps(&self) -> &[Byte32] {
        &self.header_deps
    }

    /// Appends an input and an empty witness for it if needed.
    pub(crate) fn add_input(&mut self, input: &TransactionInput) {
        self.inputs.push(input.cell_input());
        if self.witnesses.len() < self.inputs.len() {
            self.witnesses.push(packed::Bytes::default());
        }
    }

    pub fn inputs(&self) -> &[CellInput] {
        &self.inputs
    }

    pub(crate) fn add_output(&mut self, output: CellOutput, data: Bytes) {
        self.outputs.push(output);
        self.outputs_data.push(data.pack());
    }

    pub fn outputs(&self) -> &[CellOutput] {
        &self.outputs
    }

    pub fn outputs_data(&self) -> &[packed::Bytes] {
        &self.outputs_data
    }

    /// Replaces the capacity of the output at `index`.
    pub(crate) fn set_output_capacity(&mut self, index: usize, capacity: u64) {
        if let Some(output) = self.outputs.get_mut(index) {
            *output = output
                .clone()
                .as_builder()
                .capacity(Capacity::shannons(capacity).pack())
                .build();
        }
    }

    /// The sum of the output capacities, `None` on overflow.
    pub fn outputs_capacity(&self) -> Option<u64> {
        self.outputs.iter().try_fold(0u64, |sum, output| {
            let capacity: u64 = output.capacity().unpack();
            sum.checked_add(capacity)
        })
    }

    pub fn witnesses(&self) -> &[packed::Bytes] {
        &self.witnesses
    }

    /// Sets the witness at `index`, padding with empty witnesses when it is out of range.
    pub fn set_witness(&mut self, index: usize, witness: Bytes) {
        if self.witnesses.len() <= index {
            self.witnesses.resize(index + 1, packed::Bytes::default());
        }
        self.witnesses[index] = witness.pack();
    }

    /// Sets one `WitnessArgs` field of the witness at `index`. Returns whether the witness changed.
    pub fn set_witness_field(
        &mut self,
        index: usize,
        field: WitnessField,
        value: Bytes,
    ) -> Result<bool, WitnessError> {
        let current = self
            .witnesses
            .get(index)
            .map(|witness| witness.raw_data())
            .unwrap_or_default();
        let updated = update_field(&current, field, value)?;
        let changed = current != updated;
        self.set_witness(index, updated);
        Ok(changed)
    }

    pub fn build_tx_view(&self) -> TransactionView {
        TransactionBuilder::default()
            .cell_deps(self.cell_deps.clone())
            .header_deps(self.header_deps.clone())
            .inputs(self.inputs.clone())
            .outputs(self.outputs.clone())
            .outputs_data(self.outputs_data.clone())
            .witnesses(self.witnesses.clone())
            .build()
    }

    /// The size of the transaction in a block.
    pub fn serialized_size(&self) -> usize {
        self.build_tx_view().data().serialized_size_in_block()
    }
}
