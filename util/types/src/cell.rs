use ckb_types::{
    bytes::Bytes,
    core::BlockNumber,
    packed::{CellInput, CellOutput, OutPoint, Script},
    prelude::*,
};
use std::sync::Arc;

/// A live cell which can be consumed by a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveCell {
    /// The location of the cell.
    pub out_point: OutPoint,
    /// The cell fields: capacity, lock and type.
    pub output: CellOutput,
    /// The cell data.
    pub output_data: Bytes,
    /// The block which committed the cell, if the source knows it.
    pub block_number: Option<BlockNumber>,
    /// The index of the transaction which created the cell in its block, if the source knows it.
    pub tx_index: Option<u32>,
}

impl LiveCell {
    /// Creates a live cell without block info.
    pub fn new(out_point: OutPoint, output: CellOutput, output_data: Bytes) -> Self {
        LiveCell {
            out_point,
            output,
            output_data,
            block_number: None,
            tx_index: None,
        }
    }

    /// The cell capacity in shannons.
    pub fn capacity(&self) -> u64 {
        self.output.capacity().unpack()
    }

    /// The cell lock script.
    pub fn lock(&self) -> Script {
        self.output.lock()
    }

    /// The cell type script.
    pub fn type_script(&self) -> Option<Script> {
        self.output.type_().to_opt()
    }

    /// Whether the cell only carries capacity: no type script and no data.
    pub fn is_plain(&self) -> bool {
        self.output.type_().is_none() && self.output_data.is_empty()
    }
}

/// A cell to be consumed by a transaction, with the `since` constraint of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInput {
    /// The consumed cell.
    pub live_cell: LiveCell,
    /// The `since` field of the input.
    pub since: u64,
}

impl TransactionInput {
    /// Creates an input.
    pub fn new(live_cell: LiveCell, since: u64) -> Self {
        TransactionInput { live_cell, since }
    }

    /// The `CellInput` put into the transaction.
    pub fn cell_input(&self) -> CellInput {
        CellInput::new(self.live_cell.out_point.clone(), self.since)
    }

    /// The cell fields consumed by this input.
    pub fn previous_output(&self) -> &CellOutput {
        &self.live_cell.output
    }

    /// The capacity consumed by this input.
    pub fn capacity(&self) -> u64 {
        self.live_cell.capacity()
    }
}

impl From<LiveCell> for TransactionInput {
    fn from(live_cell: LiveCell) -> Self {
        TransactionInput::new(live_cell, 0)
    }
}

/// Looks up the cells consumed by a transaction by input index.
///
/// A transaction only references its inputs by out point. Signers which need the consumed cell
/// fields, such as their capacities, receive this capability through the signing context.
pub trait InputCellProvider: Send + Sync {
    /// Returns the cell consumed by the input at `index`.
    fn input_cell(&self, index: usize) -> Option<LiveCell>;
}

/// The inputs collected by a transaction builder, in transaction order.
#[derive(Debug, Clone, Default)]
pub struct InputCells(Arc<Vec<TransactionInput>>);

impl InputCells {
    /// Wraps the inputs of a transaction.
    pub fn new(inputs: Vec<TransactionInput>) -> Self {
        InputCells(Arc::new(inputs))
    }

    /// The number of inputs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there is no input.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the inputs in transaction order.
    pub fn iter(&self) -> impl Iterator<Item = &TransactionInput> {
        self.0.iter()
    }
}

impl InputCellProvider for InputCells {
    fn input_cell(&self, index: usize) -> Option<LiveCell> {
        self.0.get(index).map(|input| input.live_cell.clone())
    }
}
