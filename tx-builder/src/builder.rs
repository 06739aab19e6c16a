use crate::{FeeCalculator, ScriptHandlerRegistry, TxBuilderConfig, TxBuilderError, TxData};
use ckb_assembler_types::{InputCells, ScriptGroups, TransactionInput, TransactionWithScriptGroups};
use ckb_cell_collector::CellCollectorError;
use ckb_logger::{debug, trace, warn};
use ckb_types::{
    bytes::Bytes,
    core::Capacity,
    packed::{Byte32, CellOutput, Script},
    prelude::*,
};
use std::any::Any;

/// The phases of a build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildState {
    /// Accepting outputs, or pulling inputs until the outputs and the fee are covered.
    Collecting,
    /// Script groups are classified and prepared by their handlers.
    Grouped,
    /// The fee is computed on the transaction with witness placeholders.
    FeeBalanced,
    /// The transaction is returned. The builder cannot be used again.
    Finalized,
}

/// Builds a balanced transaction from declared outputs and a cell source.
///
/// Inputs are pulled one at a time from the cell source, after the pre-selected ones. Whenever
/// the collected capacity covers the outputs, the fee and the occupied capacity of the change
/// output, the script groups are prepared by the handlers and the fee is recomputed. If the
/// placeholders made the fee larger than what is collected, the builder goes back to collecting.
///
/// Without a change output, the surplus of the inputs is paid as fee.
pub struct TransactionBuilder<'a, S> {
    config: TxBuilderConfig,
    registry: &'a ScriptHandlerRegistry,
    cell_source: S,
    tx: TxData,
    preselected: Vec<TransactionInput>,
    inputs: Vec<TransactionInput>,
    change: Option<(CellOutput, Bytes)>,
    state: BuildState,
    used: bool,
}

impl<'a, S> TransactionBuilder<'a, S>
where
    S: Iterator<Item = Result<TransactionInput, CellCollectorError>>,
{
    pub fn new(
        cell_source: S,
        registry: &'a ScriptHandlerRegistry,
        config: TxBuilderConfig,
    ) -> Self {
        TransactionBuilder {
            config,
            registry,
            cell_source,
            tx: TxData::new(),
            preselected: Vec::new(),
            inputs: Vec::new(),
            change: None,
            state: BuildState::Collecting,
            used: false,
        }
    }

    /// Adds an output without data.
    pub fn add_output(&mut self, output: CellOutput) -> &mut Self {
        self.add_output_with_data(output, Bytes::new())
    }

    pub fn add_output_with_data(&mut self, output: CellOutput, data: Bytes) -> &mut Self {
        self.tx.add_output(output, data);
        self
    }

    /// Sends the change to a cell locked by `lock`.
    pub fn set_change_lock(&mut self, lock: Script) -> &mut Self {
        let output = CellOutput::new_builder().lock(lock).build();
        self.set_change_output(output, Bytes::new())
    }

    /// Sends the change to `output`, whose capacity is overwritten by the builder.
    ///
    /// The change output is appended after all the declared outputs.
    pub fn set_change_output(&mut self, output: CellOutput, data: Bytes) -> &mut Self {
        self.change = Some((output, data));
        self
    }

    /// Adds an input consumed before any cell from the cell source.
    pub fn add_input(&mut self, input: TransactionInput) -> &mut Self {
        self.preselected.push(input);
        self
    }

    pub fn add_header_dep(&mut self, block_hash: Byte32) -> &mut Self {
        self.tx.add_header_dep(block_hash);
        self
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// The transaction in its current shape.
    pub fn tx_data(&self) -> &TxData {
        &self.tx
    }

    /// The consumed cells, in input order.
    pub fn input_cells(&self) -> InputCells {
        InputCells::new(self.inputs.clone())
    }

    /// Builds the transaction, running every handler once without context.
    pub fn build(&mut self) -> Result<TransactionWithScriptGroups, TxBuilderError> {
        self.build_with_contexts(&[&()])
    }

    /// Builds the transaction, running every handler once per context.
    ///
    /// An empty `contexts` runs every handler once without context, like [`Self::build`].
    pub fn build_with_contexts(
        &mut self,
        contexts: &[&dyn Any],
    ) -> Result<TransactionWithScriptGroups, TxBuilderError> {
        let unit: [&dyn Any; 1] = [&()];
        let contexts = if contexts.is_empty() {
            &unit[..]
        } else {
            contexts
        };
        if self.used {
            return Err(TxBuilderError::DoubleBuild);
        }
        self.used = true;

        if self.tx.outputs().is_empty() {
            return Err(TxBuilderError::NoOutputs);
        }
        for (index, (output, data)) in self
            .tx
            .outputs()
            .iter()
            .zip(self.tx.outputs_data())
            .enumerate()
        {
            let capacity: u64 = output.capacity().unpack();
            let occupied = occupied_capacity(output, data.raw_data().len())?;
            if capacity < occupied {
                return Err(TxBuilderError::OutputCapacityTooSmall {
                    index,
                    capacity,
                    occupied,
                });
            }
        }
        let outputs_capacity = self
            .tx
            .outputs_capacity()
            .ok_or(TxBuilderError::CapacityOverflow)?;

        let change = match self.change.take() {
            Some((output, data)) => {
                let occupied = occupied_capacity(&output, data.len())?;
                let index = self.tx.outputs().len();
                self.tx.add_output(output, data);
                Some((index, occupied))
            }
            None => None,
        };
        let min_change = change.map(|(_, occupied)| occupied).unwrap_or_default();
        let outputs_len = self.tx.outputs().len();

        let mut inputs_capacity = 0u64;
        for input in std::mem::take(&mut self.preselected) {
            inputs_capacity = checked_add(inputs_capacity, input.capacity())?;
            self.push_input(input);
        }

        let calculator = FeeCalculator::new(self.config.fee_rate);
        let mut fee = 0u64;
        let mut scanned = 0usize;
        loop {
            self.state = BuildState::Collecting;
            let required = checked_add(checked_add(outputs_capacity, fee)?, min_change)?;
            while self.inputs.is_empty() || inputs_capacity < required {
                if let Some(limit) = self.config.max_scanned_cells {
                    if scanned >= limit {
                        warn!("scanned {} cells, still requires {} shannons", scanned, required);
                        return Err(TxBuilderError::ScanLimitReached(scanned));
                    }
                }
                let input = match self.cell_source.next() {
                    Some(input) => input?,
                    None => {
                        return Err(exhausted(
                            inputs_capacity,
                            outputs_capacity,
                            fee,
                            change.map(|_| min_change),
                        ))
                    }
                };
                scanned += 1;
                inputs_capacity = checked_add(inputs_capacity, input.capacity())?;
                trace!(
                    "collect input {} with {} shannons",
                    input.live_cell.out_point,
                    input.capacity()
                );
                self.push_input(input);
            }

            self.state = BuildState::Grouped;
            let script_groups = ScriptGroups::classify(
                self.inputs.iter().map(TransactionInput::previous_output),
                self.tx.outputs(),
            );
            self.registry
                .build_transaction(&mut self.tx, script_groups.as_ref(), contexts)?;
            if self.tx.inputs().len() != self.inputs.len()
                || self.tx.outputs().len() != outputs_len
            {
                return Err(TxBuilderError::CellsChangedByHandler {
                    inputs: self.tx.inputs().len(),
                    outputs: self.tx.outputs().len(),
                });
            }

            self.state = BuildState::FeeBalanced;
            let size = self.tx.serialized_size();
            fee = calculator.fee(size);
            debug!(
                "{} inputs, tx size {}, fee {} at rate {}",
                self.inputs.len(),
                size,
                fee,
                calculator.fee_rate()
            );
            let required = checked_add(checked_add(outputs_capacity, fee)?, min_change)?;
            if inputs_capacity < required {
                debug!("fee grows to {}, collect more inputs", fee);
                continue;
            }

            let surplus = inputs_capacity - outputs_capacity - fee;
            match change {
                Some((index, _)) => {
                    debug!("change output {} gets {} shannons", index, surplus);
                    self.tx.set_output_capacity(index, surplus);
                }
                None if surplus > 0 => {
                    warn!("no change output, {} shannons are paid as extra fee", surplus);
                }
                None => {}
            }

            self.state = BuildState::Finalized;
            return Ok(TransactionWithScriptGroups::new(
                self.tx.build_tx_view(),
                script_groups.into_vec(),
            ));
        }
    }

    fn push_input(&mut self, input: TransactionInput) {
        self.tx.add_input(&input);
        self.inputs.push(input);
    }
}

fn occupied_capacity(output: &CellOutput, data_len: usize) -> Result<u64, TxBuilderError> {
    Capacity::bytes(data_len)
        .and_then(|data_capacity| output.occupied_capacity(data_capacity))
        .map(|capacity| capacity.as_u64())
        .map_err(|_| TxBuilderError::CapacityOverflow)
}

fn checked_add(a: u64, b: u64) -> Result<u64, TxBuilderError> {
    a.checked_add(b).ok_or(TxBuilderError::CapacityOverflow)
}

// The cell source has nothing more to offer.
fn exhausted(inputs: u64, outputs: u64, fee: u64, min_change: Option<u64>) -> TxBuilderError {
    match min_change {
        Some(min_change) if outputs.saturating_add(fee) <= inputs => {
            TxBuilderError::InsufficientCapacity {
                inputs,
                outputs,
                fee,
                min_change,
            }
        }
        _ => TxBuilderError::InsufficientFunds {
            required: outputs.saturating_add(fee),
            collected: inputs,
        },
    }
}
