use ckb_assembler_error::{Error, ErrorKind, InternalErrorKind};
use ckb_assembler_types::{ScriptGroupType, WitnessError};
use ckb_cell_collector::CellCollectorError;
use ckb_types::packed::Byte32;
use thiserror::Error;

/// Errors raised by a script handler.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Witness(#[from] WitnessError),

    /// The handler expected a context of another type.
    #[error("unexpected handler context")]
    UnexpectedContext,

    #[error("{0}")]
    Other(String),
}

/// Errors raised when building a transaction.
#[derive(Error, Debug)]
pub enum TxBuilderError {
    #[error("the transaction builder has already been used")]
    DoubleBuild,

    #[error("the transaction has no output")]
    NoOutputs,

    #[error("output {index} has capacity {capacity}, less than its occupied capacity {occupied}")]
    OutputCapacityTooSmall {
        index: usize,
        capacity: u64,
        occupied: u64,
    },

    #[error("insufficient funds: requires {required} shannons, collected {collected}")]
    InsufficientFunds { required: u64, collected: u64 },

    #[error("scanned {0} cells without balancing the transaction")]
    ScanLimitReached(usize),

    #[error(
        "insufficient capacity for change: inputs {inputs}, outputs {outputs}, fee {fee}, \
         change requires at least {min_change}"
    )]
    InsufficientCapacity {
        inputs: u64,
        outputs: u64,
        fee: u64,
        min_change: u64,
    },

    #[error("capacity overflow")]
    CapacityOverflow,

    #[error("no script handler matches {group_type} script {script_hash}")]
    UnhandledScriptGroup {
        script_hash: Byte32,
        group_type: ScriptGroupType,
    },

    #[error("script handlers {handlers:?} all match {group_type} script {script_hash}")]
    AmbiguousScriptGroup {
        script_hash: Byte32,
        group_type: ScriptGroupType,
        handlers: Vec<String>,
    },

    #[error("script handler {handler} failed on {group_type} script {script_hash}: {source}")]
    Handler {
        handler: String,
        script_hash: Byte32,
        group_type: ScriptGroupType,
        #[source]
        source: HandlerError,
    },

    /// Only the builder may add inputs and outputs.
    #[error("script handlers changed the cells: {inputs} inputs and {outputs} outputs after handling")]
    CellsChangedByHandler { inputs: usize, outputs: usize },

    #[error(transparent)]
    CellSource(#[from] CellCollectorError),
}

impl From<TxBuilderError> for Error {
    fn from(error: TxBuilderError) -> Self {
        match error {
            TxBuilderError::CapacityOverflow => {
                InternalErrorKind::CapacityOverflow.because(error).into()
            }
            error => ErrorKind::TxBuilder.because(error),
        }
    }
}
