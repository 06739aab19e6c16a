use ckb_assembler_error::{Error, ErrorKind, InternalErrorKind};
use ckb_assembler_types::{ScriptGroupType, WitnessError};
use ckb_types::packed::Byte32;
use thiserror::Error;

/// Errors raised by a script signer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// Signers may only write the witnesses at the input indices of their group.
    #[error("witness {0} does not belong to the script group")]
    WitnessOutOfGroup(usize),

    /// The context lacks something the signer needs.
    #[error("the sign context has no {0}")]
    MissingCapability(&'static str),

    #[error("input cell {0} is not found")]
    MissingInputCell(usize),

    /// The witness lock is not the placeholder the fee was computed with.
    #[error("expect a lock placeholder of {expected} bytes, got {actual:?}")]
    PlaceholderMismatch {
        expected: usize,
        actual: Option<usize>,
    },

    #[error("capacity overflow")]
    CapacityOverflow,

    #[error(transparent)]
    Witness(#[from] WitnessError),

    #[error("secp256k1 error: {0}")]
    Secp(String),

    #[error("{0}")]
    Other(String),
}

/// Errors raised when signing a transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionSignerError {
    #[error("signer {signer} failed on {group_type} script {script_hash}: {source}")]
    Signer {
        signer: String,
        script_hash: Byte32,
        group_type: ScriptGroupType,
        #[source]
        source: SignerError,
    },
}

impl From<TransactionSignerError> for Error {
    fn from(error: TransactionSignerError) -> Self {
        match error {
            TransactionSignerError::Signer {
                source: SignerError::CapacityOverflow,
                ..
            } => InternalErrorKind::CapacityOverflow.because(error).into(),
            error => ErrorKind::Signer.because(error),
        }
    }
}
