//! Types shared by the transaction assembler crates.
//!
//! - [`ScriptGroup`] and the [`ScriptGroups`] classifier which partitions a transaction's cells
//!   by lock and type script.
//! - [`LiveCell`] and [`TransactionInput`], the cells fed into a transaction builder.
//! - [`WitnessEnvelope`], the codec of the `WitnessArgs` layout, and the fixed-width integer
//!   packing used by custom lock scripts.
//! - [`ChainHashes`], the system scripts listed by `ckb list-hashes`.

mod cell;
mod hashes;
mod script_group;
mod script_id;
mod transaction;
pub mod witness;


pub use cell::{InputCellProvider, InputCells, LiveCell, TransactionInput};
pub use hashes::{
    load_chain_hashes, parse_chain_hashes, ChainHashes, DepGroup, HashesError, SystemCell,
    DEV_CHAIN, SIGHASH_ALL_DEP_GROUP, SIGHASH_ALL_SYSTEM_CELL,
};
pub use script_group::{ScriptGroup, ScriptGroupType, ScriptGroups};
pub use script_id::ScriptId;
pub use transaction::TransactionWithScriptGroups;
pub use witness::{WitnessEnvelope, WitnessError, WitnessField};
