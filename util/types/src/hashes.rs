//! The system scripts deployed in the genesis block.
//!
//! `ckb list-hashes --format json` prints them per chain, keyed by the chain name.

use crate::ScriptId;
use ckb_assembler_error::{Error, ErrorKind};
use ckb_types::{
    core::DepType,
    packed::{CellDep, OutPoint},
    prelude::*,
    H256,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};
use thiserror::Error;

/// The chain name of a dev chain.
pub const DEV_CHAIN: &str = "ckb_dev";
/// The position of the secp256k1 blake160 sighash all lock in `system_cells`.
pub const SIGHASH_ALL_SYSTEM_CELL: usize = 0;
/// The position of the secp256k1 sighash all dep group in `dep_groups`.
pub const SIGHASH_ALL_DEP_GROUP: usize = 0;

/// Errors raised when loading the hashes file.
#[derive(Error, Debug)]
pub enum HashesError {
    #[error("failed to read hashes file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse hashes file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("chain {0} is not found in hashes file")]
    MissingChain(String),
}

impl From<HashesError> for Error {
    fn from(error: HashesError) -> Self {
        ErrorKind::Config.because(error)
    }
}

/// A cell deployed in the genesis block which holds script code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemCell {
    /// The bundled file the code comes from.
    #[serde(default)]
    pub path: Option<String>,
    pub tx_hash: H256,
    pub index: u32,
    pub data_hash: H256,
    /// Present when the cell carries a type id script.
    #[serde(default)]
    pub type_hash: Option<H256>,
}

impl SystemCell {
    pub fn out_point(&self) -> OutPoint {
        OutPoint::new(self.tx_hash.pack(), self.index)
    }

    /// The cell dep loading this cell as code.
    pub fn code_cell_dep(&self) -> CellDep {
        CellDep::new_builder()
            .out_point(self.out_point())
            .dep_type(DepType::Code.into())
            .build()
    }

    /// The id of the scripts referencing this cell.
    ///
    /// Cells with a type id are referenced by type hash, which survives code upgrades.
    pub fn script_id(&self) -> ScriptId {
        match &self.type_hash {
            Some(type_hash) => ScriptId::new_type(type_hash.clone()),
            None => ScriptId::new_data1(self.data_hash.clone()),
        }
    }
}

/// A cell deployed in the genesis block which lists other cells as deps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepGroup {
    #[serde(default)]
    pub included_cells: Vec<String>,
    pub tx_hash: H256,
    pub index: u32,
}

impl DepGroup {
    pub fn out_point(&self) -> OutPoint {
        OutPoint::new(self.tx_hash.pack(), self.index)
    }

    /// The cell dep expanding this group.
    pub fn cell_dep(&self) -> CellDep {
        CellDep::new_builder()
            .out_point(self.out_point())
            .dep_type(DepType::DepGroup.into())
            .build()
    }
}

/// The system cells and dep groups of one chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainHashes {
    #[serde(default)]
    pub system_cells: Vec<SystemCell>,
    #[serde(default)]
    pub dep_groups: Vec<DepGroup>,
}

impl ChainHashes {
    pub fn system_cell(&self, index: usize) -> Option<&SystemCell> {
        self.system_cells.get(index)
    }

    pub fn dep_group(&self, index: usize) -> Option<&DepGroup> {
        self.dep_groups.get(index)
    }
}

/// Picks the hashes of `chain` from the output of `ckb list-hashes --format json`.
pub fn parse_chain_hashes(json: &str, chain: &str) -> Result<ChainHashes, HashesError> {
    let mut chains: HashMap<String, ChainHashes> = serde_json::from_str(json)?;
    chains
        .remove(chain)
        .ok_or_else(|| HashesError::MissingChain(chain.to_owned()))
}

/// Reads the hashes file and picks the hashes of `chain`.
pub fn load_chain_hashes<P: AsRef<Path>>(path: P, chain: &str) -> Result<ChainHashes, HashesError> {
    let json = fs::read_to_string(path)?;
    parse_chain_hashes(&json, chain)
}
