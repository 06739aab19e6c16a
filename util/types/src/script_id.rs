use ckb_types::{
    core::ScriptHashType,
    packed::{Script, ScriptBuilder},
    prelude::*,
    H256,
};
use std::fmt;

/// The code a script runs, identified by `code_hash` and `hash_type`.
///
/// Scripts sharing a `ScriptId` only differ in `args`, so handlers and signers are registered by
/// `ScriptId` instead of by the full script.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScriptId {
    /// The script code hash.
    pub code_hash: H256,
    /// How `code_hash` is matched against cell deps.
    pub hash_type: ScriptHashType,
}

impl ScriptId {
    /// Creates a script id.
    pub fn new(code_hash: H256, hash_type: ScriptHashType) -> Self {
        ScriptId {
            code_hash,
            hash_type,
        }
    }

    /// Creates a script id whose code is located by the cell's type script hash.
    pub fn new_type(code_hash: H256) -> Self {
        Self::new(code_hash, ScriptHashType::Type)
    }

    /// Creates a script id whose code is located by the cell's data hash.
    pub fn new_data1(code_hash: H256) -> Self {
        Self::new(code_hash, ScriptHashType::Data1)
    }

    /// Extracts the id of a script.
    ///
    /// Returns `None` when the script carries an unknown hash type.
    pub fn from_script(script: &Script) -> Option<Self> {
        let hash_type = ScriptHashType::try_from(script.hash_type()).ok()?;
        Some(Self::new(script.code_hash().unpack(), hash_type))
    }

    /// Whether the script runs the code identified by this id.
    pub fn matches(&self, script: &Script) -> bool {
        script.code_hash().as_slice() == self.code_hash.as_bytes()
            && script.hash_type() == self.hash_type.into()
    }

    /// Returns a script builder with `code_hash` and `hash_type` filled.
    pub fn script_builder(&self) -> ScriptBuilder {
        Script::new_builder()
            .code_hash(self.code_hash.pack())
            .hash_type(self.hash_type.into())
    }

    /// Builds a script running this code with the given args.
    pub fn script(&self, args: &[u8]) -> Script {
        self.script_builder().args(args.pack()).build()
    }
}

impl fmt::Display for ScriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}({:?})", self.code_hash, self.hash_type)
    }
}
