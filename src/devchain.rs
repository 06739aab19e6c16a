use crate::{AssemblerConfig, ConfigError};
use ckb_assembler_types::{
    ChainHashes, DepGroup, ScriptId, SystemCell, SIGHASH_ALL_DEP_GROUP, SIGHASH_ALL_SYSTEM_CELL,
};
use ckb_tx_builder::{
    handler::{CapacityDiffScriptHandler, Secp256k1Blake160SighashAllScriptHandler},
    ScriptHandlerRegistry,
};
use ckb_tx_signer::{
    signer::{CapacityDiffSigner, Secp256k1Blake160SighashAllSigner},
    TransactionSigner,
};
use ckb_types::packed::Script;

/// The position of the capacity diff lock in `system_cells` of a dev chain bundling it.
pub const CAPACITY_DIFF_SYSTEM_CELL: usize = 4;

/// The system scripts of a chain, wired into handlers and signers.
#[derive(Clone, Debug)]
pub struct DevChain {
    hashes: ChainHashes,
}

impl DevChain {
    pub fn new(hashes: ChainHashes) -> Self {
        DevChain { hashes }
    }

    /// Loads the chain hashes named by `config`.
    pub fn load(config: &AssemblerConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.chain_hashes()?))
    }

    pub fn hashes(&self) -> &ChainHashes {
        &self.hashes
    }

    fn system_cell(&self, index: usize) -> Result<&SystemCell, ConfigError> {
        self.hashes
            .system_cell(index)
            .ok_or(ConfigError::MissingSystemCell(index))
    }

    fn dep_group(&self, index: usize) -> Result<&DepGroup, ConfigError> {
        self.hashes
            .dep_group(index)
            .ok_or(ConfigError::MissingDepGroup(index))
    }

    /// The id of the scripts whose code is the system cell at `index`.
    pub fn script_id(&self, system_cell: usize) -> Result<ScriptId, ConfigError> {
        Ok(self.system_cell(system_cell)?.script_id())
    }

    /// Builds a script running the system cell at `index`.
    pub fn script(&self, system_cell: usize, args: &[u8]) -> Result<Script, ConfigError> {
        Ok(self.script_id(system_cell)?.script(args))
    }

    pub fn sighash_script_id(&self) -> Result<ScriptId, ConfigError> {
        self.script_id(SIGHASH_ALL_SYSTEM_CELL)
    }

    /// The secp256k1 blake160 sighash all lock of a public key hash.
    pub fn sighash_lock(&self, blake160: &[u8]) -> Result<Script, ConfigError> {
        self.script(SIGHASH_ALL_SYSTEM_CELL, blake160)
    }

    /// Registers the secp256k1 blake160 sighash all handler and signer.
    pub fn register_sighash(
        &self,
        registry: &mut ScriptHandlerRegistry,
        signer: &mut TransactionSigner,
    ) -> Result<ScriptId, ConfigError> {
        let script_id = self.sighash_script_id()?;
        let dep_group = self.dep_group(SIGHASH_ALL_DEP_GROUP)?.cell_dep();
        registry.register(Secp256k1Blake160SighashAllScriptHandler::new(
            script_id.clone(),
            dep_group,
        ));
        signer.register_lock_signer(script_id.clone(), Secp256k1Blake160SighashAllSigner::new());
        Ok(script_id)
    }

    /// Registers the capacity diff handler and signer for the lock deployed at `system_cell`.
    pub fn register_capacity_diff(
        &self,
        system_cell: usize,
        registry: &mut ScriptHandlerRegistry,
        signer: &mut TransactionSigner,
    ) -> Result<ScriptId, ConfigError> {
        let cell = self.system_cell(system_cell)?;
        let script_id = cell.script_id();
        registry.register(CapacityDiffScriptHandler::new(
            script_id.clone(),
            cell.code_cell_dep(),
        ));
        signer.register_lock_signer(script_id.clone(), CapacityDiffSigner::new());
        Ok(script_id)
    }

    /// A handler registry and a signer with sighash all and capacity diff registered.
    pub fn registries(&self) -> Result<(ScriptHandlerRegistry, TransactionSigner), ConfigError> {
        let mut registry = ScriptHandlerRegistry::new();
        let mut signer = TransactionSigner::new();
        self.register_sighash(&mut registry, &mut signer)?;
        self.register_capacity_diff(CAPACITY_DIFF_SYSTEM_CELL, &mut registry, &mut signer)?;
        Ok((registry, signer))
    }
}
