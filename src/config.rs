use ckb_assembler_error::{Error, ErrorKind};
use ckb_assembler_types::{load_chain_hashes, ChainHashes, HashesError, DEV_CHAIN};
use ckb_cell_collector::CellCollectorConfig;
use ckb_tx_builder::TxBuilderConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised when loading the assembler configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("hashes_file is not set")]
    MissingHashesFile,

    #[error("system cell {0} is not found in chain hashes")]
    MissingSystemCell(usize),

    #[error("dep group {0} is not found in chain hashes")]
    MissingDepGroup(usize),

    #[error(transparent)]
    Hashes(#[from] HashesError),
}

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        ErrorKind::Config.because(error)
    }
}

/// The assembler configuration.
///
/// ```toml
/// hashes_file = "hashes.json"
/// chain = "ckb_dev"
///
/// [builder]
/// fee_rate = 1000
///
/// [collector]
/// page_size = 100
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssemblerConfig {
    #[serde(default)]
    pub builder: TxBuilderConfig,
    #[serde(default)]
    pub collector: CellCollectorConfig,
    /// The output of `ckb list-hashes --format json`.
    ///
    /// A relative path is resolved against the directory of the config file.
    #[serde(default)]
    pub hashes_file: Option<PathBuf>,
    /// The chain picked from `hashes_file`.
    #[serde(default = "default_chain")]
    pub chain: String,
}

fn default_chain() -> String {
    DEV_CHAIN.to_owned()
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        AssemblerConfig {
            builder: TxBuilderConfig::default(),
            collector: CellCollectorConfig::default(),
            hashes_file: None,
            chain: default_chain(),
        }
    }
}

impl AssemblerConfig {
    pub fn load_from_str(config: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(config)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::load_from_str(&content)?;
        if let Some(root_dir) = path.parent() {
            config.adjust(root_dir);
        }
        Ok(config)
    }

    /// Resolves relative paths against `root_dir`.
    pub fn adjust(&mut self, root_dir: &Path) {
        if let Some(hashes_file) = self.hashes_file.as_mut() {
            if hashes_file.is_relative() {
                *hashes_file = root_dir.join(&hashes_file);
            }
        }
    }

    /// Loads the system scripts of the configured chain.
    pub fn chain_hashes(&self) -> Result<ChainHashes, ConfigError> {
        let hashes_file = self
            .hashes_file
            .as_ref()
            .ok_or(ConfigError::MissingHashesFile)?;
        Ok(load_chain_hashes(hashes_file, &self.chain)?)
    }
}
