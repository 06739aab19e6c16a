use ckb_jsonrpc_types::FeeRateDef;
use ckb_types::core::FeeRate;
use serde::{Deserialize, Serialize};

// default fee rate, 1000 shannons per kilobyte
const DEFAULT_FEE_RATE: FeeRate = FeeRate::from_u64(1000);

/// Transaction builder configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TxBuilderConfig {
    /// The fee rate in shannons per kilobyte.
    #[serde(with = "FeeRateDef", default = "default_fee_rate")]
    pub fee_rate: FeeRate,
    /// Give up after pulling this many cells from the cell source.
    ///
    /// Pre-selected inputs are not counted. No limit by default.
    #[serde(default)]
    pub max_scanned_cells: Option<usize>,
}

fn default_fee_rate() -> FeeRate {
    DEFAULT_FEE_RATE
}

impl Default for TxBuilderConfig {
    fn default() -> Self {
        TxBuilderConfig {
            fee_rate: DEFAULT_FEE_RATE,
            max_scanned_cells: None,
        }
    }
}

impl TxBuilderConfig {
    pub fn with_fee_rate(fee_rate: u64) -> Self {
        TxBuilderConfig {
            fee_rate: FeeRate::from_u64(fee_rate),
            ..Default::default()
        }
    }
}
