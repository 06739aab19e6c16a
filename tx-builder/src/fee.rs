use crate::TxData;
use ckb_types::core::{FeeRate, TransactionView};

const KB: u64 = 1000;

/// Computes the minimal fee of a transaction.
///
/// The fee is `ceil(size * fee_rate / 1000)`, where the size is the serialized transaction size
/// in a block, including the 4 bytes offset of the transactions vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeCalculator {
    fee_rate: u64,
}

impl FeeCalculator {
    pub fn new(fee_rate: FeeRate) -> Self {
        FeeCalculator {
            fee_rate: fee_rate.as_u64(),
        }
    }

    pub fn fee_rate(&self) -> u64 {
        self.fee_rate
    }

    /// The fee of a transaction of `size` bytes, rounded up.
    pub fn fee(&self, size: usize) -> u64 {
        self.fee_rate.saturating_mul(size as u64).div_ceil(KB)
    }

    pub fn fee_with_tx_data(&self, tx_data: &TxData) -> u64 {
        self.fee(tx_data.serialized_size())
    }

    pub fn fee_with_tx_view(&self, tx: &TransactionView) -> u64 {
        self.fee(tx.data().serialized_size_in_block())
    }
}
