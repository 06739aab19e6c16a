use crate::SignerError;
use ckb_assembler_types::{
    witness::{update_field, WitnessEnvelope, WitnessField},
    ScriptGroup,
};
use ckb_types::{bytes::Bytes, core::TransactionView, packed, prelude::*};

/// The view of a transaction given to the signer of one script group.
///
/// The transaction fields are read only. Witnesses are read from the working copy, which already
/// contains what the signers of the previous groups wrote, and only the witnesses at the input
/// indices of the group can be written.
pub struct SigningTransaction<'a> {
    tx: &'a TransactionView,
    witnesses: &'a mut Vec<packed::Bytes>,
    script_group: &'a ScriptGroup,
}

impl<'a> SigningTransaction<'a> {
    pub fn new(
        tx: &'a TransactionView,
        witnesses: &'a mut Vec<packed::Bytes>,
        script_group: &'a ScriptGroup,
    ) -> Self {
        SigningTransaction {
            tx,
            witnesses,
            script_group,
        }
    }

    /// The transaction. Its witnesses may be outdated, use [`Self::witness`] instead.
    pub fn tx(&self) -> &TransactionView {
        self.tx
    }

    pub fn script_group(&self) -> &ScriptGroup {
        self.script_group
    }

    pub fn witnesses_len(&self) -> usize {
        self.witnesses.len()
    }

    pub fn witness(&self, index: usize) -> Option<Bytes> {
        self.witnesses.get(index).map(|witness| witness.raw_data())
    }

    /// Replaces the witness at `index`, which must be an input of the group.
    pub fn set_witness(&mut self, index: usize, witness: Bytes) -> Result<(), SignerError> {
        if !self.script_group.contains_input(index) {
            return Err(SignerError::WitnessOutOfGroup(index));
        }
        if self.witnesses.len() <= index {
            self.witnesses.resize(index + 1, packed::Bytes::default());
        }
        self.witnesses[index] = witness.pack();
        Ok(())
    }

    /// Replaces one `WitnessArgs` field of the witness at `index`.
    pub fn set_witness_field(
        &mut self,
        index: usize,
        field: WitnessField,
        value: Bytes,
    ) -> Result<(), SignerError> {
        let current = self.witness(index).unwrap_or_default();
        let updated = update_field(&current, field, value)?;
        self.set_witness(index, updated)
    }

    /// Replaces the lock placeholder of the group witness, which must have the same length.
    ///
    /// Returns `false` when the group has no input.
    pub fn fill_lock_placeholder(&mut self, lock: Bytes) -> Result<bool, SignerError> {
        let index = match self.script_group.witness_index() {
            Some(index) => index,
            None => return Ok(false),
        };
        let current = self.witness(index).unwrap_or_default();
        let envelope = WitnessEnvelope::unpack_or_default(&current)?;
        let actual = envelope.lock.as_ref().map(Bytes::len);
        if actual != Some(lock.len()) {
            return Err(SignerError::PlaceholderMismatch {
                expected: lock.len(),
                actual,
            });
        }
        self.set_witness_field(index, WitnessField::Lock, lock)?;
        Ok(true)
    }
}
