use super::ScriptSigner;
use crate::{SignContext, SignerError, SigningTransaction};
use ckb_assembler_types::witness::{update_field, WitnessField};
use ckb_crypto::secp::Privkey;
use ckb_hash::{blake2b_256, new_blake2b};
use ckb_types::{bytes::Bytes, prelude::*, H256};

const SIGNATURE_SIZE: usize = 65;
const BLAKE160_SIZE: usize = 20;

/// Signs the secp256k1 blake160 sighash all lock.
///
/// The lock args are the first 20 bytes of the blake2b hash of the compressed public key. Groups
/// whose args do not match the context key are left to other contexts.
#[derive(Default)]
pub struct Secp256k1Blake160SighashAllSigner;

impl Secp256k1Blake160SighashAllSigner {
    pub fn new() -> Self {
        Secp256k1Blake160SighashAllSigner
    }
}

fn blake160_of(key: &Privkey) -> Result<[u8; BLAKE160_SIZE], SignerError> {
    let pubkey = key
        .pubkey()
        .map_err(|err| SignerError::Secp(err.to_string()))?;
    let hash = blake2b_256(pubkey.serialize());
    let mut blake160 = [0u8; BLAKE160_SIZE];
    blake160.copy_from_slice(&hash[..BLAKE160_SIZE]);
    Ok(blake160)
}

/// The message signed for the group.
///
/// It hashes the transaction hash, then every witness of the group and every witness without
/// input, each prefixed by its length as a little endian `u64`. The lock of the first group
/// witness is zero filled in the message.
pub fn sighash_all_message(tx: &SigningTransaction<'_>) -> Result<H256, SignerError> {
    let group = tx.script_group();
    let first = group
        .witness_index()
        .ok_or_else(|| SignerError::Other("script group has no input".to_owned()))?;
    let first_witness = update_field(
        &tx.witness(first).unwrap_or_default(),
        WitnessField::Lock,
        Bytes::from(vec![0u8; SIGNATURE_SIZE]),
    )?;

    let mut hasher = new_blake2b();
    hasher.update(tx.tx().hash().as_slice());
    let mut hash_witness = |witness: &[u8]| {
        hasher.update(&(witness.len() as u64).to_le_bytes());
        hasher.update(witness);
    };
    hash_witness(&first_witness);
    for index in group.input_indices.iter().skip(1) {
        hash_witness(&tx.witness(*index).unwrap_or_default());
    }
    for index in tx.tx().inputs().len()..tx.witnesses_len() {
        hash_witness(&tx.witness(index).unwrap_or_default());
    }
    let mut message = [0u8; 32];
    hasher.finalize(&mut message);
    Ok(H256(message))
}

impl ScriptSigner for Secp256k1Blake160SighashAllSigner {
    fn name(&self) -> &str {
        "secp256k1_blake160_sighash_all"
    }

    fn sign(
        &self,
        tx: &mut SigningTransaction<'_>,
        context: &SignContext,
    ) -> Result<bool, SignerError> {
        let key = match context.key() {
            Some(key) => key,
            None => return Ok(false),
        };
        let args = tx.script_group().script.args().raw_data();
        if args.as_ref() != blake160_of(key)?.as_slice() {
            return Ok(false);
        }
        let message = sighash_all_message(tx)?;
        let signature = key
            .sign_recoverable(&message)
            .map_err(|err| SignerError::Secp(err.to_string()))?;
        tx.fill_lock_placeholder(Bytes::from(signature.serialize()))
    }
}
