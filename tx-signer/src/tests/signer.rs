use ckb_assembler_types::{
    witness::{pack_int, unpack_int},
    ScriptGroupType,
};
use ckb_crypto::secp::Privkey;
use ckb_hash::blake2b_256;
use ckb_types::{bytes::Bytes, packed::Script, H256};
use proptest::prelude::*;

use super::{
    built_tx, diff_script_id, input, input_cells, output, sighash_script_id, witness_lock,
    SHANNONS_PER_CKB,
};
use crate::signer::{sighash_all_message, CapacityDiffSigner, Secp256k1Blake160SighashAllSigner};
use crate::{
    ScriptSigner, SignContext, SignerError, SigningTransaction, TransactionSigner,
    TransactionSignerError,
};

fn ckb(amount: u64) -> u64 {
    amount * SHANNONS_PER_CKB
}

fn privkey(byte: u8) -> Privkey {
    Privkey::from(H256([byte; 32]))
}

fn sighash_lock(key: &Privkey) -> Script {
    let pubkey = key.pubkey().unwrap();
    sighash_script_id().script(&blake2b_256(pubkey.serialize())[..20])
}

fn placeholder_len(script: &Script) -> usize {
    if diff_script_id().matches(script) {
        8
    } else {
        65
    }
}

fn registry() -> TransactionSigner {
    let mut signer = TransactionSigner::new();
    signer.register_lock_signer(sighash_script_id(), Secp256k1Blake160SighashAllSigner::new());
    signer.register_lock_signer(diff_script_id(), CapacityDiffSigner::new());
    signer
}

#[test]
fn test_capacity_diff_is_negative_when_spending() {
    let diff = diff_script_id().script(b"");
    let change = sighash_lock(&privkey(0x11));
    let inputs = vec![input(&diff, 0, ckb(1000))];
    let outputs = vec![output(&diff, ckb(500)), output(&change, ckb(499))];
    let mut tx = built_tx(&inputs, &outputs, &placeholder_len);
    let before = tx.tx_view().witnesses().get(0).unwrap().raw_data();
    assert_eq!(witness_lock(&tx, 0), Some(Bytes::from(vec![0u8; 8])));

    let context = SignContext::new().with_input_cells(input_cells(&inputs));
    let signed = registry().sign_transaction(&mut tx, &context).unwrap();
    assert_eq!(signed, vec![0]);

    let lock = witness_lock(&tx, 0).unwrap();
    assert_eq!(lock, pack_int(-50_000_000_000i64));
    assert_eq!(lock.as_ref(), &(-50_000_000_000i64).to_le_bytes()[..]);
    let after = tx.tx_view().witnesses().get(0).unwrap().raw_data();
    assert_eq!(before.len(), after.len());
}

#[test]
fn test_capacity_diff_sums_group_inputs_and_locked_outputs() {
    let diff = diff_script_id().script(b"");
    let other = diff_script_id().script(b"other");
    let inputs = vec![
        input(&diff, 0, ckb(300)),
        input(&other, 1, ckb(5000)),
        input(&diff, 2, ckb(200)),
    ];
    let outputs = vec![
        output(&diff, ckb(700)),
        output(&other, ckb(4000)),
        output(&diff, ckb(100)),
    ];
    let mut tx = built_tx(&inputs, &outputs, &placeholder_len);

    let context = SignContext::new().with_input_cells(input_cells(&inputs));
    let signed = registry().sign_transaction(&mut tx, &context).unwrap();
    assert_eq!(signed, vec![0, 1]);
    assert_eq!(witness_lock(&tx, 0), Some(pack_int(ckb(300) as i64)));
    assert_eq!(witness_lock(&tx, 1), Some(pack_int(-(ckb(1000) as i64))));
    // not the first input of its group
    assert_eq!(tx.tx_view().witnesses().get(2).unwrap().raw_data(), Bytes::new());
}

#[test]
fn test_capacity_diff_requires_input_cells() {
    let diff = diff_script_id().script(b"");
    let inputs = vec![input(&diff, 0, ckb(1000))];
    let mut tx = built_tx(&inputs, &[output(&diff, ckb(500))], &placeholder_len);

    let err = registry()
        .sign_transaction(&mut tx, &SignContext::new())
        .unwrap_err();
    let TransactionSignerError::Signer {
        signer,
        script_hash,
        group_type,
        source,
    } = err;
    assert_eq!(signer, "capacity_diff");
    assert_eq!(script_hash, diff.calc_script_hash());
    assert_eq!(group_type, ScriptGroupType::Lock);
    assert_eq!(source, SignerError::MissingCapability("input cells"));
}

#[test]
fn test_sighash_signature_recovers_to_the_key() {
    let key = privkey(0x11);
    let lock = sighash_lock(&key);
    let inputs = vec![input(&lock, 0, ckb(100)), input(&lock, 1, ckb(100))];
    let mut tx = built_tx(&inputs, &[output(&lock, ckb(150))], &placeholder_len);

    let message = {
        let mut witnesses = tx.witnesses();
        let group = tx.script_groups()[0].clone();
        let signing = SigningTransaction::new(tx.tx_view(), &mut witnesses, &group);
        sighash_all_message(&signing).unwrap()
    };

    let signed = registry()
        .sign_transaction(&mut tx, &SignContext::new().with_key(privkey(0x11)))
        .unwrap();
    assert_eq!(signed, vec![0]);

    let signature = witness_lock(&tx, 0).unwrap();
    assert_eq!(signature.len(), 65);
    let signature = ckb_crypto::secp::Signature::from_slice(&signature).unwrap();
    let pubkey = signature.recover(&message).unwrap();
    assert_eq!(pubkey, key.pubkey().unwrap());

    // the message does not depend on the lock being filled
    let mut witnesses = tx.witnesses();
    let group = tx.script_groups()[0].clone();
    let signing = SigningTransaction::new(tx.tx_view(), &mut witnesses, &group);
    assert_eq!(sighash_all_message(&signing).unwrap(), message);
}

#[test]
fn test_sighash_skips_other_keys() {
    let lock = sighash_lock(&privkey(0x11));
    let inputs = vec![input(&lock, 0, ckb(100))];
    let mut tx = built_tx(&inputs, &[output(&lock, ckb(50))], &placeholder_len);

    let signer = registry();
    let signed = signer
        .sign_transaction(&mut tx, &SignContext::new().with_key(privkey(0x22)))
        .unwrap();
    assert!(signed.is_empty());
    let signed = signer.sign_transaction(&mut tx, &SignContext::new()).unwrap();
    assert!(signed.is_empty());
    assert_eq!(witness_lock(&tx, 0), Some(Bytes::from(vec![0u8; 65])));
}

#[test]
fn test_signing_with_one_context_per_key() {
    let alice = sighash_lock(&privkey(0x11));
    let bob = sighash_lock(&privkey(0x22));
    let inputs = vec![input(&alice, 0, ckb(100)), input(&bob, 1, ckb(100))];
    let mut tx = built_tx(&inputs, &[output(&alice, ckb(150))], &placeholder_len);

    let signer = registry();
    let signed = signer
        .sign_transaction(&mut tx, &SignContext::new().with_key(privkey(0x22)))
        .unwrap();
    assert_eq!(signed, vec![1]);
    let signed = signer
        .sign_transaction(&mut tx, &SignContext::new().with_key(privkey(0x11)))
        .unwrap();
    assert_eq!(signed, vec![0]);
    assert_ne!(witness_lock(&tx, 0), Some(Bytes::from(vec![0u8; 65])));
    assert_ne!(witness_lock(&tx, 1), Some(Bytes::from(vec![0u8; 65])));
}

struct Misbehaving;

impl ScriptSigner for Misbehaving {
    fn name(&self) -> &str {
        "misbehaving"
    }

    fn sign(
        &self,
        tx: &mut SigningTransaction<'_>,
        _context: &SignContext,
    ) -> Result<bool, SignerError> {
        tx.set_witness(0, Bytes::from_static(b"hijacked"))?;
        Ok(true)
    }
}

#[test]
fn test_earlier_groups_keep_their_witnesses_on_error() {
    let diff = diff_script_id().script(b"");
    let rogue_id = ckb_assembler_types::ScriptId::new_type(H256([0x66; 32]));
    let rogue = rogue_id.script(b"");
    let inputs = vec![input(&diff, 0, ckb(100)), input(&rogue, 1, ckb(100))];
    let mut tx = built_tx(&inputs, &[output(&diff, ckb(150))], &placeholder_len);

    let mut signer = registry();
    signer.register_lock_signer(rogue_id, Misbehaving);
    let context = SignContext::new().with_input_cells(input_cells(&inputs));
    let err = signer.sign_transaction(&mut tx, &context).unwrap_err();
    let TransactionSignerError::Signer { signer, source, .. } = err;
    assert_eq!(signer, "misbehaving");
    assert_eq!(source, SignerError::WitnessOutOfGroup(0));

    assert_eq!(witness_lock(&tx, 0), Some(pack_int(ckb(50) as i64)));
}

#[test]
fn test_last_registration_wins() {
    let mut signer = TransactionSigner::new();
    assert!(signer
        .register_lock_signer(diff_script_id(), Misbehaving)
        .is_none());
    let replaced = signer.register_lock_signer(diff_script_id(), CapacityDiffSigner::new());
    assert_eq!(replaced.map(|old| old.name().to_owned()), Some("misbehaving".to_owned()));

    let diff = diff_script_id().script(b"");
    let tx = built_tx(&[input(&diff, 0, 100)], &[output(&diff, 100)], &placeholder_len);
    let group = &tx.script_groups()[0];
    assert_eq!(signer.signer(group).map(|s| s.name()), Some("capacity_diff"));
    // lock and type signers are separate
    let type_group = ckb_assembler_types::ScriptGroup::from_type_script(&diff);
    assert!(signer.signer(&type_group).is_none());
}

struct PayloadSigner;

impl ScriptSigner for PayloadSigner {
    fn name(&self) -> &str {
        "payload"
    }

    fn sign(
        &self,
        tx: &mut SigningTransaction<'_>,
        context: &SignContext,
    ) -> Result<bool, SignerError> {
        let lock = context
            .payload::<Bytes>()
            .ok_or(SignerError::MissingCapability("payload"))?;
        tx.fill_lock_placeholder(lock.clone())
    }
}

#[test]
fn test_custom_signer_reads_payload() {
    let id = ckb_assembler_types::ScriptId::new_type(H256([0x77; 32]));
    let lock = id.script(b"");
    let inputs = vec![input(&lock, 0, ckb(100))];
    let mut tx = built_tx(&inputs, &[output(&lock, ckb(50))], &|_| 3);

    let mut signer = TransactionSigner::new();
    signer.register_lock_signer(id, PayloadSigner);
    let context = SignContext::new().with_payload(Bytes::from_static(b"abc"));
    assert_eq!(signer.sign_transaction(&mut tx, &context).unwrap(), vec![0]);
    assert_eq!(witness_lock(&tx, 0), Some(Bytes::from_static(b"abc")));

    let context = SignContext::new().with_payload(42u32);
    assert!(signer.sign_transaction(&mut tx, &context).is_err());
}

proptest! {
    #[test]
    fn capacity_diff_matches_arithmetic(
        input_capacities in proptest::collection::vec(0u64..ckb(10_000_000), 1..5),
        output_capacities in proptest::collection::vec(0u64..ckb(10_000_000), 0..5),
    ) {
        let diff = diff_script_id().script(b"");
        let inputs: Vec<_> = input_capacities
            .iter()
            .enumerate()
            .map(|(index, capacity)| input(&diff, index as u32, *capacity))
            .collect();
        let outputs: Vec<_> = output_capacities
            .iter()
            .map(|capacity| output(&diff, *capacity))
            .collect();
        let mut tx = built_tx(&inputs, &outputs, &placeholder_len);

        let context = SignContext::new().with_input_cells(input_cells(&inputs));
        registry().sign_transaction(&mut tx, &context).unwrap();

        let expected = output_capacities.iter().sum::<u64>() as i64
            - input_capacities.iter().sum::<u64>() as i64;
        let lock = witness_lock(&tx, 0).unwrap();
        prop_assert_eq!(unpack_int::<i64>(&lock).unwrap(), expected);
    }
}

#[test]
fn test_capacity_diff_overflow_is_an_internal_error() {
    let diff = diff_script_id().script(b"");
    let inputs = vec![input(&diff, 0, ckb(100))];
    let outputs = vec![output(&diff, u64::MAX)];
    let mut tx = built_tx(&inputs, &outputs, &placeholder_len);

    let context = SignContext::new().with_input_cells(input_cells(&inputs));
    let err = registry().sign_transaction(&mut tx, &context).unwrap_err();
    assert!(matches!(
        err,
        TransactionSignerError::Signer {
            source: SignerError::CapacityOverflow,
            ..
        }
    ));

    let err = ckb_assembler_error::Error::from(err);
    assert_eq!(err.kind(), ckb_assembler_error::ErrorKind::Internal);
}
