// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::tests::mock::{batch_of, fresh_address, signed_transfer, MockSequencerClient};
use crate::{start_replication_worker, validate_batch, validate_record, ReplicationConfig, ReplicationStatus};
use std::time::Duration;
use tempfile::TempDir;
use zelt_ledger::{FinalState, LedgerConfig, SnapshotStore};
use zelt_models::address::Address;
use zelt_models::amount::Amount;
use zelt_models::config::TOTAL_SUPPLY;
use zelt_models::cursor::Cursor;
use zelt_sequencer::{SequencedBatch, SequencerError};
use zelt_signature::KeyPair;
use zelt_time::ZeltTime;

fn test_config() -> ReplicationConfig {
    ReplicationConfig {
        poll_interval: ZeltTime::from_millis(10),
        stall_backoff: ZeltTime::from_millis(5),
        stall_backoff_max: ZeltTime::from_millis(20),
        // cadence disabled unless a test opts in
        snapshot_batch_interval: u64::MAX,
        snapshot_period: ZeltTime::from_millis(u64::MAX),
    }
}

/// Genesis state whose supply is controlled by the returned keypair
fn genesis_state() -> (KeyPair, Address, FinalState) {
    let keypair = KeyPair::generate();
    let genesis_address = Address::from_public_key(&keypair.get_public_key());
    let config = LedgerConfig {
        genesis_address: genesis_address.clone(),
        total_supply: TOTAL_SUPPLY,
    };
    let state = FinalState::new_genesis(config);
    (keypair, genesis_address, state)
}

fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..500 {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn test_applies_sequenced_transfer() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("snapshot.json"));
    let (keypair, genesis_address, state) = genesis_state();
    let recipient = fresh_address();

    let batch = batch_of(
        1,
        &[signed_transfer(&keypair, &recipient, Amount::from_raw(500), "tx-1")],
    );
    let sequencer = MockSequencerClient::new(vec![Ok(vec![batch])]);

    let (controller, mut manager) =
        start_replication_worker(test_config(), state, Box::new(sequencer), store);

    assert!(wait_until(|| controller.get_cursor() == Cursor::new(1)));
    assert_eq!(controller.get_balance(&recipient), Amount::from_raw(500));
    assert_eq!(
        controller.get_balance(&genesis_address),
        TOTAL_SUPPLY.saturating_sub(Amount::from_raw(500))
    );
    assert_eq!(controller.get_status(), ReplicationStatus::Following);
    manager.stop();
}

#[test]
fn test_insufficient_funds_settles_without_effect() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("snapshot.json"));
    let (_genesis_keypair, genesis_address, state) = genesis_state();

    // pauper has no balance at all
    let pauper = KeyPair::generate();
    let recipient = fresh_address();
    let batch = batch_of(
        1,
        &[signed_transfer(&pauper, &recipient, Amount::from_raw(1), "tx-broke")],
    );
    let sequencer = MockSequencerClient::new(vec![Ok(vec![batch])]);

    let (controller, mut manager) =
        start_replication_worker(test_config(), state, Box::new(sequencer), store);

    // the batch index is consumed even though its only transfer is rejected
    assert!(wait_until(|| controller.get_cursor() == Cursor::new(1)));
    assert_eq!(controller.get_balance(&recipient), Amount::zero());
    assert_eq!(controller.get_balance(&genesis_address), TOTAL_SUPPLY);
    manager.stop();
}

#[test]
fn test_invalid_signature_settles_without_effect() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("snapshot.json"));
    let (keypair, genesis_address, state) = genesis_state();
    let recipient = fresh_address();

    // signed by the genesis key but claiming another sender: the funds of
    // the claimed sender must not move
    let mut forged = signed_transfer(&keypair, &recipient, Amount::from_raw(500), "tx-forged");
    forged.sender = fresh_address();
    let batch = batch_of(1, &[forged]);
    let sequencer = MockSequencerClient::new(vec![Ok(vec![batch])]);

    let (controller, mut manager) =
        start_replication_worker(test_config(), state, Box::new(sequencer), store);

    assert!(wait_until(|| controller.get_cursor() == Cursor::new(1)));
    assert_eq!(controller.get_balance(&recipient), Amount::zero());
    assert_eq!(controller.get_balance(&genesis_address), TOTAL_SUPPLY);
    manager.stop();
}

#[test]
fn test_duplicate_batch_applied_once() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("snapshot.json"));
    let (keypair, _genesis_address, state) = genesis_state();
    let recipient = fresh_address();

    let batch_1 = batch_of(
        1,
        &[signed_transfer(&keypair, &recipient, Amount::from_raw(500), "tx-1")],
    );
    let batch_2 = batch_of(
        2,
        &[signed_transfer(&keypair, &recipient, Amount::from_raw(100), "tx-2")],
    );
    // the second fetch re-serves batch 1: it must be skipped, not re-applied
    let sequencer = MockSequencerClient::new(vec![
        Ok(vec![batch_1.clone()]),
        Ok(vec![batch_1, batch_2]),
    ]);

    let (controller, mut manager) =
        start_replication_worker(test_config(), state, Box::new(sequencer), store);

    assert!(wait_until(|| controller.get_cursor() == Cursor::new(2)));
    assert_eq!(controller.get_balance(&recipient), Amount::from_raw(600));
    manager.stop();
}

#[test]
fn test_index_gap_drops_remainder_until_refetched() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("snapshot.json"));
    let (keypair, _genesis_address, state) = genesis_state();
    let recipient = fresh_address();

    let batch_1 = batch_of(
        1,
        &[signed_transfer(&keypair, &recipient, Amount::from_raw(500), "tx-1")],
    );
    let batch_2 = batch_of(
        2,
        &[signed_transfer(&keypair, &recipient, Amount::from_raw(100), "tx-2")],
    );
    let batch_3 = batch_of(
        3,
        &[signed_transfer(&keypair, &recipient, Amount::from_raw(10), "tx-3")],
    );
    // first response skips index 2: batch 3 must be dropped and re-served
    let sequencer = MockSequencerClient::new(vec![
        Ok(vec![batch_1, batch_3.clone()]),
        Ok(vec![batch_2, batch_3]),
    ]);

    let (controller, mut manager) =
        start_replication_worker(test_config(), state, Box::new(sequencer), store);

    assert!(wait_until(|| controller.get_cursor() == Cursor::new(3)));
    assert_eq!(controller.get_balance(&recipient), Amount::from_raw(610));
    manager.stop();
}

#[test]
fn test_stall_then_recover() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("snapshot.json"));
    let (keypair, _genesis_address, state) = genesis_state();
    let recipient = fresh_address();

    let batch = batch_of(
        1,
        &[signed_transfer(&keypair, &recipient, Amount::from_raw(500), "tx-1")],
    );
    let sequencer = MockSequencerClient::new(vec![
        Err(SequencerError::FetchError("connection refused".to_string())),
        Err(SequencerError::FetchError("connection refused".to_string())),
        Ok(vec![batch]),
    ]);

    let (controller, mut manager) =
        start_replication_worker(test_config(), state, Box::new(sequencer), store);

    assert!(wait_until(|| controller.get_cursor() == Cursor::new(1)));
    assert_eq!(controller.get_status(), ReplicationStatus::Following);
    assert_eq!(controller.get_balance(&recipient), Amount::from_raw(500));
    manager.stop();
}

#[test]
fn test_undecodable_payload_settles_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("snapshot.json"));
    let (keypair, genesis_address, state) = genesis_state();
    let recipient = fresh_address();

    let garbage = SequencedBatch {
        index: Cursor::new(1),
        payload: b"this is not json".to_vec(),
    };
    let batch_2 = batch_of(
        2,
        &[signed_transfer(&keypair, &recipient, Amount::from_raw(500), "tx-1")],
    );
    let sequencer = MockSequencerClient::new(vec![Ok(vec![garbage, batch_2])]);

    let (controller, mut manager) =
        start_replication_worker(test_config(), state, Box::new(sequencer), store);

    // batch 1 settles empty, batch 2 applies normally after it
    assert!(wait_until(|| controller.get_cursor() == Cursor::new(2)));
    assert_eq!(controller.get_balance(&recipient), Amount::from_raw(500));
    assert_eq!(
        controller.get_balance(&genesis_address),
        TOTAL_SUPPLY.saturating_sub(Amount::from_raw(500))
    );
    manager.stop();
}

#[test]
fn test_checkpoint_written_on_batch_cadence() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("snapshot.json"));
    let (keypair, _genesis_address, state) = genesis_state();
    let recipient = fresh_address();

    let batch = batch_of(
        1,
        &[signed_transfer(&keypair, &recipient, Amount::from_raw(500), "tx-1")],
    );
    let sequencer = MockSequencerClient::new(vec![Ok(vec![batch])]);
    let mut config = test_config();
    config.snapshot_batch_interval = 1;

    let (controller, mut manager) =
        start_replication_worker(config, state, Box::new(sequencer), store.clone());

    assert!(wait_until(|| controller.get_cursor() == Cursor::new(1)));
    assert!(wait_until(|| matches!(store.load(), Ok(Some(_)))));
    let snapshot = store.load().unwrap().unwrap();
    assert_eq!(snapshot.cursor, Cursor::new(1));
    assert_eq!(snapshot.balances.get(&recipient), Some(&Amount::from_raw(500)));
    manager.stop();
}

#[test]
fn test_final_checkpoint_on_stop() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("snapshot.json"));
    let (keypair, _genesis_address, state) = genesis_state();
    let recipient = fresh_address();

    let batch = batch_of(
        1,
        &[signed_transfer(&keypair, &recipient, Amount::from_raw(500), "tx-1")],
    );
    let sequencer = MockSequencerClient::new(vec![Ok(vec![batch])]);
    // cadence never fires: only the shutdown checkpoint can write the file
    let (controller, mut manager) =
        start_replication_worker(test_config(), state, Box::new(sequencer), store.clone());

    assert!(wait_until(|| controller.get_cursor() == Cursor::new(1)));
    assert!(store.load().unwrap().is_none());
    manager.stop();

    let snapshot = store.load().unwrap().unwrap();
    assert_eq!(snapshot.cursor, Cursor::new(1));
    assert_eq!(snapshot.balances.get(&recipient), Some(&Amount::from_raw(500)));
}

#[test]
fn test_validate_batch_skips_bad_records() {
    let keypair = KeyPair::generate();
    let recipient = fresh_address();
    let good = signed_transfer(&keypair, &recipient, Amount::from_raw(500), "tx-good");
    let zero = signed_transfer(&keypair, &recipient, Amount::zero(), "tx-zero");
    let mut forged = signed_transfer(&keypair, &recipient, Amount::from_raw(7), "tx-forged");
    forged.sender = fresh_address();

    let payload = serde_json::to_vec(&[zero, good.clone(), forged]).unwrap();
    let accepted = validate_batch(&payload).unwrap();
    assert_eq!(accepted, vec![good]);
}

#[test]
fn test_validate_record_rejects_zero_amount() {
    let keypair = KeyPair::generate();
    let recipient = fresh_address();
    let zero = signed_transfer(&keypair, &recipient, Amount::zero(), "tx-zero");
    let raw = serde_json::value::to_raw_value(&zero).unwrap();
    let err = validate_record(&raw).unwrap_err();
    assert!(err.to_string().contains("zero amount"));
}

#[test]
fn test_validate_record_rejects_wrong_length_signature() {
    let keypair = KeyPair::generate();
    let recipient = fresh_address();
    let transfer = signed_transfer(&keypair, &recipient, Amount::from_raw(5), "tx-short");
    // a 3-byte signature cannot even decode, the record is rejected
    let record = serde_json::to_string(&transfer)
        .unwrap()
        .replace(transfer.signature.to_base64().as_str(), "AAAA");
    let raw = serde_json::value::RawValue::from_string(record).unwrap();
    assert!(matches!(
        validate_record(&raw),
        Err(crate::ValidationError::DecodeError(_))
    ));
}

#[test]
fn test_validate_batch_rejects_non_array_payload() {
    assert!(validate_batch(b"{\"not\":\"an array\"}").is_err());
    assert!(validate_batch(b"garbage").is_err());
}

#[test]
fn test_snapshot_plus_tail_equals_full_replay() {
    let (keypair, genesis_address, mut full) = genesis_state();
    let recipient_1 = fresh_address();
    let recipient_2 = fresh_address();
    let batch_1 = batch_of(
        1,
        &[signed_transfer(&keypair, &recipient_1, Amount::from_raw(500), "tx-1")],
    );
    let batch_2 = batch_of(
        2,
        &[signed_transfer(&keypair, &recipient_2, Amount::from_raw(100), "tx-2")],
    );

    let apply = |state: &mut FinalState, batch: &SequencedBatch| {
        for transfer in validate_batch(&batch.payload).unwrap() {
            state
                .ledger
                .apply_transfer(&transfer.sender, &transfer.recipient, transfer.amount)
                .unwrap();
        }
        state.settle(batch.index);
    };

    // full replay from genesis
    apply(&mut full, &batch_1);
    let snapshot = full.to_snapshot().unwrap();
    apply(&mut full, &batch_2);

    // bootstrap from the mid-log snapshot and replay only the tail
    let config = LedgerConfig {
        genesis_address,
        total_supply: TOTAL_SUPPLY,
    };
    let mut bootstrapped = FinalState::from_snapshot(config, snapshot);
    apply(&mut bootstrapped, &batch_2);

    assert_eq!(bootstrapped.cursor, full.cursor);
    assert_eq!(bootstrapped.ledger, full.ledger);
    assert_eq!(bootstrapped.ledger.total(), TOTAL_SUPPLY);
}
