// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Test helpers: a scripted sequencer and signed record builders.

use parking_lot::Mutex;
use std::collections::VecDeque;
use zelt_models::address::Address;
use zelt_models::amount::Amount;
use zelt_models::cursor::Cursor;
use zelt_models::transfer::{transfer_message, Transfer};
use zelt_sequencer::{SequencedBatch, SequencerClient, SequencerError};
use zelt_signature::KeyPair;
use zelt_time::ZeltTime;

/// `SequencerClient` replaying a scripted list of fetch responses, then
/// returning empty fetches forever
pub struct MockSequencerClient {
    responses: Mutex<VecDeque<Result<Vec<SequencedBatch>, SequencerError>>>,
}

impl MockSequencerClient {
    pub fn new(responses: Vec<Result<Vec<SequencedBatch>, SequencerError>>) -> Self {
        MockSequencerClient {
            responses: Mutex::new(responses.into()),
        }
    }
}

impl SequencerClient for MockSequencerClient {
    fn fetch_batches(&self, _after: Cursor) -> Result<Vec<SequencedBatch>, SequencerError> {
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Builds a correctly signed transfer from the keypair owning `sender`
pub fn signed_transfer(keypair: &KeyPair, recipient: &Address, amount: Amount, tx_id: &str) -> Transfer {
    let signature = keypair
        .sign(&transfer_message(recipient, amount))
        .expect("signing failed");
    Transfer {
        tx_id: tx_id.to_string(),
        sender: Address::from_public_key(&keypair.get_public_key()),
        recipient: recipient.clone(),
        amount,
        timestamp: ZeltTime::from_millis(1_700_000_000_000),
        signature,
    }
}

/// Serializes transfers into a batch payload at the given index
pub fn batch_of(index: u64, transfers: &[Transfer]) -> SequencedBatch {
    SequencedBatch {
        index: Cursor::new(index),
        payload: serde_json::to_vec(transfers).expect("serialization failed"),
    }
}

pub fn fresh_address() -> Address {
    Address::from_public_key(&KeyPair::generate().get_public_key())
}
