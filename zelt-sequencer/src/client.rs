// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This module exports the generic trait representing the interface with
//! the external ordering service (the sequencer).

use crate::error::SequencerError;
use zelt_models::cursor::Cursor;

/// One totally ordered batch as assigned by the sequencer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencedBatch {
    /// monotonic index assigned by the sequencer
    pub index: Cursor,
    /// opaque batch payload: a JSON array of transaction records
    pub payload: Vec<u8>,
}

/// Interface that pulls ordered batches from the sequencer log.
///
/// `fetch_batches(after)` returns the batches whose indices directly
/// follow `after`, strictly increasing and contiguous. An empty result
/// means no new batch exists yet and the caller should poll again after
/// its poll interval: together with polling this realizes an unbounded,
/// resumable sequence of `(payload, index)` pairs. Implementations must
/// never skip or reorder indices; on transient failure they return a
/// `SequencerError` and produce nothing for that attempt.
pub trait SequencerClient: Send + Sync {
    /// Polls for the batches ordered directly after the `after` cursor
    fn fetch_batches(&self, after: Cursor) -> Result<Vec<SequencedBatch>, SequencerError>;
}
