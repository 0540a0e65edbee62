// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This module runs the replication thread: the single writer of the
//! ledger. It pulls ordered batches from the sequencer, validates their
//! records outside the state lock, applies and settles them under a short
//! write section, and checkpoints the state on a batch-count or
//! wall-clock cadence.

use crate::config::ReplicationConfig;
use crate::controller::{
    ReplicationController, ReplicationControllerImpl, ReplicationInputData, ReplicationManager,
    ReplicationManagerImpl, ReplicationStatus,
};
use crate::validator;
use parking_lot::{Condvar, Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use zelt_ledger::{FinalState, SnapshotStore};
use zelt_models::cursor::Cursor;
use zelt_sequencer::{SequencedBatch, SequencerClient};
use zelt_time::ZeltTime;

/// structure gathering all elements needed by the replication thread
pub(crate) struct ReplicationThread {
    // replication config
    config: ReplicationConfig,
    // data exchanged with the manager, with its wake-up condition variable
    input_data: Arc<(Condvar, Mutex<ReplicationInputData>)>,
    // replicated final state, shared with controllers
    final_state: Arc<RwLock<FinalState>>,
    // replication status, read by controllers
    status: Arc<RwLock<ReplicationStatus>>,
    // ordered batch source
    sequencer: Box<dyn SequencerClient>,
    // checkpoint persistence
    snapshot_store: SnapshotStore,
    // cursor of the last written checkpoint
    last_snapshot_cursor: Cursor,
    // wall-clock time of the last written checkpoint
    last_snapshot_time: ZeltTime,
    // current retry delay after a failed fetch
    backoff: ZeltTime,
}

impl ReplicationThread {
    /// Waits for `delay` or until the manager wakes the thread up.
    /// Returns true when a stop was requested.
    fn wait_or_stop(&self, delay: ZeltTime) -> bool {
        let mut input_lock = self.input_data.1.lock();
        if input_lock.stop {
            return true;
        }
        let _ = self
            .input_data
            .0
            .wait_for(&mut input_lock, delay.to_duration());
        input_lock.stop
    }

    fn stop_requested(&self) -> bool {
        self.input_data.1.lock().stop
    }

    fn set_status(&self, status: ReplicationStatus) {
        *self.status.write() = status;
    }

    /// Applies one sequenced batch to the final state.
    ///
    /// Returns false when the rest of the fetch response must be dropped
    /// because this batch does not directly follow the settled cursor.
    fn apply_batch(&self, batch: &SequencedBatch) -> bool {
        let settled = self.final_state.read().cursor;
        if batch.index <= settled {
            // already settled, the fetch raced a previous application
            warn!(
                "skipping batch {}: cursor is already at {}",
                batch.index, settled
            );
            return true;
        }
        let expected = match settled.checked_next() {
            Ok(expected) => expected,
            Err(err) => {
                error!("cannot advance past cursor {}: {}", settled, err);
                return false;
            }
        };
        if batch.index > expected {
            warn!(
                "sequencer returned batch {} while {} was expected, dropping the rest of the response",
                batch.index, expected
            );
            return false;
        }

        // validation is stateless and runs before the write lock is taken
        let accepted = match validator::validate_batch(&batch.payload) {
            Ok(accepted) => accepted,
            Err(err) => {
                // the batch index is consumed either way, so an undecodable
                // payload settles empty instead of wedging the replica
                warn!("batch {} payload rejected, settling it empty: {}", batch.index, err);
                Vec::new()
            }
        };

        // apply and settle under a single write section so that readers
        // never observe a half-applied batch
        let mut state = self.final_state.write();
        for transfer in accepted {
            match state
                .ledger
                .apply_transfer(&transfer.sender, &transfer.recipient, transfer.amount)
            {
                Ok(()) => debug!(
                    "applied transfer {}: {} -> {} ({})",
                    transfer.tx_id, transfer.sender, transfer.recipient, transfer.amount
                ),
                Err(err) => warn!("rejecting transfer {}: {}", transfer.tx_id, err),
            }
        }
        state.settle(batch.index);
        true
    }

    /// Writes a checkpoint when the batch-count or wall-clock cadence says
    /// one is due
    fn checkpoint_if_due(&mut self) {
        let cursor = self.final_state.read().cursor;
        if cursor == self.last_snapshot_cursor {
            return;
        }
        let now = match ZeltTime::now() {
            Ok(now) => now,
            Err(err) => {
                warn!("cannot read current time, skipping checkpoint: {}", err);
                return;
            }
        };
        let due_by_count =
            cursor.batches_since(&self.last_snapshot_cursor) >= self.config.snapshot_batch_interval;
        let due_by_time = now.saturating_sub(self.last_snapshot_time) >= self.config.snapshot_period;
        if due_by_count || due_by_time {
            self.write_checkpoint();
        }
    }

    /// Writes a checkpoint of the settled state.
    /// A write failure is logged and retried at the next cadence point, it
    /// never stops replication.
    fn write_checkpoint(&mut self) {
        let snapshot = match self.final_state.read().to_snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("cannot snapshot the state: {}", err);
                return;
            }
        };
        match self.snapshot_store.save(&snapshot) {
            Ok(()) => {
                info!(
                    "checkpointed state at cursor {} ({} accounts)",
                    snapshot.cursor,
                    snapshot.balances.len()
                );
                self.last_snapshot_cursor = snapshot.cursor;
                self.last_snapshot_time = snapshot.created_at;
            }
            Err(err) => {
                warn!("checkpoint write failed, will retry: {}", err);
            }
        }
    }

    /// Replication thread main loop
    pub fn main_loop(mut self) {
        info!("replication thread started");
        loop {
            if self.stop_requested() {
                break;
            }
            let after = self.final_state.read().cursor;
            match self.sequencer.fetch_batches(after) {
                Err(err) => {
                    self.set_status(ReplicationStatus::Stalled);
                    warn!("sequencer fetch after cursor {} failed: {}", after, err);
                    let backoff = self.backoff;
                    if self.wait_or_stop(backoff) {
                        break;
                    }
                    self.backoff = std::cmp::min(
                        self.backoff.saturating_mul(2),
                        self.config.stall_backoff_max,
                    );
                }
                Ok(batches) if batches.is_empty() => {
                    self.set_status(ReplicationStatus::Following);
                    self.backoff = self.config.stall_backoff;
                    if self.wait_or_stop(self.config.poll_interval) {
                        break;
                    }
                }
                Ok(batches) => {
                    self.set_status(ReplicationStatus::Following);
                    self.backoff = self.config.stall_backoff;
                    for batch in &batches {
                        if !self.apply_batch(batch) {
                            break;
                        }
                    }
                    self.checkpoint_if_due();
                }
            }
        }
        // final checkpoint so a clean shutdown never loses settled batches
        if self.final_state.read().cursor != self.last_snapshot_cursor {
            self.write_checkpoint();
        }
        info!("replication thread stopped");
    }
}

/// Launches the replication worker and returns a pair
/// `(replication controller, replication manager)`
/// allowing to interact with it.
///
/// # Arguments
/// * `config`: replication configuration
/// * `final_state`: bootstrapped state the worker starts following from
/// * `sequencer`: client pulling ordered batches from the sequencer
/// * `snapshot_store`: checkpoint persistence
pub fn start_replication_worker(
    config: ReplicationConfig,
    final_state: FinalState,
    sequencer: Box<dyn SequencerClient>,
    snapshot_store: SnapshotStore,
) -> (Box<dyn ReplicationController>, Box<dyn ReplicationManager>) {
    let input_data = Arc::new((
        Condvar::new(),
        Mutex::new(ReplicationInputData { stop: false }),
    ));
    let status = Arc::new(RwLock::new(ReplicationStatus::Bootstrapping));
    let last_snapshot_cursor = final_state.cursor;
    let final_state = Arc::new(RwLock::new(final_state));

    let controller = ReplicationControllerImpl {
        final_state: final_state.clone(),
        status: status.clone(),
    };

    let thread = ReplicationThread {
        backoff: config.stall_backoff,
        config,
        input_data: input_data.clone(),
        final_state,
        status,
        sequencer,
        snapshot_store,
        last_snapshot_cursor,
        last_snapshot_time: ZeltTime::now().unwrap_or_default(),
    };
    let thread_handle = std::thread::Builder::new()
        .name("replication".into())
        .spawn(move || thread.main_loop())
        .expect("could not spawn the replication thread");

    let manager = ReplicationManagerImpl {
        input_data,
        thread_handle: Some(thread_handle),
    };

    (Box::new(controller), Box::new(manager))
}
