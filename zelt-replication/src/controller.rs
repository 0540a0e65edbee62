// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This module implements the replication controller and manager.
//! The controller gives read access to the replicated state from any
//! thread; the manager allows stopping the replication worker.

use parking_lot::{Condvar, Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use tracing::info;
use zelt_ledger::{FinalState, LedgerError, LedgerSnapshot};
use zelt_models::address::Address;
use zelt_models::amount::Amount;
use zelt_models::cursor::Cursor;

/// Replication progress as seen from outside the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicationStatus {
    /// state recovery is still in progress, no fetch has completed yet
    Bootstrapping,
    /// the replica follows the sequencer log
    Following,
    /// the last fetch failed, the replica is retrying with backoff
    Stalled,
}

impl fmt::Display for ReplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplicationStatus::Bootstrapping => write!(f, "bootstrapping"),
            ReplicationStatus::Following => write!(f, "following"),
            ReplicationStatus::Stalled => write!(f, "stalled"),
        }
    }
}

/// Interface used to read the replicated state.
///
/// Reads never block batch application for longer than one in-flight
/// batch: they see the last settled state, never a half-applied batch.
pub trait ReplicationController: Send + Sync {
    /// Gets the settled balance of an address, zero for unknown addresses
    fn get_balance(&self, address: &Address) -> Amount;

    /// Gets the index of the last settled batch
    fn get_cursor(&self) -> Cursor;

    /// Gets the current replication status
    fn get_status(&self) -> ReplicationStatus;

    /// Takes a self-consistent snapshot of the settled state, suitable
    /// for serving to bootstrapping peers
    fn get_snapshot(&self) -> Result<LedgerSnapshot, LedgerError>;

    /// Returns a boxed clone of self.
    /// Allows cloning `Box<dyn ReplicationController>`.
    fn clone_box(&self) -> Box<dyn ReplicationController>;
}

impl Clone for Box<dyn ReplicationController> {
    fn clone(&self) -> Box<dyn ReplicationController> {
        self.clone_box()
    }
}

/// structure used to communicate with the replication thread
pub(crate) struct ReplicationInputData {
    /// set stop to true to stop the thread
    pub stop: bool,
}

/// implementation of the replication controller
#[derive(Clone)]
pub struct ReplicationControllerImpl {
    /// replicated final state, shared with the replication thread
    pub(crate) final_state: Arc<RwLock<FinalState>>,
    /// current replication status, written by the replication thread
    pub(crate) status: Arc<RwLock<ReplicationStatus>>,
}

impl ReplicationController for ReplicationControllerImpl {
    fn get_balance(&self, address: &Address) -> Amount {
        self.final_state.read().ledger.get_balance(address)
    }

    fn get_cursor(&self) -> Cursor {
        self.final_state.read().cursor
    }

    fn get_status(&self) -> ReplicationStatus {
        *self.status.read()
    }

    fn get_snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        self.final_state.read().to_snapshot()
    }

    fn clone_box(&self) -> Box<dyn ReplicationController> {
        Box::new(self.clone())
    }
}

/// Interface used to stop the replication worker
pub trait ReplicationManager {
    /// Stops the worker, writing a final checkpoint before returning
    fn stop(&mut self);
}

/// Replication manager
/// Allows stopping the replication worker
pub struct ReplicationManagerImpl {
    /// input data to process in the replication loop
    /// with a wake-up condition variable that needs to be triggered when the data changes
    pub(crate) input_data: Arc<(Condvar, Mutex<ReplicationInputData>)>,
    /// handle used to join the worker thread
    pub(crate) thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl ReplicationManager for ReplicationManagerImpl {
    fn stop(&mut self) {
        info!("stopping replication worker...");
        // notify the worker thread to stop
        {
            let mut input_wlock = self.input_data.1.lock();
            input_wlock.stop = true;
            self.input_data.0.notify_one();
        }
        // join the replication thread
        if let Some(join_handle) = self.thread_handle.take() {
            join_handle
                .join()
                .expect("replication worker thread panicked");
        }
        info!("replication worker stopped");
    }
}
