// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This file defines the final state of a replica: the final ledger and
//! the cursor of the last batch applied to it. The pair is kept
//! self-consistent at all times, can be checkpointed, and can bootstrap
//! other replicas.

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::final_ledger::FinalLedger;
use crate::snapshot::LedgerSnapshot;
use zelt_models::cursor::Cursor;
use zelt_time::ZeltTime;

/// Represents the final state `(ledger, cursor)` of a replica
#[derive(Debug, Clone)]
pub struct FinalState {
    /// ledger configuration
    #[allow(dead_code)]
    config: LedgerConfig,
    /// index of the last batch applied to `ledger`
    pub cursor: Cursor,
    /// final ledger associating addresses to their balances
    pub ledger: FinalLedger,
}

impl FinalState {
    /// Initializes a genesis `FinalState`: the entire supply on the
    /// genesis address, cursor at zero.
    ///
    /// Must only be called when no checkpoint exists anywhere, otherwise
    /// the supply would be credited twice.
    pub fn new_genesis(config: LedgerConfig) -> Self {
        let ledger = FinalLedger::new_genesis(&config);
        FinalState {
            config,
            cursor: Cursor::GENESIS,
            ledger,
        }
    }

    /// Restores a `FinalState` from a checkpoint or peer-provided snapshot
    pub fn from_snapshot(config: LedgerConfig, snapshot: LedgerSnapshot) -> Self {
        FinalState {
            config,
            cursor: snapshot.cursor,
            ledger: FinalLedger::from_balances(snapshot.balances),
        }
    }

    /// Takes a self-consistent snapshot of the state, suitable for
    /// checkpointing or for bootstrapping another replica
    pub fn to_snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        Ok(LedgerSnapshot {
            balances: self.ledger.balances().clone(),
            cursor: self.cursor,
            created_at: ZeltTime::now()?,
        })
    }

    /// Settles a fully applied batch, advancing the cursor. This is the
    /// only place the cursor changes.
    ///
    /// Panics if `cursor` does not move strictly forward: the engine never
    /// re-requests an already settled index, so a regression here means
    /// the replication invariants are already broken.
    pub fn settle(&mut self, cursor: Cursor) {
        if cursor <= self.cursor {
            panic!(
                "attempting to settle batch {} while the cursor is already at {}",
                cursor, self.cursor
            );
        }
        self.cursor = cursor;
    }
}
