// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Checkpoint snapshot persistence.
//!
//! A snapshot is the unit of crash recovery: a self-consistent
//! `(balances, cursor)` pair serialized to a single JSON file. The file is
//! replaced atomically (write to a temporary sibling, fsync, rename) so
//! that a crash during a checkpoint can never leave a truncated snapshot
//! behind: on restart the replica sees either the previous snapshot or the
//! new one, never a mix.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use zelt_models::address::Address;
use zelt_models::amount::Amount;
use zelt_models::cursor::Cursor;
use zelt_time::ZeltTime;

/// A point-in-time, self-consistent view of the ledger state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// full address to balance mapping
    pub balances: BTreeMap<Address, Amount>,
    /// index of the last batch applied to `balances`
    pub cursor: Cursor,
    /// wall-clock creation time, informational only
    pub created_at: ZeltTime,
}

/// Persists and loads `LedgerSnapshot`s at a fixed filesystem path
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    /// path of the snapshot file
    path: PathBuf,
}

impl SnapshotStore {
    /// Creates a store writing to (and reading from) `path`
    pub fn new(path: PathBuf) -> Self {
        SnapshotStore { path }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically writes a snapshot, replacing any previous one
    pub fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerError> {
        let tmp_path = PathBuf::from(format!("{}.tmp", self.path.display()));
        let file = File::create(&tmp_path).map_err(|err| {
            LedgerError::FileError(format!(
                "error creating temporary snapshot file {}: {}",
                tmp_path.display(),
                err
            ))
        })?;
        serde_json::to_writer(&file, snapshot).map_err(|err| {
            LedgerError::FileError(format!(
                "error writing snapshot file {}: {}",
                tmp_path.display(),
                err
            ))
        })?;
        file.sync_all().map_err(|err| {
            LedgerError::FileError(format!(
                "error syncing snapshot file {}: {}",
                tmp_path.display(),
                err
            ))
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|err| {
            LedgerError::FileError(format!(
                "error installing snapshot file {}: {}",
                self.path.display(),
                err
            ))
        })
    }

    /// Loads the current snapshot.
    ///
    /// Returns `Ok(None)` when no snapshot file exists yet. A file that
    /// exists but cannot be read or parsed is an error, not `None`:
    /// falling back to genesis on a corrupt checkpoint would duplicate the
    /// supply, so the caller must surface it to the operator instead.
    pub fn load(&self) -> Result<Option<LedgerSnapshot>, LedgerError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(LedgerError::FileError(format!(
                    "error reading snapshot file {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };
        serde_json::from_slice(&data).map(Some).map_err(|err| {
            LedgerError::CorruptSnapshot(format!(
                "error parsing snapshot file {}: {}",
                self.path.display(),
                err
            ))
        })
    }
}
