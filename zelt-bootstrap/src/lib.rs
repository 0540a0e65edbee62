// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Bootstrap of the replica state at process start.
//!
//! Recovery sources are tried in a fixed order:
//! 1. the local checkpoint snapshot, when one exists. A checkpoint that
//!    exists but cannot be read or parsed is fatal: silently falling back
//!    to genesis would credit the supply a second time, so the operator
//!    must resolve it (delete the file to force a verified bootstrap, or
//!    restore it from a backup);
//! 2. a snapshot downloaded from a peer replica, only when explicitly
//!    enabled (trust-on-first-use, see `BootstrapConfig`);
//! 3. genesis initialization.
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod client;
mod error;
mod settings;

pub use client::{HttpSnapshotClient, SnapshotProvider};
pub use error::BootstrapError;
pub use settings::BootstrapConfig;

use tracing::{info, warn};
use zelt_ledger::{FinalState, LedgerConfig, LedgerError, SnapshotStore};

/// Establishes the consistent `(balances, cursor)` pair the replication
/// engine starts following from.
pub fn get_state(
    config: &BootstrapConfig,
    store: &SnapshotStore,
    ledger_config: LedgerConfig,
    provider: &dyn SnapshotProvider,
) -> Result<FinalState, BootstrapError> {
    // local checkpoint first
    match store.load() {
        Ok(Some(snapshot)) => {
            info!(
                "restored checkpoint at cursor {} ({} accounts)",
                snapshot.cursor,
                snapshot.balances.len()
            );
            return Ok(FinalState::from_snapshot(ledger_config, snapshot));
        }
        Ok(None) => {}
        Err(LedgerError::CorruptSnapshot(msg)) => {
            return Err(BootstrapError::CorruptCheckpoint(msg));
        }
        Err(err) => {
            return Err(BootstrapError::CheckpointError(err.to_string()));
        }
    }

    // then peer bootstrap, only when explicitly opted in
    if config.bootstrap_from_peer {
        let snapshot = fetch_from_peers(config, provider)?;
        warn!(
            "adopting unverified peer snapshot at cursor {} (trust-on-first-use); \
             the log tail after it will be replayed locally",
            snapshot.cursor
        );
        return Ok(FinalState::from_snapshot(ledger_config, snapshot));
    }

    // otherwise this is a fresh replica: genesis
    info!(
        "no checkpoint found, initializing genesis state for address {}",
        ledger_config.genesis_address
    );
    Ok(FinalState::new_genesis(ledger_config))
}

/// Tries every configured peer in order, first success wins
fn fetch_from_peers(
    config: &BootstrapConfig,
    provider: &dyn SnapshotProvider,
) -> Result<zelt_ledger::LedgerSnapshot, BootstrapError> {
    if config.bootstrap_peers.is_empty() {
        return Err(BootstrapError::GeneralError(
            "peer bootstrap is enabled but no bootstrap peer is configured".to_string(),
        ));
    }
    let mut last_error = None;
    for (attempt, peer) in config.bootstrap_peers.iter().enumerate() {
        if attempt > 0 {
            std::thread::sleep(config.retry_delay.to_duration());
        }
        match provider.fetch_snapshot(peer) {
            Ok(snapshot) => {
                info!("downloaded snapshot from peer {}", peer);
                return Ok(snapshot);
            }
            Err(err) => {
                warn!("bootstrap peer failed: {}", err);
                last_error = Some(err);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| {
        BootstrapError::GeneralError("no bootstrap peer could be reached".to_string())
    }))
}

#[cfg(test)]
mod tests;
