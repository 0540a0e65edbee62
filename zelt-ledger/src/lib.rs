// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! This crate implements the token balance ledger, the replica final
//! state attached to it, and the checkpoint snapshot store.
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod config;
mod error;
mod final_ledger;
mod final_state;
mod snapshot;

pub use config::LedgerConfig;
pub use error::LedgerError;
pub use final_ledger::FinalLedger;
pub use final_state::FinalState;
pub use snapshot::{LedgerSnapshot, SnapshotStore};

#[cfg(test)]
mod tests;
