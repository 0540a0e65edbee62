// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Replication engine.
//!
//! A dedicated worker thread is the single writer of the ledger: it pulls
//! ordered batches from the sequencer, validates every transaction record
//! (decode, positive amount, signature) outside the state lock, applies
//! the accepted transfers and settles the batch cursor under one write
//! section, and periodically checkpoints the state. Every replica applies
//! the same records in the same order and therefore computes the same
//! balances.
//!
//! Reads go through [ReplicationController], which can be cloned and
//! shared across threads.
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod config;
mod controller;
mod error;
mod validator;
mod worker;

pub use config::ReplicationConfig;
pub use controller::{ReplicationController, ReplicationManager, ReplicationStatus};
pub use error::ValidationError;
pub use validator::{decode_batch, validate_batch, validate_record};
pub use worker::start_replication_worker;

#[cfg(test)]
mod tests;
