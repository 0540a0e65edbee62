// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use thiserror::Error;

/// Reasons a transaction record is rejected before touching the ledger.
///
/// A rejected record is skipped and logged; it never aborts the batch it
/// belongs to and never stops the replication loop.
#[non_exhaustive]
#[derive(Clone, Display, Error, Debug)]
pub enum ValidationError {
    /// record decode error: {0}
    DecodeError(String),
    /// transfer {0} has a zero amount
    ZeroAmount(String),
    /// transfer {0} carries an invalid signature: {1}
    InvalidSignature(String, String),
}
