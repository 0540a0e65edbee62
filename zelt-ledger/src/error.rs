// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This file defines all error types for ledger management

use displaydoc::Display;
use thiserror::Error;
use zelt_models::address::Address;

/// Errors of the ledger component
#[non_exhaustive]
#[derive(Display, Error, Debug)]
pub enum LedgerError {
    /// insufficient funds for address {0}
    InsufficientFunds(Address),
    /// balance overflow for address {0}
    BalanceOverflow(Address),
    /// checkpoint file error: {0}
    FileError(String),
    /// corrupt checkpoint snapshot: {0}
    CorruptSnapshot(String),
    /// time error: {0}
    TimeError(#[from] zelt_time::TimeError),
}
