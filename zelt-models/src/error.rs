// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use thiserror::Error;

/// models error
#[non_exhaustive]
#[derive(Display, Error, Debug)]
pub enum ModelsError {
    /// amount parse error: {0}
    AmountParseError(String),
    /// address parse error: {0}
    AddressParseError(String),
    /// checked operation error: {0}
    CheckedOperationError(String),
    /// cursor overflow error
    CursorOverflowError,
    /// signature error: {0}
    SignatureError(#[from] zelt_signature::ZeltSignatureError),
    /// time error: {0}
    TimeError(#[from] zelt_time::TimeError),
}
