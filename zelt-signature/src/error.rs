// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use thiserror::Error;

/// Errors of the signature component
#[non_exhaustive]
#[derive(Display, Error, Debug)]
pub enum ZeltSignatureError {
    /// parsing error: {0}
    ParsingError(String),
    /// secp256k1 engine error: {0}
    EngineError(#[from] secp256k1::Error),
}
