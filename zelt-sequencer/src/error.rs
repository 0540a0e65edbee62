// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use thiserror::Error;

/// Errors of the sequencer client.
///
/// Every variant is recoverable: a failed fetch produces no batch and the
/// caller retries the same cursor later, so indices are never skipped.
#[non_exhaustive]
#[derive(Display, Error, Debug)]
pub enum SequencerError {
    /// sequencer unreachable: {0}
    FetchError(String),
    /// unexpected sequencer response: {0}
    ResponseError(String),
}
