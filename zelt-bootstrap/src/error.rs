// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use thiserror::Error;

/// Errors while bootstrapping the replica state
#[non_exhaustive]
#[derive(Display, Error, Debug)]
pub enum BootstrapError {
    /// general bootstrap error: {0}
    GeneralError(String),
    /// local checkpoint is corrupt and requires operator resolution: {0}
    CorruptCheckpoint(String),
    /// error reading local checkpoint: {0}
    CheckpointError(String),
    /// peer snapshot error: {0}
    PeerError(String),
}
