// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::error::ModelsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of the last batch fully applied by a replica.
///
/// The sequencer assigns each batch a monotonically increasing index
/// starting at 1; `Cursor::GENESIS` (0) means no batch has been applied.
/// The cursor only ever moves forward, and a given index is applied to the
/// ledger at most once.
#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cursor(u64);

impl Cursor {
    /// Cursor of a freshly genesis-initialized replica: nothing applied yet
    pub const GENESIS: Cursor = Cursor(0);

    /// Builds a cursor pointing at a given batch index
    pub const fn new(index: u64) -> Self {
        Cursor(index)
    }

    /// The raw batch index
    pub const fn to_index(&self) -> u64 {
        self.0
    }

    /// Index of the next batch to apply
    pub fn checked_next(&self) -> Result<Cursor, ModelsError> {
        self.0
            .checked_add(1)
            .map(Cursor)
            .ok_or(ModelsError::CursorOverflowError)
    }

    /// Number of batches applied since `earlier` (saturating at zero)
    pub fn batches_since(&self, earlier: &Cursor) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
