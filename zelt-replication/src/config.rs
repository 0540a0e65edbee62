// Copyright (c) 2022 MASSA LABS <info@massa.net>

use zelt_time::ZeltTime;

/// Replication engine configuration
#[derive(Debug, Clone)]
pub struct ReplicationConfig {
    /// delay before polling the sequencer again after an empty fetch
    pub poll_interval: ZeltTime,
    /// initial delay before retrying after a failed fetch
    pub stall_backoff: ZeltTime,
    /// upper bound of the retry delay; the delay doubles after every
    /// consecutive failure and resets on the first success
    pub stall_backoff_max: ZeltTime,
    /// number of settled batches after which a checkpoint is written
    pub snapshot_batch_interval: u64,
    /// wall-clock interval after which a checkpoint is written even if
    /// fewer than `snapshot_batch_interval` batches were settled
    pub snapshot_period: ZeltTime,
}
