// Copyright (c) 2022 MASSA LABS <info@massa.net>

use zelt_time::ZeltTime;

/// Bootstrap configuration
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Whether a replica without a local checkpoint may adopt a snapshot
    /// published by a peer instead of replaying from genesis.
    ///
    /// This is a trust-on-first-use choice: the peer snapshot is adopted
    /// without verification and only the log tail after its cursor is
    /// replayed locally. It changes the trust model and is therefore
    /// opt-in, never a silent fallback.
    pub bootstrap_from_peer: bool,
    /// peer replicas to try, in order
    pub bootstrap_peers: Vec<String>,
    /// delay between two peer attempts
    pub retry_delay: ZeltTime,
    /// timeout applied to every snapshot download
    pub request_timeout: ZeltTime,
}
