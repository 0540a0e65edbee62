// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Peer snapshot download.

use crate::error::BootstrapError;
use zelt_ledger::LedgerSnapshot;
use zelt_time::ZeltTime;

/// Fetches a published ledger snapshot from a peer replica
pub trait SnapshotProvider: Send + Sync {
    /// Downloads the most recent snapshot published by `peer`
    fn fetch_snapshot(&self, peer: &str) -> Result<LedgerSnapshot, BootstrapError>;
}

/// `SnapshotProvider` downloading the snapshot file a peer replica serves
/// over HTTP
#[derive(Debug)]
pub struct HttpSnapshotClient {
    client: reqwest::blocking::Client,
}

impl HttpSnapshotClient {
    /// Builds a snapshot client with the given per-request timeout
    pub fn new(request_timeout: ZeltTime) -> Result<Self, BootstrapError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(request_timeout.to_duration())
            .build()
            .map_err(|err| BootstrapError::GeneralError(format!("client setup error: {}", err)))?;
        Ok(HttpSnapshotClient { client })
    }
}

impl SnapshotProvider for HttpSnapshotClient {
    fn fetch_snapshot(&self, peer: &str) -> Result<LedgerSnapshot, BootstrapError> {
        let url = format!("{}/snapshot", peer);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| BootstrapError::PeerError(format!("{}: {}", peer, err)))?;
        if !response.status().is_success() {
            return Err(BootstrapError::PeerError(format!(
                "{}: status {}",
                peer,
                response.status()
            )));
        }
        response
            .json()
            .map_err(|err| BootstrapError::PeerError(format!("{}: body decode error: {}", peer, err)))
    }
}
