// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Blocking HTTP implementation of the sequencer client.

use crate::client::{SequencedBatch, SequencerClient};
use crate::error::SequencerError;
use serde::Deserialize;
use tracing::debug;
use zelt_models::cursor::Cursor;
use zelt_time::ZeltTime;

/// Sequencer connection configuration
#[derive(Debug, Clone)]
pub struct SequencerConfig {
    /// base URL of the sequencer node, e.g. `http://127.0.0.1:6001`
    pub base_url: String,
    /// application namespace under which batches are sequenced
    pub app_name: String,
    /// timeout applied to every fetch request
    pub request_timeout: ZeltTime,
}

/// One entry of the sequencer's batch listing
#[derive(Debug, Deserialize)]
struct BatchEntry {
    /// batch index assigned by the sequencer
    index: u64,
    /// batch payload: a JSON array of records, encoded as a string
    batch: String,
}

/// `SequencerClient` implementation polling the sequencer's HTTP API
#[derive(Debug)]
pub struct HttpSequencerClient {
    config: SequencerConfig,
    client: reqwest::blocking::Client,
}

impl HttpSequencerClient {
    /// Builds a client from a sequencer configuration
    pub fn new(config: SequencerConfig) -> Result<Self, SequencerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout.to_duration())
            .build()
            .map_err(|err| SequencerError::FetchError(format!("client setup error: {}", err)))?;
        Ok(HttpSequencerClient { config, client })
    }
}

impl SequencerClient for HttpSequencerClient {
    fn fetch_batches(&self, after: Cursor) -> Result<Vec<SequencedBatch>, SequencerError> {
        let url = format!(
            "{}/node/{}/batches?after={}",
            self.config.base_url, self.config.app_name, after
        );
        debug!("fetching sequenced batches after {}", after);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| SequencerError::FetchError(format!("fetch error: {}", err)))?;
        if !response.status().is_success() {
            return Err(SequencerError::ResponseError(format!(
                "sequencer returned status {}",
                response.status()
            )));
        }
        let entries: Vec<BatchEntry> = response
            .json()
            .map_err(|err| SequencerError::ResponseError(format!("body decode error: {}", err)))?;
        Ok(entries
            .into_iter()
            .map(|entry| SequencedBatch {
                index: Cursor::new(entry.index),
                payload: entry.batch.into_bytes(),
            })
            .collect())
    }
}
