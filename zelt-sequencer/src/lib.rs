// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Client side of the external ordering service: the replication engine
//! consumes ordered batches through the `SequencerClient` trait, and the
//! HTTP implementation polls the sequencer's batch listing endpoint.
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod client;
mod error;
mod http_client;

pub use client::{SequencedBatch, SequencerClient};
pub use error::SequencerError;
pub use http_client::{HttpSequencerClient, SequencerConfig};
