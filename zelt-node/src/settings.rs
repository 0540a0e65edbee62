// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Node configuration, merged from:
//! 1. the file at `ZELT_CONFIG_PATH` (`base_config/config.toml` by default)
//! 2. the override file `config/config.toml`, when present
//! 3. environment variables prefixed with `ZELT_NODE`
//!
//! Durations are expressed in milliseconds.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use zelt_time::ZeltTime;

lazy_static::lazy_static! {
    pub static ref SETTINGS: Settings = build_settings();
}

const OVERRIDE_CONFIG_PATH: &str = "config/config.toml";

fn build_settings() -> Settings {
    let config_path = std::env::var("ZELT_CONFIG_PATH")
        .unwrap_or_else(|_| "base_config/config.toml".to_string());
    let mut builder =
        config::Config::builder().add_source(config::File::with_name(&config_path));
    if Path::new(OVERRIDE_CONFIG_PATH).is_file() {
        builder = builder.add_source(config::File::with_name(OVERRIDE_CONFIG_PATH));
    }
    let settings = builder
        .add_source(config::Environment::with_prefix("ZELT_NODE"))
        .build()
        .expect("could not read the node configuration");
    settings
        .try_deserialize()
        .expect("invalid node configuration")
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct LoggingSettings {
    pub level: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerSettings {
    /// address credited with the entire supply at genesis
    pub genesis_address: String,
    /// path of the checkpoint snapshot file
    pub snapshot_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SequencerSettings {
    /// base URL of the sequencer node
    pub base_url: String,
    /// application namespace under which batches are sequenced
    pub app_name: String,
    pub request_timeout: ZeltTime,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapSettings {
    /// whether to adopt a peer snapshot when no local checkpoint exists
    pub bootstrap_from_peer: bool,
    pub bootstrap_peers: Vec<String>,
    pub retry_delay: ZeltTime,
    pub request_timeout: ZeltTime,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplicationSettings {
    pub poll_interval: ZeltTime,
    pub stall_backoff: ZeltTime,
    pub stall_backoff_max: ZeltTime,
    pub snapshot_batch_interval: u64,
    pub snapshot_period: ZeltTime,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub ledger: LedgerSettings,
    pub sequencer: SequencerSettings,
    pub bootstrap: BootstrapSettings,
    pub replication: ReplicationSettings,
}
