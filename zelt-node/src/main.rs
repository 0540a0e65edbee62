// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Replica node entry point: bootstraps the ledger state, launches the
//! replication worker and runs until interrupted, then shuts the worker
//! down cleanly (which writes a final checkpoint).

mod settings;

use crate::settings::SETTINGS;
use std::str::FromStr;
use std::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::filter::EnvFilter;
use zelt_bootstrap::{get_state, BootstrapConfig, HttpSnapshotClient};
use zelt_ledger::{LedgerConfig, SnapshotStore};
use zelt_models::address::Address;
use zelt_models::config::{TOKEN_NAME, TOTAL_SUPPLY};
use zelt_replication::{start_replication_worker, ReplicationConfig};
use zelt_sequencer::{HttpSequencerClient, SequencerConfig};

fn run() {
    let ledger_config = LedgerConfig {
        genesis_address: Address::from_str(&SETTINGS.ledger.genesis_address)
            .expect("invalid genesis address in configuration"),
        total_supply: TOTAL_SUPPLY,
    };
    let snapshot_store = SnapshotStore::new(SETTINGS.ledger.snapshot_path.clone());

    // establish the state to start following from
    let bootstrap_config = BootstrapConfig {
        bootstrap_from_peer: SETTINGS.bootstrap.bootstrap_from_peer,
        bootstrap_peers: SETTINGS.bootstrap.bootstrap_peers.clone(),
        retry_delay: SETTINGS.bootstrap.retry_delay,
        request_timeout: SETTINGS.bootstrap.request_timeout,
    };
    let snapshot_provider = HttpSnapshotClient::new(bootstrap_config.request_timeout)
        .expect("could not build the bootstrap client");
    let final_state = match get_state(
        &bootstrap_config,
        &snapshot_store,
        ledger_config,
        &snapshot_provider,
    ) {
        Ok(final_state) => final_state,
        Err(err) => {
            error!("state bootstrap failed: {}", err);
            std::process::exit(1);
        }
    };
    info!(
        "{} replica starting at cursor {} ({} accounts)",
        TOKEN_NAME,
        final_state.cursor,
        final_state.ledger.len()
    );

    // launch the replication worker
    let sequencer = HttpSequencerClient::new(SequencerConfig {
        base_url: SETTINGS.sequencer.base_url.clone(),
        app_name: SETTINGS.sequencer.app_name.clone(),
        request_timeout: SETTINGS.sequencer.request_timeout,
    })
    .expect("could not build the sequencer client");
    let replication_config = ReplicationConfig {
        poll_interval: SETTINGS.replication.poll_interval,
        stall_backoff: SETTINGS.replication.stall_backoff,
        stall_backoff_max: SETTINGS.replication.stall_backoff_max,
        snapshot_batch_interval: SETTINGS.replication.snapshot_batch_interval,
        snapshot_period: SETTINGS.replication.snapshot_period,
    };
    let (_replication_controller, mut replication_manager) = start_replication_worker(
        replication_config,
        final_state,
        Box::new(sequencer),
        snapshot_store,
    );

    // run until interrupted
    let (stop_tx, stop_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .expect("could not set the interrupt handler");
    let _ = stop_rx.recv();
    info!("interrupt signal received");

    replication_manager.stop();
}

fn main() {
    let default_level = match SETTINGS.logging.level {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    run();
}
