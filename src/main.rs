// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/main.rs
// Version: 1.0.1
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// Startup sequence for the NimiqPocket miner client: load the configuration,
// connect the consensus node feed, build the device identity, select the
// closest pool server, derive the start difficulty, and hand the session to
// the orchestrator. Anything that fails in this sequence is fatal and exits
// with status 1; in steady state the process runs until terminated.

use clap::Parser;
use nimiqpocket_miner::Result;
use nimiqpocket_miner::core::config::{DEFAULT_SERVERS, MinerConfig, POOL_PORT};
use nimiqpocket_miner::core::device::{DeviceIdentity, MINER_VERSION};
use nimiqpocket_miner::core::difficulty::start_difficulty;
use nimiqpocket_miner::core::types::{Args, DeviceData};
use nimiqpocket_miner::miner::SessionOrchestrator;
use nimiqpocket_miner::node::NodeClient;
use nimiqpocket_miner::pool::{PoolSession, ServerFinder};
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = match MinerConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("❌ {}", e);
            std::process::exit(1);
        }
    };
    config.apply_overrides(&args);

    if let Err(e) = run(config).await {
        error!("💥 Fatal startup error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: MinerConfig) -> Result<()> {
    let address = config.payout_address()?;

    // The node feed is the source of every lifecycle event; its first
    // connect also yields the network identity behind the device id.
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    info!("🔌 Connecting to consensus node at {}", config.node);
    let network_identity = NodeClient::new(&config.node).start(events_tx.clone()).await?;

    let identity = DeviceIdentity::build(&config.name, &network_identity);

    // Selection is advisory: a pinned server wins, the ranking is only logged
    let candidates: Vec<String> = DEFAULT_SERVERS.iter().map(|host| host.to_string()).collect();
    let ranked = ServerFinder::default()
        .find_closest_servers(&candidates, config.port)
        .await;
    let host = match &config.server {
        Some(pinned) => {
            if let Some(closest) = ranked.first() {
                info!("📍 Closest server would be {}, staying on pinned {}", closest.host, pinned);
            }
            pinned.clone()
        }
        None => {
            let closest = ranked
                .first()
                .map(|server| server.host.clone())
                .unwrap_or_else(|| candidates[0].clone());
            info!("📍 Closest server: {}", closest);
            closest
        }
    };

    let device_data = DeviceData {
        device_name: identity.device_name.clone(),
        start_difficulty: start_difficulty(config.hashrate),
        miner_version: MINER_VERSION.to_string(),
    };

    info!("🚀 NimiqPocket {} starting", MINER_VERSION);
    info!("- pool server      = {}:{}", host, POOL_PORT);
    info!("- address          = {}", address);
    info!("- device name      = {}", identity.device_name);
    info!("- device id        = {}", identity.device_id_hex());

    let session = PoolSession::new(
        address,
        identity.device_id,
        device_data,
        config.devices,
        config.memory,
        events_tx,
    );

    SessionOrchestrator::new(session, host, POOL_PORT).run(events_rx).await
}

// Changelog:
// - v1.0.1 (2026-08-27): Banner now prints the device id in hex.
// - v1.0.0 (2026-08-27): Initial startup sequence.
//   - Config load with exit(1) on failure, node feed bootstrap, device
//     identity, latency-based server selection, startup banner, orchestrator
//     hand-off.
