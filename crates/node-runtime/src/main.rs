//! # Quantum-Chain Node Runtime
//!
//! Entry point for a single consensus/block-production core node (spec
//! §1): wires subsystems A through G into a [`container::NodeContainer`]
//! and drives its proposer-duty tick loop until interrupted.
//!
//! RPC/API, P2P networking, block/transaction indexing, wallet key
//! management and light-client support are out of scope here (spec §1
//! Non-goals) — this binary only casts, verifies and finalizes blocks
//! against its own in-memory state.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tracing::info;

use node_runtime::config::NodeConfig;
use node_runtime::container::NodeContainer;
use qc_04_state_management::ChainStore;
use quantum_telemetry::{init_telemetry, TelemetryConfig};

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry_config = TelemetryConfig::from_env();
    let _telemetry_guard = init_telemetry(telemetry_config).await?;

    info!("===========================================");
    info!("  Quantum-Chain Node Runtime");
    info!("===========================================");

    let config = NodeConfig::from_env();
    let tick_interval = std::time::Duration::from_millis(config.tick_interval_ms);

    let node = NodeContainer::new(config);
    info!(address = %node.node_address, "node ready, entering tick loop");

    let mut ticker = tokio::time::interval(tick_interval);
    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tick += 1;
                node.maybe_rebuild_proposal_set(tick);

                let height = node.chain.top_height() + 1;
                let pre_hash = node.chain.top_hash();
                let now_ms = now_millis();

                node.on_tick(height, pre_hash, now_ms).await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    info!("node shutting down");
    Ok(())
}
