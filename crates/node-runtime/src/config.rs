//! Node configuration from environment variables, in the same style as
//! `quantum-telemetry`'s `TelemetryConfig::from_env`. Covers only what
//! wiring this composition root needs; transport/wallet/CLI configuration
//! is an external collaborator's concern (spec §1 Non-goals).

use std::env;

/// Configuration for one node-runtime instance.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Two-digit subsystem identifier passed through to telemetry.
    pub subsystem_id: String,

    /// Milliseconds between proposer-duty ticks (`on_tick` calls).
    pub tick_interval_ms: u64,

    /// Ticks between full `ProposalSet` reloads from the account DB.
    pub proposal_rebuild_interval_ticks: u64,

    /// Broadcast channel capacity backing the in-memory event bus.
    pub event_bus_capacity: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            subsystem_id: "17".to_string(),
            tick_interval_ms: 3_000,
            proposal_rebuild_interval_ticks: 10,
            event_bus_capacity: 1024,
        }
    }
}

impl NodeConfig {
    /// Build configuration from environment variables.
    ///
    /// - `QC_SUBSYSTEM_ID`: telemetry subsystem id (default: 17)
    /// - `QC_TICK_INTERVAL_MS`: proposer tick period (default: 3000)
    /// - `QC_PROPOSAL_REBUILD_TICKS`: proposer-set rebuild cadence (default: 10)
    /// - `QC_EVENT_BUS_CAPACITY`: broadcast channel capacity (default: 1024)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            subsystem_id: env::var("QC_SUBSYSTEM_ID").unwrap_or(defaults.subsystem_id),
            tick_interval_ms: env::var("QC_TICK_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.tick_interval_ms),
            proposal_rebuild_interval_ticks: env::var("QC_PROPOSAL_REBUILD_TICKS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.proposal_rebuild_interval_ticks),
            event_bus_capacity: env::var("QC_EVENT_BUS_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.event_bus_capacity),
        }
    }
}
