//! Configuration for the orchestration layer
//!
//! Loaded from a TOML file by the embedding application and validated before
//! a context is built from it. UI concerns (theme, catalog endpoints, cart
//! persistence) live with the embedder; only the on-chain side is configured
//! here.

use crate::errors::{OrchestratorError, Result};
use crate::types::Network;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::time::Duration;

/// Top-level orchestration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Ledger network tag
    #[serde(default)]
    pub network: Network,

    /// Storefront program id, base58
    ///
    /// Every derived address is scoped under this id; changing it
    /// invalidates all previously derived addresses.
    pub program_id: String,

    /// RPC collaborator settings
    #[serde(default)]
    pub rpc: RpcSettings,

    /// Confirmation monitor settings
    #[serde(default)]
    pub monitor: MonitorSettings,
}

/// RPC endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcSettings {
    /// Endpoint URL; empty string means the network default
    #[serde(default)]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_rpc_timeout_secs")]
    pub timeout_secs: u64,
}

/// Confirmation monitor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Overall monitoring window in milliseconds
    #[serde(default = "default_monitor_timeout_ms")]
    pub timeout_ms: u64,

    /// Poll interval in milliseconds
    #[serde(default = "default_monitor_interval_ms")]
    pub interval_ms: u64,
}

// Default value functions
fn default_rpc_timeout_secs() -> u64 {
    30
}
fn default_monitor_timeout_ms() -> u64 {
    60_000
}
fn default_monitor_interval_ms() -> u64 {
    1_000
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_secs: default_rpc_timeout_secs(),
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_monitor_timeout_ms(),
            interval_ms: default_monitor_interval_ms(),
        }
    }
}

impl OrchestratorConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: OrchestratorConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field-level constraints
    pub fn validate(&self) -> Result<()> {
        self.parsed_program_id()?;
        if self.monitor.interval_ms == 0 {
            return Err(OrchestratorError::invalid_input(
                "monitor.interval_ms must be positive",
            ));
        }
        if self.monitor.timeout_ms < self.monitor.interval_ms {
            return Err(OrchestratorError::invalid_input(
                "monitor.timeout_ms must be at least one interval",
            ));
        }
        if self.rpc.timeout_secs == 0 {
            return Err(OrchestratorError::invalid_input(
                "rpc.timeout_secs must be positive",
            ));
        }
        Ok(())
    }

    /// Parse the configured program id
    pub fn parsed_program_id(&self) -> Result<Pubkey> {
        Pubkey::from_str(&self.program_id).map_err(|e| {
            OrchestratorError::invalid_input(format!(
                "program_id '{}' is not a valid address: {e}",
                self.program_id
            ))
        })
    }

    /// RPC endpoint, falling back to the network default when unset
    pub fn rpc_endpoint(&self) -> String {
        if self.rpc.endpoint.is_empty() {
            self.network.default_rpc_url().to_string()
        } else {
            self.rpc.endpoint.clone()
        }
    }

    /// Per-request RPC timeout
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc.timeout_secs)
    }
}
