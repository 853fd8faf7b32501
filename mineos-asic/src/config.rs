use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, RigError};

/// Settings shared by every vendor adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Host the miner API listens on, as seen from the rig's shell
    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,

    /// Miner API port
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Timeout applied to calls whose context carries no deadline
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,

    /// Delay before a scheduled reboot takes effect
    #[serde(default = "default_reboot_delay_minutes")]
    pub reboot_delay_minutes: u32,
}

impl AdapterConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Parse from TOML, filling unset keys with defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| RigError::InvalidConfiguration(e.to_string()))
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            call_timeout_ms: default_call_timeout_ms(),
            reboot_delay_minutes: default_reboot_delay_minutes(),
        }
    }
}

// Default value functions for serde
fn default_rpc_host() -> String { "127.0.0.1".to_string() }
fn default_rpc_port() -> u16 { 4028 }
fn default_call_timeout_ms() -> u64 { 10_000 }
fn default_reboot_delay_minutes() -> u32 { 5 }
