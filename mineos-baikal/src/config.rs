use mineos_asic::{AdapterConfig, Result, RigError};
use serde::{Deserialize, Serialize};

use crate::{
    consts::{MINER_START_COMMAND, MINER_STOP_COMMAND, SSH_PASSWORD, SSH_PORT, SSH_USER},
    mapper::FirmwareProfile,
};

/// Baikal adapter configuration
///
/// ```toml
/// profile = "legacy"
/// call_timeout_ms = 5000
/// ssh_password = "hunter2"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaikalConfig {
    #[serde(flatten)]
    pub adapter: AdapterConfig,

    #[serde(default)]
    pub profile: FirmwareProfile,

    #[serde(default = "default_miner_start_command")]
    pub miner_start_command: String,

    #[serde(default = "default_miner_stop_command")]
    pub miner_stop_command: String,

    /// Login handed to whoever opens the transport
    #[serde(default = "default_ssh_user")]
    pub ssh_user: String,

    #[serde(default = "default_ssh_password")]
    pub ssh_password: String,

    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,
}

/// Where and how to open a shell on one rig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshEndpoint {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl BaikalConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| RigError::InvalidConfiguration(e.to_string()))
    }

    pub fn ssh_endpoint(&self, host: impl Into<String>) -> SshEndpoint {
        SshEndpoint {
            host: host.into(),
            port: self.ssh_port,
            user: self.ssh_user.clone(),
            password: self.ssh_password.clone(),
        }
    }
}

impl Default for BaikalConfig {
    fn default() -> Self {
        Self {
            adapter: AdapterConfig::default(),
            profile: FirmwareProfile::default(),
            miner_start_command: default_miner_start_command(),
            miner_stop_command: default_miner_stop_command(),
            ssh_user: default_ssh_user(),
            ssh_password: default_ssh_password(),
            ssh_port: default_ssh_port(),
        }
    }
}

fn default_miner_start_command() -> String { MINER_START_COMMAND.to_string() }
fn default_miner_stop_command() -> String { MINER_STOP_COMMAND.to_string() }
fn default_ssh_user() -> String { SSH_USER.to_string() }
fn default_ssh_password() -> String { SSH_PASSWORD.to_string() }
fn default_ssh_port() -> u16 { SSH_PORT }
