//! Vendor-native structures of the Baikal miner API.
//!
//! Field names follow the firmware's replies. Required fields have no serde
//! default, so a reply missing one fails to parse instead of reading as zero.

use serde::{Deserialize, Serialize};

/// `SYSTEM` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(rename = "Hostname")]
    pub hostname: String,
    #[serde(rename = "MAC")]
    pub mac_addr: String,
    /// Not reported by older firmware
    #[serde(rename = "IP", default, skip_serializing_if = "Option::is_none")]
    pub ip_addr: Option<String>,
    #[serde(rename = "Product Type")]
    pub product_type: String,
    #[serde(rename = "Product Version")]
    pub product_version: String,
    #[serde(rename = "Kernel Version", default, skip_serializing_if = "Option::is_none")]
    pub kernel_version: Option<String>,
    #[serde(rename = "FileSystem Version", default, skip_serializing_if = "Option::is_none")]
    pub file_system_version: Option<String>,
    #[serde(rename = "Miner Version")]
    pub miner_version: String,
    /// Only Giant firmware reports uptime
    #[serde(rename = "Uptime", default, skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<u64>,
    #[serde(rename = "Temp CPU", default, skip_serializing_if = "Option::is_none")]
    pub temp_cpu: Option<f64>,
}

/// `SUMMARY` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "Elapsed")]
    pub elapsed: u64,
    #[serde(rename = "MHS av")]
    pub mhs_av: f64,
    #[serde(rename = "MHS 5s")]
    pub mhs_5s: f64,
    #[serde(rename = "KHS av")]
    pub khs_av: f64,
    #[serde(rename = "KHS 5s")]
    pub khs_5s: f64,
    #[serde(rename = "Accepted")]
    pub accepted: u64,
    #[serde(rename = "Rejected")]
    pub rejected: u64,
    #[serde(rename = "Hardware Errors")]
    pub hardware_errors: u64,
    #[serde(rename = "Utility")]
    pub utility: f64,
}

/// `DEVS` row: one hash board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    #[serde(rename = "ASC")]
    pub asc: u32,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    #[serde(rename = "MHS 5s")]
    pub mhs_5s: f64,
    #[serde(rename = "Hardware Errors")]
    pub hardware_errors: u64,
}

/// Device entry of the `STATS` section: clock and chip configuration of the
/// board at the same index in `DEVS`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardStats {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Chip Count")]
    pub chip_count: u32,
    #[serde(rename = "Clock")]
    pub clock: u32,
}

/// `POOLS` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolStatus {
    #[serde(rename = "POOL")]
    pub pool: u32,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Algorithm")]
    pub algorithm: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Stratum Active")]
    pub stratum_active: bool,
    #[serde(rename = "Priority")]
    pub priority: u32,
    #[serde(rename = "Getworks")]
    pub getworks: u64,
    #[serde(rename = "Accepted")]
    pub accepted: u64,
    #[serde(rename = "Rejected")]
    pub rejected: u64,
    #[serde(rename = "Discarded")]
    pub discarded: u64,
    #[serde(rename = "Stale")]
    pub stale: u64,
    #[serde(rename = "Difficulty Accepted")]
    pub difficulty_accepted: f64,
    #[serde(rename = "Difficulty Rejected")]
    pub difficulty_rejected: f64,
    #[serde(rename = "Difficulty Stale")]
    pub difficulty_stale: f64,
    #[serde(rename = "Last Share Difficulty")]
    pub last_share_difficulty: f64,
    #[serde(rename = "Last Share Time")]
    pub last_share_time: u64,
}

/// `SYSTEM` row as it appears in the stats reply; only the temperature is used
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SystemTemperature {
    #[serde(rename = "Temp CPU", default)]
    pub temp_cpu: Option<f64>,
}

/// Everything the stats multi-command returns
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub summary: Summary,
    pub devs: Vec<DeviceStatus>,
    pub stats: Vec<BoardStats>,
    pub pools: Vec<PoolStatus>,
    pub temp_cpu: Option<f64>,
}

/// `MINERCONF` row: global miner configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerSetting {
    /// Chip clock in MHz
    #[serde(rename = "Frequency")]
    pub frequency: u32,
    /// Fixed fan duty in percent; automatic control when absent
    #[serde(rename = "Fan Speed", default, skip_serializing_if = "Option::is_none")]
    pub fan_speed: Option<u8>,
    #[serde(rename = "Temp Target")]
    pub temp_target: u32,
    #[serde(rename = "Temp Cutoff")]
    pub temp_cutoff: u32,
    #[serde(rename = "Failover Only")]
    pub failover_only: bool,
    #[serde(rename = "Scan Time")]
    pub scan_time: u32,
    #[serde(rename = "Queue")]
    pub queue: u32,
    #[serde(rename = "Expiry")]
    pub expiry: u32,
}

/// `POOLCONF` row; row order is pool priority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSetting {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Pass")]
    pub pass: String,
    /// sgminer kernel name
    #[serde(rename = "Algorithm")]
    pub algorithm: String,
}
