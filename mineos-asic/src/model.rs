//! Canonical rig model shared by every vendor adapter.
//!
//! Stat values are carried as preformatted strings: hash-rates, difficulties
//! and utility with four decimals, temperatures with one, counts as plain
//! integers (see [`crate::format`]). Consumers rely on that exact text.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Mining algorithms known to the fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Sha256d,
    Scrypt,
    X11,
    X13,
    X14,
    X15,
    Quark,
    Qubit,
    MyriadGroestl,
    Skein,
    Nist5,
    Blake256r8,
    Blake256r8vnl,
    Blake256r14,
    Blake2b,
    Lbry,
    Pascal,
    Cryptonight,
    CryptonightLite,
    Ethash,
}

impl Algorithm {
    pub const ALL: [Algorithm; 20] = [
        Algorithm::Sha256d,
        Algorithm::Scrypt,
        Algorithm::X11,
        Algorithm::X13,
        Algorithm::X14,
        Algorithm::X15,
        Algorithm::Quark,
        Algorithm::Qubit,
        Algorithm::MyriadGroestl,
        Algorithm::Skein,
        Algorithm::Nist5,
        Algorithm::Blake256r8,
        Algorithm::Blake256r8vnl,
        Algorithm::Blake256r14,
        Algorithm::Blake2b,
        Algorithm::Lbry,
        Algorithm::Pascal,
        Algorithm::Cryptonight,
        Algorithm::CryptonightLite,
        Algorithm::Ethash,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Sha256d => "sha256d",
            Algorithm::Scrypt => "scrypt",
            Algorithm::X11 => "x11",
            Algorithm::X13 => "x13",
            Algorithm::X14 => "x14",
            Algorithm::X15 => "x15",
            Algorithm::Quark => "quark",
            Algorithm::Qubit => "qubit",
            Algorithm::MyriadGroestl => "myriad-groestl",
            Algorithm::Skein => "skein",
            Algorithm::Nist5 => "nist5",
            Algorithm::Blake256r8 => "blake256r8",
            Algorithm::Blake256r8vnl => "blake256r8vnl",
            Algorithm::Blake256r14 => "blake256r14",
            Algorithm::Blake2b => "blake2b",
            Algorithm::Lbry => "lbry",
            Algorithm::Pascal => "pascal",
            Algorithm::Cryptonight => "cryptonight",
            Algorithm::CryptonightLite => "cryptonight-lite",
            Algorithm::Ethash => "ethash",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown algorithm '{}'", s))
    }
}

/// Identity of one rig
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigIdentity {
    pub ip_addr: String,
    pub hostname: String,
    /// Short display name derived from the MAC address
    pub name: String,
    pub mac_addr: String,
    pub model: String,
    pub manufacturer: String,
    pub hardware_version: String,
    pub firmware_version: String,
    pub miner_version: String,
    /// Algorithms the model can mine; empty for unknown models
    pub algorithms: Vec<Algorithm>,
    /// `None` when the firmware does not report uptime
    pub uptime_seconds: Option<u64>,
}

/// Live statistics of one rig
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigStatSnapshot {
    pub mhs_5s: String,
    pub mhs_average: String,
    pub khs_5s: String,
    pub khs_average: String,
    pub accepted: String,
    pub rejected: String,
    pub hardware_errors: String,
    pub utility: String,
    pub system_temperature: Option<String>,
    /// Same order as the rig reports its hash boards
    pub devices: Vec<DeviceStat>,
    /// Same order as the rig reports its pools
    pub pools: Vec<PoolStat>,
}

/// Per hash-board statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStat {
    pub chips: u32,
    pub frequency: String,
    pub temperature: String,
    pub hardware_errors: String,
    pub hashrate: String,
}

/// Per pool statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStat {
    pub url: String,
    pub user: String,
    pub algorithm: String,
    pub status: String,
    pub stratum_active: bool,
    pub priority: u32,
    pub getworks: String,
    pub accepted: String,
    pub rejected: String,
    pub discarded: String,
    pub stale: String,
    pub difficulty_accepted: String,
    pub difficulty_rejected: String,
    pub difficulty_stale: String,
    pub last_share_difficulty: String,
    pub last_share_time: String,
}

/// Fleet-wide miner configuration
///
/// `options` holds scalar settings under canonical keys (see
/// [`option_keys`]); each adapter accepts the subset its firmware can
/// express and rejects the rest. Pool order is pool priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerSetting {
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub pools: Vec<PoolSetting>,
}

impl MinerSetting {
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

/// One configured pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSetting {
    pub url: String,
    pub user: String,
    pub password: String,
    pub algorithm: Algorithm,
}

/// Canonical option keys
pub mod option_keys {
    pub const FREQUENCY_MHZ: &str = "frequency_mhz";
    pub const FAN_SPEED_PERCENT: &str = "fan_speed_percent";
    pub const TEMP_TARGET_C: &str = "temp_target_c";
    pub const TEMP_CUTOFF_C: &str = "temp_cutoff_c";
    pub const FAILOVER_ONLY: &str = "failover_only";
    pub const SCAN_TIME_S: &str = "scan_time_s";
    pub const QUEUE: &str = "queue";
    pub const EXPIRY_S: &str = "expiry_s";
    pub const VOLTAGE_MV: &str = "voltage_mv";
}
