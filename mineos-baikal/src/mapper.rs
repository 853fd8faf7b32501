//! Baikal ⇄ canonical translation.
//!
//! Firmware generations differ only in where a few identity fields come
//! from; those differences live in one [`FieldTable`] per
//! [`FirmwareProfile`].

use mineos_asic::{
    format::{count, fixed1, fixed4},
    naming::short_name,
    option_keys, DeviceStat, MinerSetting, PoolSetting, PoolStat, Result, RigError, RigIdentity,
    RigStatSnapshot, TransportError, VendorMapper,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, str::FromStr};

use crate::{
    consts::{canonical_algorithm, commands, model_algorithms, vendor_algorithm_name, MANUFACTURER},
    types,
};

/// Baikal firmware generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirmwareProfile {
    /// Giant series firmware: reports its own IP and kernel version
    #[default]
    Giant,
    /// Mini Miner era firmware: no IP in `system`, versioned by file system
    Legacy,
}

impl FirmwareProfile {
    pub fn table(&self) -> &'static FieldTable {
        match self {
            FirmwareProfile::Giant => &GIANT,
            FirmwareProfile::Legacy => &LEGACY,
        }
    }
}

/// Where the rig's network address comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSource {
    /// `IP` field of the `system` reply
    Reported,
    /// Peer address of the transport connection
    Connection,
}

/// Identity field lookup for one firmware generation
pub struct FieldTable {
    /// Vendor field holding the firmware version, for error messages
    pub firmware_field: &'static str,
    pub firmware_version: fn(&types::SystemInfo) -> Option<&str>,
    pub address: AddressSource,
    /// Whether a missing `Uptime` is a malformed reply or simply unknown
    pub uptime_required: bool,
}

static GIANT: FieldTable = FieldTable {
    firmware_field: "Kernel Version",
    firmware_version: kernel_version,
    address: AddressSource::Reported,
    uptime_required: true,
};

static LEGACY: FieldTable = FieldTable {
    firmware_field: "FileSystem Version",
    firmware_version: file_system_version,
    address: AddressSource::Connection,
    uptime_required: false,
};

fn kernel_version(info: &types::SystemInfo) -> Option<&str> {
    info.kernel_version.as_deref()
}

fn file_system_version(info: &types::SystemInfo) -> Option<&str> {
    info.file_system_version.as_deref()
}

/// Canonical option backed by one `MINERCONF` field
struct OptionField {
    key: &'static str,
    read: fn(&types::MinerSetting) -> Option<String>,
    write: fn(&mut types::MinerSetting, &str) -> std::result::Result<(), String>,
    required: bool,
}

static OPTION_FIELDS: &[OptionField] = &[
    OptionField {
        key: option_keys::FREQUENCY_MHZ,
        read: |s| Some(s.frequency.to_string()),
        write: |s, v| parse_into(v, &mut s.frequency),
        required: true,
    },
    OptionField {
        key: option_keys::FAN_SPEED_PERCENT,
        read: |s| s.fan_speed.map(|f| f.to_string()),
        write: |s, v| {
            let percent: u8 = parse(v)?;
            if percent > 100 {
                return Err(format!("{} is not a percentage", percent));
            }
            s.fan_speed = Some(percent);
            Ok(())
        },
        required: false,
    },
    OptionField {
        key: option_keys::TEMP_TARGET_C,
        read: |s| Some(s.temp_target.to_string()),
        write: |s, v| parse_into(v, &mut s.temp_target),
        required: true,
    },
    OptionField {
        key: option_keys::TEMP_CUTOFF_C,
        read: |s| Some(s.temp_cutoff.to_string()),
        write: |s, v| parse_into(v, &mut s.temp_cutoff),
        required: true,
    },
    OptionField {
        key: option_keys::FAILOVER_ONLY,
        read: |s| Some(s.failover_only.to_string()),
        write: |s, v| parse_into(v, &mut s.failover_only),
        required: true,
    },
    OptionField {
        key: option_keys::SCAN_TIME_S,
        read: |s| Some(s.scan_time.to_string()),
        write: |s, v| parse_into(v, &mut s.scan_time),
        required: true,
    },
    OptionField {
        key: option_keys::QUEUE,
        read: |s| Some(s.queue.to_string()),
        write: |s, v| parse_into(v, &mut s.queue),
        required: true,
    },
    OptionField {
        key: option_keys::EXPIRY_S,
        read: |s| Some(s.expiry.to_string()),
        write: |s, v| parse_into(v, &mut s.expiry),
        required: true,
    },
];

fn parse<T: FromStr>(value: &str) -> std::result::Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("invalid value '{}'", value))
}

fn parse_into<T: FromStr>(value: &str, field: &mut T) -> std::result::Result<(), String> {
    *field = parse(value)?;
    Ok(())
}

/// Canonical option keys the Baikal firmware can express
pub fn supported_option_keys() -> impl Iterator<Item = &'static str> {
    OPTION_FIELDS.iter().map(|f| f.key)
}

/// [`VendorMapper`] for the Baikal family
#[derive(Debug, Clone, Copy, Default)]
pub struct BaikalMapper {
    profile: FirmwareProfile,
}

impl BaikalMapper {
    pub fn new(profile: FirmwareProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> FirmwareProfile {
        self.profile
    }

    fn device_stat(device: &types::DeviceStatus, board: &types::BoardStats) -> DeviceStat {
        DeviceStat {
            chips: board.chip_count,
            frequency: count(u64::from(board.clock)),
            temperature: fixed1(device.temperature),
            hardware_errors: count(device.hardware_errors),
            hashrate: fixed4(device.mhs_5s),
        }
    }

    fn pool_stat(pool: &types::PoolStatus) -> PoolStat {
        // Kernels outside the name table are passed through as reported
        let algorithm = canonical_algorithm(&pool.algorithm)
            .map(|a| a.name().to_string())
            .unwrap_or_else(|| pool.algorithm.clone());

        PoolStat {
            url: pool.url.clone(),
            user: pool.user.clone(),
            algorithm,
            status: pool.status.clone(),
            stratum_active: pool.stratum_active,
            priority: pool.priority,
            getworks: count(pool.getworks),
            accepted: count(pool.accepted),
            rejected: count(pool.rejected),
            discarded: count(pool.discarded),
            stale: count(pool.stale),
            difficulty_accepted: fixed4(pool.difficulty_accepted),
            difficulty_rejected: fixed4(pool.difficulty_rejected),
            difficulty_stale: fixed4(pool.difficulty_stale),
            last_share_difficulty: fixed4(pool.last_share_difficulty),
            last_share_time: count(pool.last_share_time),
        }
    }
}

impl VendorMapper for BaikalMapper {
    type SystemInfo = types::SystemInfo;
    type StatsReport = types::StatsReport;
    type MinerSetting = types::MinerSetting;
    type PoolSetting = types::PoolSetting;

    fn identity(&self, info: &types::SystemInfo, peer: Option<SocketAddr>) -> Result<RigIdentity> {
        let table = self.profile.table();

        let firmware_version = (table.firmware_version)(info).ok_or_else(|| {
            RigError::malformed(commands::SYSTEM, format!("missing {} field", table.firmware_field))
        })?;

        let ip_addr = match table.address {
            AddressSource::Reported => info
                .ip_addr
                .clone()
                .ok_or_else(|| RigError::malformed(commands::SYSTEM, "missing IP field"))?,
            AddressSource::Connection => peer
                .map(|addr| addr.ip().to_string())
                .ok_or_else(|| TransportError::not_connected("transport has no peer address"))?,
        };

        if table.uptime_required && info.uptime_seconds.is_none() {
            return Err(RigError::malformed(commands::SYSTEM, "missing Uptime field"));
        }

        let name = short_name(&info.mac_addr).ok_or_else(|| {
            RigError::malformed(
                commands::SYSTEM,
                format!("invalid MAC address '{}'", info.mac_addr),
            )
        })?;

        Ok(RigIdentity {
            ip_addr,
            hostname: info.hostname.clone(),
            name,
            mac_addr: info.mac_addr.clone(),
            model: info.product_type.clone(),
            manufacturer: MANUFACTURER.to_string(),
            hardware_version: info.product_version.clone(),
            firmware_version: firmware_version.to_string(),
            miner_version: info.miner_version.clone(),
            algorithms: model_algorithms(&info.product_type).to_vec(),
            uptime_seconds: info.uptime_seconds,
        })
    }

    fn stats(&self, report: &types::StatsReport) -> Result<RigStatSnapshot> {
        if report.devs.len() != report.stats.len() {
            return Err(RigError::InconsistentTelemetry {
                devices: report.devs.len(),
                clocks: report.stats.len(),
            });
        }

        let summary = &report.summary;
        Ok(RigStatSnapshot {
            mhs_5s: fixed4(summary.mhs_5s),
            mhs_average: fixed4(summary.mhs_av),
            khs_5s: fixed4(summary.khs_5s),
            khs_average: fixed4(summary.khs_av),
            accepted: count(summary.accepted),
            rejected: count(summary.rejected),
            hardware_errors: count(summary.hardware_errors),
            utility: fixed4(summary.utility),
            system_temperature: report.temp_cpu.map(fixed1),
            devices: report
                .devs
                .iter()
                .zip(&report.stats)
                .map(|(device, board)| Self::device_stat(device, board))
                .collect(),
            pools: report.pools.iter().map(Self::pool_stat).collect(),
        })
    }

    fn setting(
        &self,
        miner: &types::MinerSetting,
        pools: &[types::PoolSetting],
    ) -> Result<MinerSetting> {
        let options = OPTION_FIELDS
            .iter()
            .filter_map(|field| (field.read)(miner).map(|value| (field.key.to_string(), value)))
            .collect();

        let pools = pools
            .iter()
            .map(|pool| {
                let algorithm = canonical_algorithm(&pool.algorithm).ok_or_else(|| {
                    RigError::malformed(
                        commands::POOL_CONFIG,
                        format!("unknown algorithm '{}' for pool {}", pool.algorithm, pool.url),
                    )
                })?;
                Ok(PoolSetting {
                    url: pool.url.clone(),
                    user: pool.user.clone(),
                    password: pool.pass.clone(),
                    algorithm,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MinerSetting { options, pools })
    }

    fn to_vendor_native(
        &self,
        setting: &MinerSetting,
    ) -> Result<(types::MinerSetting, Vec<types::PoolSetting>)> {
        if let Some(key) = setting
            .options
            .keys()
            .find(|key| !OPTION_FIELDS.iter().any(|f| f.key == key.as_str()))
        {
            return Err(RigError::unsupported(format!(
                "option '{}' is not supported by {} firmware",
                key, MANUFACTURER
            )));
        }

        let mut miner = types::MinerSetting::default();
        for field in OPTION_FIELDS {
            match setting.option(field.key) {
                Some(value) => (field.write)(&mut miner, value).map_err(|reason| {
                    RigError::unsupported(format!("option '{}': {}", field.key, reason))
                })?,
                None if field.required => {
                    return Err(RigError::unsupported(format!(
                        "required option '{}' is missing",
                        field.key
                    )))
                }
                None => {}
            }
        }

        let pools = setting
            .pools
            .iter()
            .map(|pool| {
                let algorithm = vendor_algorithm_name(pool.algorithm).ok_or_else(|| {
                    RigError::unsupported(format!(
                        "algorithm '{}' is not supported by {} firmware",
                        pool.algorithm, MANUFACTURER
                    ))
                })?;
                Ok(types::PoolSetting {
                    url: pool.url.clone(),
                    user: pool.user.clone(),
                    pass: pool.password.clone(),
                    algorithm: algorithm.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((miner, pools))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mineos_asic::{Algorithm, TransportErrorKind};
    use pretty_assertions::assert_eq;

    fn system_info() -> types::SystemInfo {
        types::SystemInfo {
            hostname: "baikal-07".to_string(),
            mac_addr: "00:1A:2B:3C:4D:5E".to_string(),
            ip_addr: Some("192.168.1.40".to_string()),
            product_type: "Giant B".to_string(),
            product_version: "1.2".to_string(),
            kernel_version: Some("4.4.138".to_string()),
            file_system_version: None,
            miner_version: "sgminer 5.6.2-b".to_string(),
            uptime_seconds: Some(86_400),
            temp_cpu: None,
        }
    }

    fn miner_config() -> types::MinerSetting {
        types::MinerSetting {
            frequency: 600,
            fan_speed: None,
            temp_target: 70,
            temp_cutoff: 90,
            failover_only: true,
            scan_time: 30,
            queue: 1,
            expiry: 120,
        }
    }

    #[test]
    fn test_giant_identity() {
        let identity = BaikalMapper::new(FirmwareProfile::Giant)
            .identity(&system_info(), None)
            .unwrap();

        assert_eq!(identity.ip_addr, "192.168.1.40");
        assert_eq!(identity.name, "3c4d5e");
        assert_eq!(identity.firmware_version, "4.4.138");
        assert_eq!(identity.uptime_seconds, Some(86_400));
        assert_eq!(identity.manufacturer, "Baikal");
        assert_eq!(identity.algorithms.len(), 6);
        assert!(identity.algorithms.contains(&Algorithm::Blake2b));
    }

    #[test]
    fn test_legacy_identity_uses_peer_address() {
        let mut info = system_info();
        info.ip_addr = None;
        info.kernel_version = None;
        info.file_system_version = Some("20170831".to_string());

        let mapper = BaikalMapper::new(FirmwareProfile::Legacy);
        let peer: SocketAddr = "10.0.0.7:22".parse().unwrap();
        let identity = mapper.identity(&info, Some(peer)).unwrap();
        assert_eq!(identity.ip_addr, "10.0.0.7");
        assert_eq!(identity.firmware_version, "20170831");

        let err = mapper.identity(&info, None).unwrap_err();
        assert_eq!(err.transport_kind(), Some(TransportErrorKind::NotConnected));
    }

    #[test]
    fn test_profile_field_is_required() {
        let mut info = system_info();
        info.kernel_version = None;
        let err = BaikalMapper::default().identity(&info, None).unwrap_err();
        assert!(err.to_string().contains("Kernel Version"));
    }

    #[test]
    fn test_uptime_required_only_for_giant() {
        let mut info = system_info();
        info.uptime_seconds = None;
        let err = BaikalMapper::new(FirmwareProfile::Giant)
            .identity(&info, None)
            .unwrap_err();
        assert!(err.to_string().contains("Uptime"));

        info.file_system_version = Some("20170831".to_string());
        let peer: SocketAddr = "10.0.0.7:22".parse().unwrap();
        let identity = BaikalMapper::new(FirmwareProfile::Legacy)
            .identity(&info, Some(peer))
            .unwrap();
        assert_eq!(identity.uptime_seconds, None);
    }

    #[test]
    fn test_unknown_model_has_no_algorithms() {
        let mut info = system_info();
        info.product_type = "Giant Z".to_string();
        let identity = BaikalMapper::default().identity(&info, None).unwrap();
        assert!(identity.algorithms.is_empty());
    }

    #[test]
    fn test_setting_round_trip() {
        let mapper = BaikalMapper::default();
        let pools = vec![
            types::PoolSetting {
                url: "stratum+tcp://a:1".to_string(),
                user: "rig".to_string(),
                pass: "x".to_string(),
                algorithm: "decred".to_string(),
            },
            types::PoolSetting {
                url: "stratum+tcp://b:2".to_string(),
                user: "rig".to_string(),
                pass: "x".to_string(),
                algorithm: "sia".to_string(),
            },
        ];

        let canonical = mapper.setting(&miner_config(), &pools).unwrap();
        assert_eq!(canonical.option(option_keys::FREQUENCY_MHZ), Some("600"));
        assert_eq!(canonical.option(option_keys::FAN_SPEED_PERCENT), None);
        assert_eq!(canonical.pools[0].algorithm, Algorithm::Blake256r14);

        let (miner, native_pools) = mapper.to_vendor_native(&canonical).unwrap();
        assert_eq!(miner, miner_config());
        assert_eq!(native_pools, pools);
    }

    #[test]
    fn test_unknown_pool_kernel_is_malformed() {
        let pools = vec![types::PoolSetting {
            url: "stratum+tcp://a:1".to_string(),
            user: "rig".to_string(),
            pass: "x".to_string(),
            algorithm: "keccak".to_string(),
        }];
        let err = BaikalMapper::default().setting(&miner_config(), &pools).unwrap_err();
        assert!(matches!(err, RigError::MalformedResponse { .. }));
    }

    #[test]
    fn test_inverse_rejects_what_firmware_cannot_express() {
        let mapper = BaikalMapper::default();
        let base = mapper.setting(&miner_config(), &[]).unwrap();

        let mut voltage = base.clone();
        voltage.options.insert(option_keys::VOLTAGE_MV.to_string(), "800".to_string());
        assert!(matches!(
            mapper.to_vendor_native(&voltage),
            Err(RigError::UnsupportedSetting(_))
        ));

        let mut fan = base.clone();
        fan.options.insert(option_keys::FAN_SPEED_PERCENT.to_string(), "140".to_string());
        assert!(matches!(mapper.to_vendor_native(&fan), Err(RigError::UnsupportedSetting(_))));

        let mut missing = base.clone();
        missing.options.remove(option_keys::FREQUENCY_MHZ);
        assert!(matches!(
            mapper.to_vendor_native(&missing),
            Err(RigError::UnsupportedSetting(_))
        ));

        let mut sha = base;
        sha.pools.push(PoolSetting {
            url: "stratum+tcp://btc:3333".to_string(),
            user: "rig".to_string(),
            password: "x".to_string(),
            algorithm: Algorithm::Sha256d,
        });
        let err = mapper.to_vendor_native(&sha).unwrap_err();
        assert!(err.to_string().contains("sha256d"));
    }

    #[test]
    fn test_stats_alignment_checked_first() {
        let report = types::StatsReport {
            summary: types::Summary {
                elapsed: 1,
                mhs_av: 1.0,
                mhs_5s: 1.0,
                khs_av: 1000.0,
                khs_5s: 1000.0,
                accepted: 0,
                rejected: 0,
                hardware_errors: 0,
                utility: 0.0,
            },
            devs: vec![types::DeviceStatus {
                asc: 0,
                temperature: 60.0,
                mhs_5s: 1.0,
                hardware_errors: 0,
            }],
            stats: vec![],
            pools: vec![],
            temp_cpu: None,
        };

        match BaikalMapper::default().stats(&report) {
            Err(RigError::InconsistentTelemetry { devices, clocks }) => {
                assert_eq!((devices, clocks), (1, 0));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
