use mineos_asic::{codec::parse_row, Result, RigError, Row, RpcResponse};
use serde_json::Value;

use crate::{
    consts::{commands, sections},
    types::{BoardStats, MinerSetting, PoolSetting, StatsReport, SystemInfo, SystemTemperature},
};

/// Parse the reply to [`commands::SYSTEM`]
pub fn parse_system_info(response: &RpcResponse) -> Result<SystemInfo> {
    response.first(commands::SYSTEM, sections::SYSTEM)
}

/// Parse the reply to [`commands::STATS`].
///
/// `STATS` also carries per-pool entries (`ID` = `POOLn`); only device
/// entries are kept so they line up with `DEVS`.
pub fn parse_stats(response: &RpcResponse) -> Result<StatsReport> {
    let command = commands::STATS;

    let summary = response.first(command, sections::SUMMARY)?;
    let devs = response.rows(command, sections::DEVS)?;

    let stats = response
        .section(sections::STATS)
        .ok_or_else(|| RigError::malformed(command, "missing STATS section"))?
        .iter()
        .enumerate()
        .filter(|(_, row)| !is_pool_entry(row))
        .map(|(i, row)| parse_row::<BoardStats>(command, sections::STATS, i, row))
        .collect::<Result<Vec<_>>>()?;

    let pools = response.rows(command, sections::POOLS)?;
    let system: Option<SystemTemperature> = response.optional_first(command, sections::SYSTEM)?;

    Ok(StatsReport {
        summary,
        devs,
        stats,
        pools,
        temp_cpu: system.and_then(|s| s.temp_cpu),
    })
}

/// Parse the reply to [`commands::MINER_CONFIG`]
pub fn parse_miner_setting(response: &RpcResponse) -> Result<MinerSetting> {
    response.first(commands::MINER_CONFIG, sections::MINER_CONFIG)
}

/// Parse the reply to [`commands::POOL_CONFIG`]
pub fn parse_pool_list(response: &RpcResponse) -> Result<Vec<PoolSetting>> {
    response.rows(commands::POOL_CONFIG, sections::POOL_CONFIG)
}

fn is_pool_entry(row: &Row) -> bool {
    row.get("ID")
        .and_then(Value::as_str)
        .map_or(false, |id| id.starts_with("POOL"))
}
