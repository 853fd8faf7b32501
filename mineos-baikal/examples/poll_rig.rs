//! Poll the Baikal rig this program runs on
//!
//! Runs the miner API calls through a local shell, so it is meant to be
//! started on the rig itself (or anywhere `nc` reaches a Baikal miner API).
//! An optional first argument names a TOML file with `BaikalConfig` keys.

use anyhow::Context;
use mineos_asic::{CallContext, LocalShell, RigClient};
use mineos_baikal::{BaikalClient, BaikalConfig};
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mineos_asic=debug,mineos_baikal=debug")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path))?;
            BaikalConfig::from_toml_str(&contents)?
        }
        None => BaikalConfig::default(),
    };
    info!("Using {:?} firmware profile", config.profile);

    let client = BaikalClient::with_transport(config, Arc::new(LocalShell::new()));
    let ctx = CallContext::new().with_timeout(Duration::from_secs(10));

    let identity = client.rig_info(&ctx).await?;
    let uptime = identity
        .uptime_seconds
        .map(|s| format!("{}s", s))
        .unwrap_or_else(|| "unknown".to_string());
    info!(
        "{} {} ({}) at {}, firmware {}, up {}",
        identity.manufacturer,
        identity.model,
        identity.name,
        identity.ip_addr,
        identity.firmware_version,
        uptime
    );
    if identity.algorithms.is_empty() {
        warn!("Unknown model, no algorithm list");
    }

    for round in 0..3 {
        if round > 0 {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }

        let ctx = CallContext::new().with_timeout(Duration::from_secs(10));
        match client.rig_stat(&ctx).await {
            Ok(stats) => {
                info!(
                    "{} MH/s (avg {}), accepted {}, rejected {}",
                    stats.mhs_5s, stats.mhs_average, stats.accepted, stats.rejected
                );
                for (i, device) in stats.devices.iter().enumerate() {
                    info!(
                        "  board {}: {} chips @ {} MHz, {} C, {} MH/s",
                        i, device.chips, device.frequency, device.temperature, device.hashrate
                    );
                }
                for pool in &stats.pools {
                    info!("  pool {} [{}] {}", pool.priority, pool.status, pool.url);
                }
            }
            Err(e) if e.is_retryable() => warn!("Stats unavailable: {}", e),
            Err(e) => return Err(e.into()),
        }
    }

    let ctx = CallContext::new().with_timeout(Duration::from_secs(10));
    let setting = client.miner_setting(&ctx).await?;
    info!("Miner options: {:?}", setting.options);

    Ok(())
}
