use async_trait::async_trait;
use mineos_asic::{
    CallContext, CommandRunner, MinerSetting, Result, RigClient, RigError, RigIdentity,
    RigSession, RigStatSnapshot, RpcResponse, SettingsWrite, Transport, VendorMapper, WritePhase,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    config::BaikalConfig,
    consts::{commands, reboot_command, MANUFACTURER},
    mapper::BaikalMapper,
    parser, types,
};

/// [`RigClient`] for one Baikal rig
///
/// The last identity read by [`RigClient::rig_info`] is kept next to the
/// transport handle. It is only consulted to check pool algorithms against
/// the rig's model before a settings write.
pub struct BaikalClient {
    session: RigSession<RigIdentity>,
    runner: CommandRunner,
    mapper: BaikalMapper,
    config: BaikalConfig,
}

impl BaikalClient {
    /// Client without a transport; calls fail with `NotConnected` until
    /// [`RigClient::set_transport`] is called
    pub fn new(config: BaikalConfig) -> Self {
        Self {
            session: RigSession::new(),
            runner: CommandRunner::new(&config.adapter),
            mapper: BaikalMapper::new(config.profile),
            config,
        }
    }

    pub fn with_transport(config: BaikalConfig, transport: Arc<dyn Transport>) -> Self {
        let client = Self::new(config);
        client.session.replace_transport(transport);
        client
    }

    pub fn config(&self) -> &BaikalConfig {
        &self.config
    }

    /// Identity from the last successful `rig_info`
    pub fn cached_identity(&self) -> Option<RigIdentity> {
        self.session.cached()
    }

    async fn call(&self, ctx: &CallContext, command: &str, parameter: &str) -> Result<RpcResponse> {
        let transport = self.session.transport()?;
        self.runner
            .call_rpc(ctx, transport.as_ref(), command, parameter)
            .await
    }

    async fn shell(&self, ctx: &CallContext, command: &str) -> Result<()> {
        let transport = self.session.transport()?;
        self.runner.run_shell(ctx, transport.as_ref(), command).await?;
        Ok(())
    }

    /// Map to native form and check the pools against the cached model
    fn prepare(
        &self,
        setting: &MinerSetting,
    ) -> Result<(types::MinerSetting, Vec<types::PoolSetting>)> {
        let native = self.mapper.to_vendor_native(setting)?;

        if let Some(identity) = self.session.cached() {
            // Unknown models report no algorithms; nothing to check against
            if !identity.algorithms.is_empty() {
                if let Some(pool) = setting
                    .pools
                    .iter()
                    .find(|pool| !identity.algorithms.contains(&pool.algorithm))
                {
                    return Err(RigError::unsupported(format!(
                        "{} cannot mine {} (pool {})",
                        identity.model, pool.algorithm, pool.url
                    )));
                }
            }
        }

        Ok(native)
    }

    async fn write_miner_config(&self, ctx: &CallContext, miner: &types::MinerSetting) -> Result<()> {
        let parameter = serde_json::to_string(miner)
            .map_err(|e| RigError::protocol(format!("cannot encode miner settings: {}", e)))?;
        self.call(ctx, commands::SET_MINER_CONFIG, &parameter).await?;
        debug!("Miner settings written");
        Ok(())
    }

    async fn write_pool_config(&self, ctx: &CallContext, pools: &[types::PoolSetting]) -> Result<()> {
        let parameter = serde_json::to_string(pools)
            .map_err(|e| RigError::protocol(format!("cannot encode pool list: {}", e)))?;
        self.call(ctx, commands::SET_POOL_CONFIG, &parameter).await?;
        debug!("Pool list written ({} pools)", pools.len());
        Ok(())
    }
}

#[async_trait]
impl RigClient for BaikalClient {
    fn manufacturer(&self) -> &'static str {
        MANUFACTURER
    }

    fn set_transport(&self, transport: Arc<dyn Transport>) {
        self.session.replace_transport(transport);
    }

    async fn mine_start(&self, ctx: &CallContext) -> Result<()> {
        info!("Starting miner");
        self.shell(ctx, &self.config.miner_start_command).await
    }

    async fn mine_stop(&self, ctx: &CallContext) -> Result<()> {
        info!("Stopping miner");
        self.shell(ctx, &self.config.miner_stop_command).await
    }

    async fn restart(&self, ctx: &CallContext) -> Result<()> {
        info!("Restarting miner");
        self.call(ctx, commands::RESTART, "").await?;
        Ok(())
    }

    async fn reboot(&self, ctx: &CallContext) -> Result<()> {
        let delay = self.config.adapter.reboot_delay_minutes;
        info!("Scheduling reboot in {} minutes", delay);
        self.shell(ctx, &reboot_command(delay)).await
    }

    async fn rig_info(&self, ctx: &CallContext) -> Result<RigIdentity> {
        // The peer address must come from the handle that served the reply
        let transport = self.session.transport()?;
        let response = self
            .runner
            .call_rpc(ctx, transport.as_ref(), commands::SYSTEM, "")
            .await?;

        let info = parser::parse_system_info(&response)?;
        let identity = self.mapper.identity(&info, transport.peer_addr())?;
        self.session.store(identity.clone());
        Ok(identity)
    }

    async fn rig_stat(&self, ctx: &CallContext) -> Result<RigStatSnapshot> {
        let response = self.call(ctx, commands::STATS, "").await?;
        let report = parser::parse_stats(&response)?;
        self.mapper.stats(&report)
    }

    async fn miner_setting(&self, ctx: &CallContext) -> Result<MinerSetting> {
        let response = self.call(ctx, commands::MINER_CONFIG, "").await?;
        let miner = parser::parse_miner_setting(&response)?;

        let response = self.call(ctx, commands::POOL_CONFIG, "").await?;
        let pools = parser::parse_pool_list(&response)?;

        self.mapper.setting(&miner, &pools)
    }

    async fn set_miner_setting(&self, ctx: &CallContext, setting: &MinerSetting) -> Result<()> {
        let (miner, pools) = self.prepare(setting)?;

        let mut write = SettingsWrite::new();
        write
            .write_settings(self.write_miner_config(ctx, &miner))
            .await?;
        write.write_pools(self.write_pool_config(ctx, &pools)).await?;

        info!("Applied miner settings with {} pools", pools.len());
        Ok(())
    }

    async fn apply_setting_phase(
        &self,
        ctx: &CallContext,
        setting: &MinerSetting,
        phase: WritePhase,
    ) -> Result<()> {
        let (miner, pools) = self.prepare(setting)?;
        info!("Re-issuing {} phase", phase);

        match phase {
            WritePhase::MinerSettings => self.write_miner_config(ctx, &miner).await,
            WritePhase::PoolList => self.write_pool_config(ctx, &pools).await,
        }
    }
}
