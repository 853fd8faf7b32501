use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    context::CallContext,
    error::Result,
    model::{MinerSetting, RigIdentity, RigStatSnapshot},
    transport::Transport,
    write::WritePhase,
};

/// Operations the fleet manager performs on one rig
///
/// Lifecycle calls succeed once the rig accepted the command; callers that
/// need confirmation poll [`RigClient::rig_stat`] afterwards.
#[async_trait]
pub trait RigClient: Send + Sync {
    /// Manufacturer reported for every rig of this adapter
    fn manufacturer(&self) -> &'static str;

    /// Swap the transport handle; calls already in flight are not cancelled
    fn set_transport(&self, transport: Arc<dyn Transport>);

    async fn mine_start(&self, ctx: &CallContext) -> Result<()>;

    async fn mine_stop(&self, ctx: &CallContext) -> Result<()>;

    /// Restart the miner software
    async fn restart(&self, ctx: &CallContext) -> Result<()>;

    /// Schedule a delayed OS reboot
    async fn reboot(&self, ctx: &CallContext) -> Result<()>;

    async fn rig_info(&self, ctx: &CallContext) -> Result<RigIdentity>;

    async fn rig_stat(&self, ctx: &CallContext) -> Result<RigStatSnapshot>;

    async fn miner_setting(&self, ctx: &CallContext) -> Result<MinerSetting>;

    /// Write miner settings, then the pool list. A failure of the second
    /// write is reported as `RigError::PartialSettingsWrite`.
    async fn set_miner_setting(&self, ctx: &CallContext, setting: &MinerSetting) -> Result<()>;

    /// Re-issue a single phase of a settings write
    async fn apply_setting_phase(
        &self,
        ctx: &CallContext,
        setting: &MinerSetting,
        phase: WritePhase,
    ) -> Result<()>;
}
