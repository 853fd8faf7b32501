use std::net::SocketAddr;

use crate::{
    error::Result,
    model::{MinerSetting, RigIdentity, RigStatSnapshot},
};

/// Translation between one vendor family's native structures and the
/// canonical model
///
/// Each vendor family implements this once. Differences between firmware
/// generations of the same family belong in a field table held by the
/// implementation, not in branches at the call sites.
pub trait VendorMapper: Send + Sync {
    type SystemInfo;
    type StatsReport;
    type MinerSetting;
    type PoolSetting;

    /// Build the canonical identity. `peer` is the rig address as seen by
    /// the transport, for firmware that does not report its own.
    fn identity(&self, info: &Self::SystemInfo, peer: Option<SocketAddr>) -> Result<RigIdentity>;

    /// Build the canonical stat snapshot, validating cross-array alignment
    fn stats(&self, report: &Self::StatsReport) -> Result<RigStatSnapshot>;

    /// Build the canonical setting from the native settings and pool list
    fn setting(&self, miner: &Self::MinerSetting, pools: &[Self::PoolSetting]) -> Result<MinerSetting>;

    /// Reduce a canonical setting to native form, rejecting anything the
    /// firmware cannot express. Pool order is preserved.
    fn to_vendor_native(
        &self,
        setting: &MinerSetting,
    ) -> Result<(Self::MinerSetting, Vec<Self::PoolSetting>)>;
}
