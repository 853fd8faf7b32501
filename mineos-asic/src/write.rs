//! Two-phase settings write.
//!
//! Vendor RPC APIs expose the global miner settings and the pool list as two
//! independent writes with no transaction around them. [`SettingsWrite`]
//! tracks which phase has landed on the device so a failure of the second
//! phase is reported as a mixed state instead of a generic error:
//!
//! ```text
//! Pending -> SettingsWritten -> PoolsWritten
//!    |             |
//!    +-> Failed    +-> Failed (mixed state)
//! ```

use serde::{Deserialize, Serialize};
use std::{fmt, future::Future};
use tracing::warn;

use crate::error::{Result, RigError};

/// One RPC write of the settings protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritePhase {
    MinerSettings,
    PoolList,
}

impl fmt::Display for WritePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePhase::MinerSettings => f.write_str("miner-settings"),
            WritePhase::PoolList => f.write_str("pool-list"),
        }
    }
}

/// Progress of a settings write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    Pending,
    SettingsWritten,
    PoolsWritten,
    Failed(WritePhase),
}

/// State machine driving the two dependent writes in order
#[derive(Debug)]
pub struct SettingsWrite {
    state: WriteState,
}

impl SettingsWrite {
    pub fn new() -> Self {
        Self {
            state: WriteState::Pending,
        }
    }

    pub fn state(&self) -> WriteState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == WriteState::PoolsWritten
    }

    /// Run the miner-settings write. A failure here leaves the device
    /// untouched, so the underlying error is returned unchanged.
    pub async fn write_settings<F>(&mut self, write: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        if self.state != WriteState::Pending {
            return Err(RigError::protocol(format!(
                "miner-settings write issued in state {:?}",
                self.state
            )));
        }

        match write.await {
            Ok(()) => {
                self.state = WriteState::SettingsWritten;
                Ok(())
            }
            Err(e) => {
                self.state = WriteState::Failed(WritePhase::MinerSettings);
                Err(e)
            }
        }
    }

    /// Run the pool-list write. Only valid once the settings phase landed;
    /// a failure leaves the device in a mixed state.
    pub async fn write_pools<F>(&mut self, write: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        if self.state != WriteState::SettingsWritten {
            return Err(RigError::protocol(format!(
                "pool-list write issued in state {:?}",
                self.state
            )));
        }

        match write.await {
            Ok(()) => {
                self.state = WriteState::PoolsWritten;
                Ok(())
            }
            Err(e) => {
                warn!("Pool list write failed after miner settings were applied: {}", e);
                self.state = WriteState::Failed(WritePhase::PoolList);
                Err(RigError::PartialSettingsWrite {
                    completed: WritePhase::MinerSettings,
                    failed: WritePhase::PoolList,
                    source: Box::new(e),
                })
            }
        }
    }
}

impl Default for SettingsWrite {
    fn default() -> Self {
        Self::new()
    }
}
