//! MineOS ASIC adapter core
//!
//! Shared building blocks for driving ASIC mining rigs over a remote shell:
//! the transport contract, the cgminer-style RPC codec, the command runner,
//! and the canonical rig model every vendor adapter maps into.
//!
//! # Layers
//!
//! - [`transport::Transport`]: remote shell session to one rig
//! - [`codec::RpcCodec`]: miner API wire format
//! - [`runner::CommandRunner`]: deadline-bounded shell and RPC calls
//! - [`mapper::VendorMapper`]: vendor-native ⇄ canonical translation
//! - [`client::RigClient`]: operations exposed to the fleet manager
//!
//! Vendor crates implement `VendorMapper` and `RigClient` on top of the
//! shared pieces.
//!
//! # Example
//!
//! ```no_run
//! use mineos_asic::{AdapterConfig, CallContext, CommandRunner, LocalShell};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = CommandRunner::new(&AdapterConfig::default());
//!     let ctx = CallContext::new().with_timeout(Duration::from_secs(5));
//!
//!     let summary = runner.call_rpc(&ctx, &LocalShell::new(), "summary", "").await?;
//!     println!("{:?}", summary.section("SUMMARY"));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod mapper;
pub mod model;
pub mod naming;
pub mod runner;
pub mod session;
pub mod transport;
pub mod write;

// Re-export main types
pub use client::RigClient;
pub use codec::{JsonCodec, Row, RpcCodec, RpcRequest, RpcResponse, RpcStatus, StatusCode};
pub use config::AdapterConfig;
pub use context::CallContext;
pub use error::{Result, RigError, TransportError, TransportErrorKind};
pub use mapper::VendorMapper;
pub use model::{
    option_keys, Algorithm, DeviceStat, MinerSetting, PoolSetting, PoolStat, RigIdentity,
    RigStatSnapshot,
};
pub use runner::CommandRunner;
pub use session::RigSession;
pub use transport::{LocalShell, Transport};
pub use write::{SettingsWrite, WritePhase, WriteState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
