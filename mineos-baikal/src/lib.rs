//! Baikal adapter for MineOS
//!
//! Drives sgminer-based Baikal rigs (Giant series and the older Mini Miner
//! line) through the shared `mineos-asic` runner: lifecycle commands over
//! the shell, telemetry and settings over the miner API.
//!
//! # Example
//!
//! ```no_run
//! use mineos_asic::{CallContext, LocalShell, RigClient};
//! use mineos_baikal::{BaikalClient, BaikalConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BaikalClient::with_transport(BaikalConfig::default(), Arc::new(LocalShell::new()));
//!     let stats = client.rig_stat(&CallContext::new()).await?;
//!     println!("{} MH/s", stats.mhs_5s);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod consts;
pub mod mapper;
pub mod parser;
pub mod types;

pub use client::BaikalClient;
pub use config::{BaikalConfig, SshEndpoint};
pub use mapper::{AddressSource, BaikalMapper, FieldTable, FirmwareProfile};
