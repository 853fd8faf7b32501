use async_trait::async_trait;
use std::{net::SocketAddr, process::Stdio};
use tokio::{
    process::Command,
    time::{timeout_at, Instant},
};
use tracing::debug;

use crate::error::TransportError;

/// Remote shell session to one rig
///
/// Connection establishment, authentication and reconnection belong to the
/// owner of the session; adapters only execute commands on it. Dropping the
/// future returned by [`Transport::execute`] must abort the in-flight I/O.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Run `command` on the rig and return its standard output.
    ///
    /// `deadline` is advisory for implementations that can push it down to
    /// the wire; the command runner enforces it regardless.
    async fn execute(
        &self,
        command: &str,
        deadline: Option<Instant>,
    ) -> Result<Vec<u8>, TransportError>;

    /// Address of the rig as seen by this connection
    fn peer_addr(&self) -> Option<SocketAddr>;
}

/// Transport for agents running on the rig itself; commands go to `sh -c`
#[derive(Debug, Clone)]
pub struct LocalShell {
    shell: String,
}

impl LocalShell {
    pub fn new() -> Self {
        Self::with_shell("/bin/sh")
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for LocalShell {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for LocalShell {
    async fn execute(
        &self,
        command: &str,
        deadline: Option<Instant>,
    ) -> Result<Vec<u8>, TransportError> {
        debug!("Running locally: {}", command);

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match deadline {
            Some(at) => timeout_at(at, cmd.output())
                .await
                .map_err(|_| TransportError::deadline_exceeded())??,
            None => cmd.output().await?,
        };

        if !output.status.success() {
            return Err(TransportError::command_failed(format!(
                "'{}' exited with {}: {}",
                command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output.stdout)
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        Some(SocketAddr::from(([127, 0, 0, 1], 0)))
    }
}
