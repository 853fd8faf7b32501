use std::fmt;
use thiserror::Error;

use crate::write::WritePhase;

/// Classification of transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The caller's deadline expired before the remote replied
    DeadlineExceeded,

    /// The caller cancelled the call
    Cancelled,

    /// No transport handle has been installed
    NotConnected,

    /// The connection dropped while the call was in flight
    Disconnected,

    /// The remote command ran but exited unsuccessfully
    CommandFailed,

    /// Local I/O failure while driving the transport
    Io,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::DeadlineExceeded => "deadline exceeded",
            TransportErrorKind::Cancelled => "cancelled",
            TransportErrorKind::NotConnected => "not connected",
            TransportErrorKind::Disconnected => "disconnected",
            TransportErrorKind::CommandFailed => "command failed",
            TransportErrorKind::Io => "io",
        };
        f.write_str(name)
    }
}

/// Failure of the remote shell transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn deadline_exceeded() -> Self {
        Self::new(TransportErrorKind::DeadlineExceeded, "deadline expired before reply")
    }

    pub fn cancelled() -> Self {
        Self::new(TransportErrorKind::Cancelled, "call cancelled by caller")
    }

    pub fn not_connected(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::NotConnected, message)
    }

    pub fn disconnected(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Disconnected, message)
    }

    pub fn command_failed(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::CommandFailed, message)
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::new(TransportErrorKind::Io, err.to_string())
    }
}

/// Rig adapter error types
#[derive(Error, Debug)]
pub enum RigError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Malformed response to '{command}': {reason}")]
    MalformedResponse { command: String, reason: String },

    #[error("Inconsistent telemetry: {devices} device entries but {clocks} clock entries")]
    InconsistentTelemetry { devices: usize, clocks: usize },

    #[error("Unsupported setting: {0}")]
    UnsupportedSetting(String),

    #[error("Partial settings write: {failed} phase failed after {completed} phase was applied: {source}")]
    PartialSettingsWrite {
        completed: WritePhase,
        failed: WritePhase,
        #[source]
        source: Box<RigError>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl RigError {
    pub fn protocol(message: impl Into<String>) -> Self {
        RigError::Protocol(message.into())
    }

    pub fn malformed(command: impl Into<String>, reason: impl fmt::Display) -> Self {
        RigError::MalformedResponse {
            command: command.into(),
            reason: reason.to_string(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        RigError::UnsupportedSetting(message.into())
    }

    /// Transport failures are transient; everything else points at a schema
    /// or configuration problem that a blind retry will not fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RigError::Transport(_))
    }

    /// Phase that must be re-issued after a partial settings write
    pub fn failed_phase(&self) -> Option<WritePhase> {
        match self {
            RigError::PartialSettingsWrite { failed, .. } => Some(*failed),
            _ => None,
        }
    }

    pub fn transport_kind(&self) -> Option<TransportErrorKind> {
        match self {
            RigError::Transport(err) => Some(err.kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RigError>;
