use std::sync::Arc;
use tokio::time::{timeout_at, Duration};
use tracing::debug;

use crate::{
    codec::{JsonCodec, RpcCodec, RpcRequest, RpcResponse},
    config::AdapterConfig,
    context::CallContext,
    error::{Result, RigError, TransportError},
    transport::Transport,
};

/// Executes shell commands and miner API calls over a rig's transport
///
/// RPC requests are encoded with the codec and piped into the miner API
/// socket on the rig through `nc`. Every call is bounded by the caller's
/// deadline (or the configured default) and aborted on cancellation; nothing
/// is retried here.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    codec: Arc<dyn RpcCodec>,
    rpc_host: String,
    rpc_port: u16,
    default_timeout: Duration,
}

impl CommandRunner {
    pub fn new(config: &AdapterConfig) -> Self {
        Self::with_codec(config, Arc::new(JsonCodec))
    }

    pub fn with_codec(config: &AdapterConfig, codec: Arc<dyn RpcCodec>) -> Self {
        Self {
            codec,
            rpc_host: config.rpc_host.clone(),
            rpc_port: config.rpc_port,
            default_timeout: config.call_timeout(),
        }
    }

    /// Run a shell command, discarding its output
    pub async fn run_shell(
        &self,
        ctx: &CallContext,
        transport: &dyn Transport,
        command: &str,
    ) -> std::result::Result<(), TransportError> {
        self.output_shell(ctx, transport, command).await.map(|_| ())
    }

    /// Run a shell command and return its standard output
    pub async fn output_shell(
        &self,
        ctx: &CallContext,
        transport: &dyn Transport,
        command: &str,
    ) -> std::result::Result<Vec<u8>, TransportError> {
        if ctx.is_cancelled() {
            return Err(TransportError::cancelled());
        }

        let deadline = ctx.effective_deadline(self.default_timeout);
        debug!("Executing: {}", command);

        tokio::select! {
            biased;
            _ = ctx.cancelled() => Err(TransportError::cancelled()),
            result = timeout_at(deadline, transport.execute(command, Some(deadline))) => {
                result.unwrap_or_else(|_| Err(TransportError::deadline_exceeded()))
            }
        }
    }

    /// Issue one miner API call and decode its reply.
    ///
    /// Fails with a protocol error when the reply carries no usable STATUS
    /// or the miner rejected the command.
    pub async fn call_rpc(
        &self,
        ctx: &CallContext,
        transport: &dyn Transport,
        command: &str,
        parameter: &str,
    ) -> Result<RpcResponse> {
        let request = RpcRequest::new(command, parameter);
        let shell = self.rpc_shell_command(&request)?;

        let raw = self.output_shell(ctx, transport, &shell).await?;
        debug!("Reply to '{}': {} bytes", request.command, raw.len());

        let response = self.codec.decode(&raw)?;
        response.ensure_success(command)?;
        Ok(response)
    }

    /// Shell pipeline delivering the encoded request to the miner API
    pub fn rpc_shell_command(&self, request: &RpcRequest) -> Result<String> {
        let payload = self.codec.encode(request)?;
        let payload = String::from_utf8(payload)
            .map_err(|e| RigError::protocol(format!("request is not valid UTF-8: {}", e)))?;

        Ok(format!(
            "printf '%s' {} | nc {} {}",
            shell_quote(&payload),
            shell_quote(&self.rpc_host),
            self.rpc_port
        ))
    }
}

/// Quote `value` as a single POSIX shell word
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
