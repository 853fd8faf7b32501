use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Per-call deadline and cancellation handle
///
/// Every facade operation takes a `CallContext`. The command runner aborts
/// the in-flight transport I/O when the deadline passes or the token is
/// cancelled; it never retries on its own.
#[derive(Debug, Clone)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl CallContext {
    /// Context without a deadline; the runner applies its default timeout
    pub fn new() -> Self {
        Self {
            deadline: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Tighten the deadline to `timeout` from now. An earlier deadline that
    /// is already set wins.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Deadline to enforce, falling back to `default_timeout` from now
    pub fn effective_deadline(&self, default_timeout: Duration) -> Instant {
        self.deadline
            .unwrap_or_else(|| Instant::now() + default_timeout)
    }

    /// Derived context that is cancelled with its parent but can also be
    /// cancelled on its own
    pub fn child(&self) -> Self {
        Self {
            deadline: self.deadline,
            cancel: self.cancel.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the context is cancelled
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}
