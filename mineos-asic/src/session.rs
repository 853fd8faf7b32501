use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use crate::{error::TransportError, transport::Transport};

struct SlotState<I> {
    transport: Option<Arc<dyn Transport>>,
    identity: Option<I>,
}

/// Transport handle plus last-known identity of one rig, under one lock
///
/// Readers clone the handle and release the lock before any I/O, so
/// replacing the transport never waits on an in-flight call; that call keeps
/// running on the handle it captured.
pub struct RigSession<I> {
    state: RwLock<SlotState<I>>,
}

impl<I: Clone> RigSession<I> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SlotState {
                transport: None,
                identity: None,
            }),
        }
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        let session = Self::new();
        session.replace_transport(transport);
        session
    }

    /// Snapshot of the current handle
    pub fn transport(&self) -> Result<Arc<dyn Transport>, TransportError> {
        self.state
            .read()
            .transport
            .clone()
            .ok_or_else(|| TransportError::not_connected("no transport installed"))
    }

    /// Install a new handle, returning the previous one. Calls in flight on
    /// the old handle are not cancelled.
    pub fn replace_transport(&self, transport: Arc<dyn Transport>) -> Option<Arc<dyn Transport>> {
        let previous = {
            let mut state = self.state.write();
            state.transport.replace(transport)
        };
        if previous.is_some() {
            info!("Replaced rig transport");
        }
        previous
    }

    pub fn cached(&self) -> Option<I> {
        self.state.read().identity.clone()
    }

    pub fn store(&self, identity: I) {
        self.state.write().identity = Some(identity);
    }
}

impl<I: Clone> Default for RigSession<I> {
    fn default() -> Self {
        Self::new()
    }
}
