use std::sync::Arc;

use crate::core::broker::{BrokerInner, EventBroker};
use crate::core::context::ContextHandle;
use crate::presence::{NullPresence, PresenceHook};

/// Builder for constructing an [`EventBroker`] with optional collaborators.
pub struct EventBrokerBuilder {
    ctx: ContextHandle,
    presence: Arc<dyn PresenceHook>,
}

impl EventBrokerBuilder {
    /// Creates a new builder around the given consumer context handle.
    pub fn new(ctx: ContextHandle) -> Self {
        Self {
            ctx,
            presence: Arc::new(NullPresence),
        }
    }

    /// Sets the presence hook invoked when a connected session loses or
    /// regains its consumer.
    ///
    /// Defaults to [`NullPresence`] (no side effect).
    pub fn with_presence(mut self, presence: Arc<dyn PresenceHook>) -> Self {
        self.presence = presence;
        self
    }

    /// Builds the broker.
    pub fn build(self) -> EventBroker {
        EventBroker::from_inner(Arc::new(BrokerInner::new(self.ctx, self.presence)))
    }
}
