//! Event broadcaster for element change events.
//!
//! The `ElementEventBroadcaster` is the bus catalog backends publish to and
//! listeners subscribe from. It uses tokio's broadcast channel, so a slow
//! receiver loses the oldest events rather than blocking publishers.

use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::ElementEvent;
use crate::element::ElementHeader;

/// Default buffer size for the broadcast channel.
const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Cloneable, thread-safe publisher of [`ElementEvent`]s.
#[derive(Clone)]
pub struct ElementEventBroadcaster {
    sender: broadcast::Sender<ElementEvent>,
}

impl ElementEventBroadcaster {
    /// Create a new broadcaster with default buffer size.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    /// Create a new broadcaster with custom buffer size.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a new broadcaster wrapped in an Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Send an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, 0 when
    /// nobody is listening.
    pub fn send(&self, event: ElementEvent) -> usize {
        self.sender.send(event).unwrap_or_default()
    }

    pub fn send_created(&self, header: ElementHeader) -> usize {
        self.send(ElementEvent::created(header))
    }

    pub fn send_updated(&self, header: ElementHeader) -> usize {
        self.send(ElementEvent::updated(header))
    }

    pub fn send_deleted(&self, header: ElementHeader) -> usize {
        self.send(ElementEvent::deleted(header))
    }

    /// Subscribe to events.
    ///
    /// Only events sent after subscription are received.
    pub fn subscribe(&self) -> broadcast::Receiver<ElementEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

impl Default for ElementEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ElementEventBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementEventBroadcaster")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
