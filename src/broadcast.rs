//! Broadcaster abstraction for pushing views to every open page
//!
//! Backed by a tokio broadcast channel. Pages that fall behind skip to the
//! newest view, which is always a complete picture of the draw.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use crate::config::BROADCAST_CAPACITY;
use crate::protocol::ServerMessage;

/// Receiver type for broadcast messages
pub type BroadcastReceiver = broadcast::Receiver<Arc<ServerMessage>>;

/// Trait for broadcasting messages to all connected clients
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Subscribe to receive broadcast messages
    fn subscribe(&self) -> BroadcastReceiver;

    /// Send a message to all subscribers
    async fn send(&self, msg: ServerMessage);

    /// Get the number of active subscribers
    fn subscriber_count(&self) -> usize;
}

/// In-memory broadcaster using tokio broadcast channel
pub struct InMemoryBroadcaster {
    tx: broadcast::Sender<Arc<ServerMessage>>,
}

impl InMemoryBroadcaster {
    pub fn new() -> Self {
        Self::with_capacity(BROADCAST_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }
}

impl Default for InMemoryBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Broadcaster for InMemoryBroadcaster {
    fn subscribe(&self) -> BroadcastReceiver {
        self.tx.subscribe()
    }

    async fn send(&self, msg: ServerMessage) {
        // Errors only when nobody is listening
        if let Err(e) = self.tx.send(Arc::new(msg)) {
            debug!("Broadcast send (no receivers): {}", e);
        }
    }

    fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
