//! In-process change notification bus.

use async_trait::async_trait;
use tokio::sync::broadcast;

use finanzas_core::cache::{ChangeNotification, ChangePubSub, Result};

/// Channel capacity for pub/sub messages.
const CHANNEL_CAPACITY: usize = 100;

/// In-memory pub/sub over a single tokio broadcast channel.
///
/// Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct MemoryPubSub {
    sender: broadcast::Sender<ChangeNotification>,
}

impl MemoryPubSub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for MemoryPubSub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChangePubSub for MemoryPubSub {
    async fn publish(&self, notification: &ChangeNotification) -> Result<()> {
        // No receivers just means nobody is listening right now.
        let _ = self.sender.send(notification.clone());
        Ok(())
    }

    async fn subscribe(&self) -> Result<broadcast::Receiver<ChangeNotification>> {
        Ok(self.sender.subscribe())
    }
}
