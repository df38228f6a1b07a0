use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{ChangeNotification, Result};

/// Trait for basic cache operations.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key. Expired entries read as `None`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Deletes every value whose key contains `pattern`.
    async fn delete_matching(&self, pattern: &str) -> Result<()>;

    /// Deletes every value.
    async fn clear(&self) -> Result<()>;
}

/// Trait for in-process change notification delivery.
#[async_trait]
pub trait ChangePubSub: Send + Sync {
    /// Publishes a notification to every current subscriber.
    async fn publish(&self, notification: &ChangeNotification) -> Result<()>;

    /// Subscribes to notifications published after this call.
    async fn subscribe(&self) -> Result<broadcast::Receiver<ChangeNotification>>;
}

/// Trait for the slot other processes observe for change notifications.
#[async_trait]
pub trait ChangeSlot: Send + Sync {
    /// Overwrites the slot with the given notification.
    async fn write(&self, notification: &ChangeNotification) -> Result<()>;
}
