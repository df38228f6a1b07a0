//! Read-through cache gateway and mutation invalidation protocol.
//!
//! Reads go through [`CachedDataGateway::get_cached_data`]: a valid cached
//! payload is returned as is, otherwise the caller's loader runs and its
//! result is stored. After a write, callers invoke
//! [`CachedDataGateway::invalidate_after_mutation`], which purges the keys
//! of the affected resource family and emits a change notification twice
//! (immediately and after a short delay) on the in-process bus and the
//! shared change slot.

mod error;
mod listener;
mod reads;

pub use error::{GatewayError, Result};
pub use listener::{ChangeListener, DEFAULT_SEEN_CAPACITY};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use finanzas_core::cache::{
    cache_key, deserialize_payload, invalidation_scope, serialize_payload, Cache,
    ChangeNotification, ChangePubSub, ChangeSlot, InvalidationScope, ResourceType,
};

/// Default offset of the second notification after a mutation.
pub const DEFAULT_NOTIFY_DELAY: Duration = Duration::from_secs(1);

/// Cache-aside gateway over backend reads.
///
/// # Type Parameters
///
/// * `C` - The cache implementation
/// * `P` - The pub/sub implementation for in-process change notifications
pub struct CachedDataGateway<C, P>
where
    C: Cache,
    P: ChangePubSub,
{
    cache: Arc<C>,
    pubsub: Arc<P>,
    slot: Option<Arc<dyn ChangeSlot>>,
    ttl: Duration,
    notify_delay: Duration,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl<C, P> CachedDataGateway<C, P>
where
    C: Cache + 'static,
    P: ChangePubSub + 'static,
{
    /// Creates a gateway storing entries for `ttl`.
    pub fn new(cache: Arc<C>, pubsub: Arc<P>, ttl: Duration) -> Self {
        Self {
            cache,
            pubsub,
            slot: None,
            ttl,
            notify_delay: DEFAULT_NOTIFY_DELAY,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Also writes every notification to a slot other processes observe.
    pub fn with_slot(mut self, slot: Arc<dyn ChangeSlot>) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn with_notify_delay(mut self, delay: Duration) -> Self {
        self.notify_delay = delay;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn pubsub(&self) -> &Arc<P> {
        &self.pubsub
    }

    /// Derives the cache key of a request. Pure; never fails.
    pub fn get_cache_key(&self, endpoint_id: &str, params: &Value) -> String {
        cache_key(endpoint_id, params)
    }

    /// Returns the cached payload for `key`, or runs `loader` and caches its result.
    ///
    /// Loader errors propagate and are never cached. Concurrent misses on the
    /// same key each run their own loader; the last write wins.
    pub async fn get_cached_data<T, F, Fut, E>(&self, key: &str, loader: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Into<GatewayError>,
    {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match deserialize_payload::<T>(&bytes) {
                Ok(value) => {
                    tracing::trace!(%key, "Cache hit");
                    return Ok(value);
                }
                // Deserialization failed - treat as cache miss
                Err(err) => tracing::warn!(%key, error = %err, "Cache payload unreadable"),
            },
            Ok(None) => {}
            Err(err) => tracing::warn!(%key, error = %err, "Cache read failed"),
        }

        tracing::trace!(%key, "Cache miss");
        let value = loader().await.map_err(Into::<GatewayError>::into)?;

        match serialize_payload(&value) {
            Ok(bytes) => {
                if let Err(err) = self.cache.set(key, &bytes, Some(self.ttl)).await {
                    tracing::warn!(%key, error = %err, "Failed to cache payload");
                }
            }
            Err(err) => tracing::warn!(%key, error = %err, "Failed to serialize payload"),
        }

        Ok(value)
    }

    /// Derives the key for `endpoint_id` and `params`, then reads through.
    pub async fn get_or_load<T, F, Fut, E>(
        &self,
        endpoint_id: &str,
        params: &Value,
        loader: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Into<GatewayError>,
    {
        let key = self.get_cache_key(endpoint_id, params);
        self.get_cached_data(&key, loader).await
    }

    /// Drops every entry, or every entry whose key contains `pattern`.
    ///
    /// Never fails: backend errors are logged.
    pub async fn clear_cache(&self, pattern: Option<&str>) {
        let result = match pattern {
            Some(pattern) => self.cache.delete_matching(pattern).await,
            None => self.cache.clear().await,
        };
        match result {
            Ok(()) => tracing::debug!(pattern = pattern.unwrap_or("*"), "Cache cleared"),
            Err(err) => tracing::warn!(pattern = ?pattern, error = %err, "Cache clear failed"),
        }
    }

    /// Purges the keys affected by a write to `resource` without announcing it.
    ///
    /// Used for changes made by another process. Unknown resource types clear
    /// the whole cache.
    pub async fn invalidate(&self, resource: &ResourceType) {
        match invalidation_scope(resource) {
            InvalidationScope::Patterns(patterns) => {
                for pattern in patterns {
                    self.clear_cache(Some(pattern)).await;
                }
            }
            InvalidationScope::All => {
                tracing::debug!(%resource, "Unknown resource type, clearing entire cache");
                self.clear_cache(None).await;
            }
        }
    }

    /// Purges the keys affected by a write to `resource` and announces it.
    ///
    /// The notification is published immediately and once more after the
    /// notify delay.
    pub async fn invalidate_after_mutation(&self, resource: &ResourceType) {
        self.invalidate(resource).await;

        let immediate = ChangeNotification::new(resource.clone(), Utc::now());
        broadcast(self.pubsub.as_ref(), self.slot.as_deref(), &immediate).await;

        let pubsub = Arc::clone(&self.pubsub);
        let slot = self.slot.clone();
        let resource = resource.clone();
        let delay = self.notify_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let delayed = ChangeNotification::delayed(resource, Utc::now());
            broadcast(pubsub.as_ref(), slot.as_deref(), &delayed).await;
        });

        let mut pending = self.pending.lock().await;
        pending.retain(|task| !task.is_finished());
        pending.push(handle);
    }

    /// Waits until every scheduled delayed notification has been sent.
    ///
    /// Short-lived processes call this before exiting so the second
    /// notification is not lost with the runtime.
    pub async fn flush_notifications(&self) {
        let tasks: Vec<_> = self.pending.lock().await.drain(..).collect();
        for task in tasks {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "Delayed notification task failed");
            }
        }
    }

    /// Subscribes to change notifications seen by this process.
    pub async fn subscribe(&self) -> Result<broadcast::Receiver<ChangeNotification>> {
        Ok(self.pubsub.subscribe().await?)
    }
}

/// Writes the slot and publishes on the bus. Failures are logged.
async fn broadcast<P>(pubsub: &P, slot: Option<&dyn ChangeSlot>, notification: &ChangeNotification)
where
    P: ChangePubSub + ?Sized,
{
    tracing::debug!(
        resource = %notification.resource,
        id = %notification.id,
        delayed = notification.is_delayed(),
        "Broadcasting change"
    );
    if let Some(slot) = slot {
        if let Err(err) = slot.write(notification).await {
            tracing::warn!(error = %err, "Failed to write change slot");
        }
    }
    if let Err(err) = pubsub.publish(notification).await {
        tracing::warn!(error = %err, "Failed to publish change notification");
    }
}
